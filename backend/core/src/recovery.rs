//! JSON recovery for free-form model completions.
//!
//! Models frequently wrap JSON in markdown code fences even when asked not to.
//! Recovery strips those fences and hands back a best-effort JSON source string.
//! It never fails: parsing (and reporting parse failure) is the caller's job.

use serde_json::Value;

const FENCE: &str = "```";
const JSON_LABEL: &str = "json";

/// Strip markdown code fences from a model completion.
///
/// A fence marker is a run of three backticks opening a line (leading
/// whitespace allowed); backticks inside the text, such as in a JSON string
/// value, are content.
///
/// - No fence: the text is returned unchanged.
/// - One complete fenced block: only the enclosed text is kept, trimmed.
/// - Several blocks: every fence marker (and its `json` label) is removed,
///   block contents are concatenated in order, and the result is trimmed.
/// - An unbalanced fence count: the text is returned unchanged.
pub fn recover_json(raw: &str) -> String {
    let markers = fence_markers(raw);

    match markers.len() {
        0 => raw.to_string(),
        n if n % 2 == 1 => raw.to_string(),
        2 => {
            let inner = &raw[markers[0] + FENCE.len()..markers[1]];
            strip_label(inner).trim().to_string()
        }
        _ => strip_all_markers(raw, &markers).trim().to_string(),
    }
}

/// Recover, then parse into an untyped JSON value.
pub fn parse_recovered(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&recover_json(raw))
}

/// Drop a leading `json` label (any case) and the newline ending the fence line.
fn strip_label(after_fence: &str) -> &str {
    let rest = match after_fence.get(..JSON_LABEL.len()) {
        Some(label) if label.eq_ignore_ascii_case(JSON_LABEL) => &after_fence[JSON_LABEL.len()..],
        _ => after_fence,
    };
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest)
}

/// Byte offsets of the fence markers that open a line.
fn fence_markers(raw: &str) -> Vec<usize> {
    raw.match_indices(FENCE)
        .map(|(idx, _)| idx)
        .filter(|&idx| {
            let line_start = raw[..idx].rfind('\n').map_or(0, |nl| nl + 1);
            raw[line_start..idx].trim().is_empty()
        })
        .collect()
}

fn strip_all_markers(raw: &str, markers: &[usize]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pos = 0;
    for &idx in markers {
        if idx < pos {
            continue;
        }
        out.push_str(&raw[pos..idx]);
        let rest = strip_label(&raw[idx + FENCE.len()..]);
        pos = raw.len() - rest.len();
    }
    out.push_str(&raw[pos..]);
    out
}
