//! Media type detection for uploaded files.
//!
//! Browsers usually send a content type with each multipart part; when they
//! don't (or the CLI reads a file from disk) the extension decides.

use std::path::Path;

/// Detect a media type by file extension.
pub fn detect_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "heic"         => "image/heic",
        "tiff" | "tif" => "image/tiff",

        // Documents
        "pdf"          => "application/pdf",
        "txt"          => "text/plain",
        "md"           => "text/markdown",
        "json"         => "application/json",
        "csv"          => "text/csv",
        "doc"          => "application/msword",
        "docx"         => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",

        _              => "application/octet-stream",
    }
}

/// Whether a media type belongs to the image family. Case and parameters
/// (`image/png; charset=binary`) are ignored.
pub fn is_image(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or("").trim();
    essence
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && essence.len() > 6
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_media_type(&PathBuf::from("scan.JPG")), "image/jpeg");
    }

    #[test]
    fn detects_pdf() {
        assert_eq!(detect_media_type(&PathBuf::from("contract.pdf")), "application/pdf");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_media_type(&PathBuf::from("file.xyz")), "application/octet-stream");
    }

    #[test]
    fn image_family_check() {
        assert!(is_image("image/png"));
        assert!(is_image("IMAGE/JPEG; q=0.9"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("text/plain"));
        assert!(!is_image("image/"));
        assert!(!is_image(""));
    }
}
