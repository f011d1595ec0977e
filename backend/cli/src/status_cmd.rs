//! CLI Status Command
//!
//! Queries the health endpoint of a running server.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{note_error, note_success};

pub async fn run(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(format!("{base_url}/api/health")).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: Value = resp.json().await?;
            note_success(&format!("LegalLens is running at {base_url}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => note_error(&format!(
            "Health check at {base_url} returned {}",
            resp.status()
        )),
        Err(_) => note_error(&format!("LegalLens is not running at {base_url}")),
    }
    Ok(())
}
