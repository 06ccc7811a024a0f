// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{Config, Source};

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed, check the network connection", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// Fetch the raw report text from the configured source. No retries.
#[instrument(level = "info", skip_all, fields(source = ?cfg.source))]
pub async fn load_report(client: &Client, cfg: &Config) -> Result<String> {
    let text = match &cfg.source {
        Source::Web { url } => {
            let url = Url::parse(url).with_context(|| format!("parsing report URL {}", url))?;
            info!(%url, "requesting report");
            get_text(client, &url).await?
        }
        Source::File { path } => {
            info!(path = %path.display(), "loading report file");
            fs::read_to_string(path)
                .await
                .with_context(|| format!("reading report file {}", path.display()))?
        }
    };
    info!(bytes = text.len(), "report loaded");
    Ok(text)
}

/// Drop the first `skip_lines` rows (report preamble) and re-join the rest with `\n`.
pub fn strip_preamble(raw: &str, newline: &str, skip_lines: usize) -> String {
    raw.split(newline)
        .skip(skip_lines)
        .collect::<Vec<_>>()
        .join("\n")
}
