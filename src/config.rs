// src/config.rs

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use url::Url;

use crate::frame::ReportZone;

/// Live BPA balancing-authority load and generation report.
pub const BPA_REPORT_URL: &str = "https://transmission.bpa.gov/Business/Operations/Wind/baltwg.txt";

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "BPAGRID_CONFIG";

/// Where the raw report text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    Web { url: String },
    File { path: PathBuf },
}

impl Default for Source {
    fn default() -> Self {
        Source::Web {
            url: BPA_REPORT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: Source,
    pub field_delimiter: String,
    /// Row separator used by the web report.
    pub web_newline: String,
    /// Row separator used by saved copies of the report.
    pub file_newline: String,
    /// Preamble lines before the header row.
    pub skip_lines: usize,
    /// Header of the timestamp column, compared after trimming.
    pub date_column: String,
    /// Fixed offset of report timestamps. `None` reads them in the host zone
    /// with daylight saving; a fixed offset never shifts for summer time, so
    /// `-8` places PDT readings an hour late.
    pub utc_offset_hours: Option<i32>,
    pub chart_path: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: Source::default(),
            field_delimiter: "\t".into(),
            web_newline: "\r\n".into(),
            file_newline: "\n".into(),
            skip_lines: 11,
            date_column: "Date/Time".into(),
            utc_offset_hours: None,
            chart_path: PathBuf::from("bpa_load.svg"),
            chart_width: 1600,
            chart_height: 900,
        }
    }
}

impl Config {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("parsing config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("loading config {}", path.display()))
    }

    /// Config from the first CLI argument, else `BPAGRID_CONFIG`, else defaults.
    pub fn from_env_or_default() -> Result<Self> {
        let path = env::args()
            .nth(1)
            .or_else(|| env::var(CONFIG_ENV).ok())
            .filter(|p| !p.is_empty());

        match path {
            Some(p) => {
                info!(path = %p, "loading config");
                Self::load(p)
            }
            None => {
                info!("no config given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Row separator matching the configured source.
    pub fn newline(&self) -> &str {
        match self.source {
            Source::Web { .. } => &self.web_newline,
            Source::File { .. } => &self.file_newline,
        }
    }

    pub fn report_zone(&self) -> Result<ReportZone> {
        match self.utc_offset_hours {
            None => Ok(ReportZone::Local),
            Some(hours) => FixedOffset::east_opt(hours * 3600)
                .map(ReportZone::Fixed)
                .with_context(|| format!("utc_offset_hours {} out of range", hours)),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Source::Web { url } = &self.source {
            Url::parse(url).with_context(|| format!("invalid source url {}", url))?;
        }
        if self.field_delimiter.is_empty() {
            anyhow::bail!("field_delimiter must not be empty");
        }
        if self.newline().is_empty() {
            anyhow::bail!("newline for the configured source must not be empty");
        }
        self.report_zone()?;
        if self.chart_width == 0 || self.chart_height == 0 {
            warn!(
                width = self.chart_width,
                height = self.chart_height,
                "chart has a zero dimension"
            );
        }
        Ok(())
    }
}
