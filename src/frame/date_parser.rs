use chrono::{FixedOffset, Local, NaiveDateTime, TimeZone};

/// Timestamp layout of the BPA report, e.g. `10/16/2026 13:05`.
pub const REPORT_TS: &str = "%m/%d/%Y %H:%M";

/// Zone the report's wall-clock timestamps are read and labelled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportZone {
    /// Host zone, daylight saving included. A repeated fall-back hour maps to
    /// its earlier instant.
    Local,
    /// Fixed offset, no daylight saving.
    Fixed(FixedOffset),
}

impl From<FixedOffset> for ReportZone {
    fn from(offset: FixedOffset) -> Self {
        ReportZone::Fixed(offset)
    }
}

impl ReportZone {
    pub fn to_unix(&self, naive: &NaiveDateTime) -> Option<i64> {
        match self {
            ReportZone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.timestamp()),
            ReportZone::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.timestamp()),
        }
    }

    /// Format unix seconds with a chrono `strftime` pattern.
    pub fn format(&self, ts: i64, fmt: &str) -> Option<String> {
        match self {
            ReportZone::Local => Local
                .timestamp_opt(ts, 0)
                .earliest()
                .map(|dt| dt.format(fmt).to_string()),
            ReportZone::Fixed(offset) => offset
                .timestamp_opt(ts, 0)
                .single()
                .map(|dt| dt.format(fmt).to_string()),
        }
    }
}

/// Parse `"MM/DD/YYYY HH:MM"` in `zone` → unix seconds
pub fn parse_report_timestamp(s: &str, zone: ReportZone) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), REPORT_TS).ok()?;
    zone.to_unix(&naive)
}
