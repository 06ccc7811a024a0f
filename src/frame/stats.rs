use arrow::compute;
use std::fmt::Write;

use super::LoadFrame;

/// max / min / mean of one frame column. The mean is truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub max: i64,
    pub min: i64,
    pub average: i64,
}

impl LoadFrame {
    /// Summarize every value column. Empty frames have nothing to summarize.
    pub fn summarize(&self) -> Vec<ColumnSummary> {
        self.value_columns()
            .into_iter()
            .filter_map(|(name, arr)| {
                let max = compute::max(arr)?;
                let min = compute::min(arr)?;
                let sum = compute::sum(arr)?;
                let average = (sum as f64 / arr.len() as f64) as i64;
                Some(ColumnSummary {
                    name,
                    max,
                    min,
                    average,
                })
            })
            .collect()
    }
}

/// Text table with one row per statistic and one column per series.
pub fn render_summary(summaries: &[ColumnSummary]) -> String {
    let widths: Vec<usize> = summaries
        .iter()
        .map(|s| {
            [s.max, s.min, s.average]
                .iter()
                .map(|v| v.to_string().len())
                .max()
                .unwrap_or(0)
                .max(s.name.len())
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:<8}", "");
    for (s, w) in summaries.iter().zip(&widths) {
        let _ = write!(out, "  {:>w$}", s.name, w = w);
    }
    out.push('\n');

    let rows: [(&str, fn(&ColumnSummary) -> i64); 3] = [
        ("max", |s| s.max),
        ("min", |s| s.min),
        ("average", |s| s.average),
    ];
    for (label, get) in rows {
        let _ = write!(out, "{:<8}", label);
        for (s, w) in summaries.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", get(s), w = w);
        }
        out.push('\n');
    }
    out
}
