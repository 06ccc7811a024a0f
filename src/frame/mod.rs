// src/frame/mod.rs

pub mod date_parser;
pub mod stats;

pub use date_parser::{parse_report_timestamp, ReportZone};
pub use stats::{render_summary, ColumnSummary};

use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Int64Array, TimestampSecondArray},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, instrument};

use crate::parse::Record;

pub const DATE: &str = "Date";
pub const LOAD: &str = "Load";
pub const TOTAL_GENERATION: &str = "Total Generation";
pub const EXCESS: &str = "Excess";

/// Generation sources summed into [`TOTAL_GENERATION`].
pub const GENERATION_SOURCES: [&str; 4] = ["VER", "Hydro", "Fossil/Biomass", "Nuclear"];

#[derive(Debug, Clone)]
pub struct FrameOptions {
    /// Header of the timestamp column, compared after trimming.
    pub date_column: String,
    pub zone: ReportZone,
}

/// Integer MW readings indexed by report time.
///
/// Column 0 is always [`DATE`] (unix seconds); every other column is `Int64`.
#[derive(Debug, Clone)]
pub struct LoadFrame {
    batch: RecordBatch,
}

impl LoadFrame {
    /// Build a frame from parsed report records.
    ///
    /// Rows whose `Load` value is blank or missing are dropped; the report pads
    /// out its time axis with such rows. Header whitespace is trimmed; headers
    /// that only differ by padding keep the first column. Exact duplicates never
    /// get here, since a [`Record`] holds one value per header.
    #[instrument(level = "info", skip_all, fields(records = records.len()))]
    pub fn from_records<S: AsRef<str>>(
        headers: &[S],
        records: &[Record],
        opts: &FrameOptions,
    ) -> Result<Self> {
        let date_header = headers
            .iter()
            .map(|h| h.as_ref())
            .find(|h| h.trim() == opts.date_column)
            .with_context(|| format!("no '{}' column in report headers", opts.date_column))?;
        let load_header = headers
            .iter()
            .map(|h| h.as_ref())
            .find(|h| h.trim() == LOAD)
            .with_context(|| format!("no '{}' column in report headers", LOAD))?;

        let kept: Vec<&Record> = records
            .iter()
            .filter(|r| r.get(load_header).is_some_and(|v| !v.trim().is_empty()))
            .collect();
        debug!(
            dropped = records.len() - kept.len(),
            "dropped rows without a load value"
        );

        let dates = kept
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let raw = r.get(date_header).map(String::as_str).unwrap_or_default();
                parse_report_timestamp(raw, opts.zone)
                    .with_context(|| format!("row {}: bad timestamp '{}'", i, raw))
            })
            .collect::<Result<Vec<i64>>>()?;

        let mut fields = vec![Field::new(
            DATE,
            DataType::Timestamp(TimeUnit::Second, None),
            false,
        )];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(TimestampSecondArray::from(dates))];
        let mut seen = HashSet::new();

        for header in headers.iter().map(|h| h.as_ref()) {
            let name = header.trim();
            if header == date_header || !seen.insert(name) {
                continue;
            }
            let values = kept
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let raw = r
                        .get(header)
                        .with_context(|| format!("row {}: no value for '{}'", i, name))?;
                    raw.trim()
                        .parse::<i64>()
                        .with_context(|| format!("row {}: '{}' is not an integer in '{}'", i, raw, name))
                })
                .collect::<Result<Vec<i64>>>()?;

            fields.push(Field::new(name, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(values)));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .context("building load frame")?;
        info!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "built load frame"
        );
        Ok(Self { batch })
    }

    /// Append [`TOTAL_GENERATION`] (sum of [`GENERATION_SOURCES`]) and
    /// [`EXCESS`] (generation over load, floored at zero).
    pub fn with_derived(self) -> Result<Self> {
        let mut total = vec![0i64; self.num_rows()];
        for source in GENERATION_SOURCES {
            let col = self
                .column(source)
                .with_context(|| format!("missing generation column '{}'", source))?;
            for (i, (t, v)) in total.iter_mut().zip(col.values().iter()).enumerate() {
                *t = t
                    .checked_add(*v)
                    .with_context(|| format!("row {}: total generation overflows at '{}'", i, source))?;
            }
        }

        let load = self
            .column(LOAD)
            .with_context(|| format!("missing '{}' column", LOAD))?;
        let excess = total
            .iter()
            .zip(load.values().iter())
            .enumerate()
            .map(|(i, (t, l))| {
                t.checked_sub(*l)
                    .map(|e| e.max(0))
                    .with_context(|| format!("row {}: excess overflows", i))
            })
            .collect::<Result<Vec<i64>>>()?;

        self.with_column(TOTAL_GENERATION, total)?
            .with_column(EXCESS, excess)
    }

    fn with_column(self, name: &str, values: Vec<i64>) -> Result<Self> {
        if self.batch.schema().index_of(name).is_ok() {
            bail!("column '{}' already exists", name);
        }
        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| (**f).clone()).collect();
        fields.push(Field::new(name, DataType::Int64, false));

        let mut columns = self.batch.columns().to_vec();
        columns.push(Arc::new(Int64Array::from(values)));

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .with_context(|| format!("adding column '{}'", name))?;
        Ok(Self { batch })
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Report timestamps, unix seconds.
    pub fn dates(&self) -> &[i64] {
        self.batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampSecondArray>()
            .map(|a| &a.values()[..])
            .unwrap_or_default()
    }

    pub fn column(&self, name: &str) -> Option<&Int64Array> {
        let idx = self.batch.schema().index_of(name).ok()?;
        self.batch.column(idx).as_any().downcast_ref::<Int64Array>()
    }

    /// Every non-date column in frame order.
    pub fn value_columns(&self) -> Vec<(String, &Int64Array)> {
        let schema = self.batch.schema();
        schema
            .fields()
            .iter()
            .zip(self.batch.columns())
            .skip(1)
            .filter_map(|(field, col)| {
                col.as_any()
                    .downcast_ref::<Int64Array>()
                    .map(|arr| (field.name().clone(), arr))
            })
            .collect()
    }
}
