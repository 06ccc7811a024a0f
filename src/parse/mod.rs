// src/parse/mod.rs
//
// Minimal delimited-text reader: one header row, no quoting, positional
// pairing of values with headers.

mod error;

pub use error::ParseError;

use std::collections::BTreeMap;
use tracing::{debug, info};

/// One data row keyed by header.
pub type Record = BTreeMap<String, String>;

/// Header → values, in row order.
pub type ColumnTable = BTreeMap<String, Vec<String>>;

/// Field and row separators. Both may be more than one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters<'a> {
    pub field: &'a str,
    pub row: &'a str,
}

impl<'a> Delimiters<'a> {
    pub fn new(field: &'a str, row: &'a str) -> Self {
        Self { field, row }
    }

    /// Tab-separated fields, newline-separated rows.
    pub fn tsv() -> Self {
        Self::new("\t", "\n")
    }

    fn validate(&self) -> Result<(), ParseError> {
        if self.field.is_empty() {
            return Err(ParseError::EmptyDelimiter("field"));
        }
        if self.row.is_empty() {
            return Err(ParseError::EmptyDelimiter("row"));
        }
        Ok(())
    }
}

impl Default for Delimiters<'_> {
    fn default() -> Self {
        Self::new(",", "\n")
    }
}

/// A document split into its header fields and raw (unsplit) data rows.
/// Both borrow from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    pub headers: Vec<&'a str>,
    pub rows: Vec<&'a str>,
}

impl SplitDocument<'_> {
    /// Split each row on `field` and pair it with the headers; see [`to_record_list`].
    pub fn records(&self, field: &str) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row.split(field))
                    .map(|(h, v)| (h.to_string(), v.to_string()))
                    .collect::<Record>()
            })
            .collect()
    }

    /// Split each row on `field` into per-header columns; see [`to_column_table`].
    pub fn columns(&self, field: &str) -> ColumnTable {
        let mut table: ColumnTable = self
            .headers
            .iter()
            .map(|h| (h.to_string(), Vec::with_capacity(self.rows.len())))
            .collect();

        for row in &self.rows {
            for (header, value) in self.headers.iter().zip(row.split(field)) {
                if let Some(column) = table.get_mut(*header) {
                    column.push(value.to_string());
                }
            }
        }
        table
    }
}

/// Split `text` into rows, take the first row as headers and return the rest unsplit.
///
/// A final row that is exactly `""` (left behind by a trailing row delimiter)
/// is dropped. Fails with [`ParseError::EmptyInput`] when nothing follows the
/// header row, which includes empty text.
pub fn split_into_rows_and_headers<'a>(
    text: &'a str,
    delims: &Delimiters<'_>,
) -> Result<SplitDocument<'a>, ParseError> {
    delims.validate()?;

    let mut rows = text.split(delims.row);
    // `split` always yields at least one item, even for ""
    let headers: Vec<&str> = rows.next().unwrap_or_default().split(delims.field).collect();
    let mut rows: Vec<&str> = rows.collect();

    match rows.last() {
        None => return Err(ParseError::EmptyInput),
        Some(last) if last.is_empty() => {
            debug!("last row of document was empty, removed it");
            rows.pop();
        }
        Some(_) => {}
    }

    info!(
        headers = headers.len(),
        rows = rows.len(),
        "split document into headers and rows"
    );
    Ok(SplitDocument { headers, rows })
}

/// Parse `text` into one [`Record`] per data row, in row order.
///
/// Values pair with headers by position and pairing stops at whichever side
/// runs out first: a short row leaves trailing headers absent, a long row
/// drops its surplus values.
pub fn to_record_list(text: &str, delims: &Delimiters<'_>) -> Result<Vec<Record>, ParseError> {
    Ok(split_into_rows_and_headers(text, delims)?.records(delims.field))
}

/// Parse `text` into a header → values table; the transpose of [`to_record_list`].
pub fn to_column_table(text: &str, delims: &Delimiters<'_>) -> Result<ColumnTable, ParseError> {
    Ok(split_into_rows_and_headers(text, delims)?.columns(delims.field))
}

/// Write `records` back out as delimited text, header row first.
///
/// Fields follow `headers` order; a record stops at the first header it has no
/// value for, so short rows serialize as short rows.
pub fn to_delimited<S: AsRef<str>>(
    headers: &[S],
    records: &[Record],
    delims: &Delimiters<'_>,
) -> String {
    let header_line = headers
        .iter()
        .map(|h| h.as_ref())
        .collect::<Vec<&str>>()
        .join(delims.field);

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header_line);
    for record in records {
        let fields: Vec<&str> = headers
            .iter()
            .map_while(|h| record.get(h.as_ref()).map(String::as_str))
            .collect();
        lines.push(fields.join(delims.field));
    }
    lines.join(delims.row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,bpagrid::parse=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_header_extraction() -> Result<()> {
        init_test_logging();
        let doc = split_into_rows_and_headers("a,b,c\n1,2,3\n4,5,6", &Delimiters::default())?;
        assert_eq!(doc.headers, vec!["a", "b", "c"]);
        assert_eq!(doc.rows, vec!["1,2,3", "4,5,6"]);
        Ok(())
    }

    #[test]
    fn test_trailing_empty_row_dropped() -> Result<()> {
        init_test_logging();
        let records = to_record_list("a,b\n1,2\n", &Delimiters::default())?;
        assert_eq!(records, vec![record(&[("a", "1"), ("b", "2")])]);
        Ok(())
    }

    #[test]
    fn test_only_final_empty_row_dropped() -> Result<()> {
        // an empty row in the middle is data, and so is a whitespace-only last row
        let doc = split_into_rows_and_headers("a\n\n1\n ", &Delimiters::default())?;
        assert_eq!(doc.rows, vec!["", "1", " "]);
        Ok(())
    }

    #[test]
    fn test_header_with_trailing_delimiter_has_no_rows() -> Result<()> {
        let records = to_record_list("a,b\n", &Delimiters::default())?;
        assert!(records.is_empty());
        let columns = to_column_table("a,b\n", &Delimiters::default())?;
        assert_eq!(columns.get("a"), Some(&vec![]));
        assert_eq!(columns.get("b"), Some(&vec![]));
        Ok(())
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let delims = Delimiters::default();
        assert_eq!(
            split_into_rows_and_headers("", &delims),
            Err(ParseError::EmptyInput)
        );
        assert_eq!(to_record_list("a,b", &delims), Err(ParseError::EmptyInput));
        assert_eq!(to_column_table("a,b", &delims), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        assert_eq!(
            to_record_list("a,b\n1,2", &Delimiters::new("", "\n")),
            Err(ParseError::EmptyDelimiter("field"))
        );
        assert_eq!(
            to_column_table("a,b\n1,2", &Delimiters::new(",", "")),
            Err(ParseError::EmptyDelimiter("row"))
        );
    }

    #[test]
    fn test_ragged_short_row() -> Result<()> {
        let records = to_record_list("a,b,c\n1,2", &Delimiters::default())?;
        assert_eq!(records, vec![record(&[("a", "1"), ("b", "2")])]);
        assert!(!records[0].contains_key("c"));

        let columns = to_column_table("a,b,c\n1,2\n4,5,6", &Delimiters::default())?;
        assert_eq!(columns["a"], vec!["1", "4"]);
        assert_eq!(columns["c"], vec!["6"]);
        Ok(())
    }

    #[test]
    fn test_ragged_long_row() -> Result<()> {
        let records = to_record_list("a,b\n1,2,3", &Delimiters::default())?;
        assert_eq!(records, vec![record(&[("a", "1"), ("b", "2")])]);

        let columns = to_column_table("a,b\n1,2,3", &Delimiters::default())?;
        assert_eq!(columns.len(), 2);
        assert_eq!(columns["b"], vec!["2"]);
        Ok(())
    }

    #[test]
    fn test_custom_delimiters() -> Result<()> {
        let delims = Delimiters::tsv();
        let doc = split_into_rows_and_headers("a\tb\n1\t2", &delims)?;
        assert_eq!(doc.headers, vec!["a", "b"]);
        let records = to_record_list("a\tb\n1\t2", &delims)?;
        assert_eq!(records, vec![record(&[("a", "1"), ("b", "2")])]);
        Ok(())
    }

    #[test]
    fn test_multi_character_delimiters() -> Result<()> {
        let delims = Delimiters::new("::", "\r\n");
        let records = to_record_list("x::y\r\n1::2\r\n3::4\r\n", &delims)?;
        assert_eq!(
            records,
            vec![record(&[("x", "1"), ("y", "2")]), record(&[("x", "3"), ("y", "4")])]
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_header_keeps_last_value() -> Result<()> {
        let records = to_record_list("a,a\n1,2", &Delimiters::default())?;
        assert_eq!(records, vec![record(&[("a", "2")])]);
        let columns = to_column_table("a,a\n1,2", &Delimiters::default())?;
        assert_eq!(columns["a"], vec!["1", "2"]);
        Ok(())
    }

    #[test]
    fn test_records_and_columns_agree() -> Result<()> {
        let text = "Date/Time\tLoad\tVER\n10/01/2026 00:00\t5000\t120\n10/01/2026 00:05\t\t130\n";
        let delims = Delimiters::tsv();
        let records = to_record_list(text, &delims)?;
        let columns = to_column_table(text, &delims)?;

        assert_eq!(records.len(), 2);
        for (i, rec) in records.iter().enumerate() {
            for (header, value) in rec {
                assert_eq!(&columns[header][i], value);
            }
        }
        assert_eq!(columns["Load"], vec!["5000", ""]);
        Ok(())
    }

    #[test]
    fn test_reparse_after_serialize() -> Result<()> {
        for delims in [Delimiters::default(), Delimiters::new("|", "\r\n")] {
            let text = ["id", "name", "mw"].join(delims.field)
                + delims.row
                + &["1", "hydro", "9000"].join(delims.field)
                + delims.row
                + &["2", "", "12"].join(delims.field);

            let doc = split_into_rows_and_headers(&text, &delims)?;
            let records = to_record_list(&text, &delims)?;
            let written = to_delimited(&doc.headers, &records, &delims);
            assert_eq!(written, text);
            assert_eq!(to_record_list(&written, &delims)?, records);
        }
        Ok(())
    }

    #[test]
    fn test_serialize_short_record() {
        let records = vec![record(&[("a", "1")])];
        assert_eq!(
            to_delimited(&["a", "b"][..], &records, &Delimiters::default()),
            "a,b\n1"
        );
    }

    #[test]
    fn test_split_document_views_match_text_parsers() -> Result<()> {
        let text = "a,b,c\n1,2\n4,5,6,7\n";
        let delims = Delimiters::default();
        let doc = split_into_rows_and_headers(text, &delims)?;
        assert_eq!(doc.records(delims.field), to_record_list(text, &delims)?);
        assert_eq!(doc.columns(delims.field), to_column_table(text, &delims)?);
        Ok(())
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn delimiter_pair() -> impl Strategy<Value = (&'static str, &'static str)> {
            prop_oneof![
                Just((",", "\n")),
                Just(("\t", "\r\n")),
                Just(("::", "||")),
                Just(("|", "\n")),
            ]
        }

        fn headers() -> impl Strategy<Value = Vec<String>> {
            prop::collection::btree_set("[a-z]{1,6}", 1..6).prop_map(|h| h.into_iter().collect())
        }

        /// Every row as wide as the header row.
        fn rect_grid() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
            headers().prop_flat_map(|headers| {
                let width = headers.len();
                (
                    Just(headers),
                    prop::collection::vec(prop::collection::vec("[a-z0-9 ]{1,4}", width), 1..10),
                )
            })
        }

        /// Rows anywhere from one field to wider than the header row.
        fn ragged_grid() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
            (
                headers(),
                prop::collection::vec(prop::collection::vec("[a-z0-9 ]{1,4}", 1..8), 1..10),
            )
        }

        fn render(headers: &[String], rows: &[Vec<String>], field: &str, row: &str) -> String {
            std::iter::once(headers.join(field))
                .chain(rows.iter().map(|r| r.join(field)))
                .collect::<Vec<_>>()
                .join(row)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_records_and_columns_agree(
                (headers, rows) in rect_grid(),
                (field, row) in delimiter_pair(),
                trailing in any::<bool>()
            ) {
                let mut text = render(&headers, &rows, field, row);
                if trailing {
                    text.push_str(row);
                }
                let delims = Delimiters::new(field, row);
                let records = to_record_list(&text, &delims).unwrap();
                let columns = to_column_table(&text, &delims).unwrap();

                prop_assert_eq!(records.len(), rows.len());
                for (i, rec) in records.iter().enumerate() {
                    for h in &headers {
                        prop_assert_eq!(&rec[h], &columns[h][i]);
                    }
                }
            }

            #[test]
            fn prop_ragged_rows_pair_positionally(
                (headers, rows) in ragged_grid(),
                (field, row) in delimiter_pair()
            ) {
                let text = render(&headers, &rows, field, row);
                let delims = Delimiters::new(field, row);
                let records = to_record_list(&text, &delims).unwrap();
                let columns = to_column_table(&text, &delims).unwrap();

                prop_assert_eq!(records.len(), rows.len());
                for (rec, raw) in records.iter().zip(&rows) {
                    prop_assert_eq!(rec.len(), headers.len().min(raw.len()));
                    for (j, h) in headers.iter().enumerate() {
                        prop_assert_eq!(rec.get(h), raw.get(j));
                    }
                }
                for h in &headers {
                    let from_records: Vec<&String> = records.iter().filter_map(|r| r.get(h)).collect();
                    let column: Vec<&String> = columns[h].iter().collect();
                    prop_assert_eq!(from_records, column);
                }
            }

            #[test]
            fn prop_reparse_after_serialize_is_stable(
                (headers, rows) in ragged_grid(),
                (field, row) in delimiter_pair()
            ) {
                let text = render(&headers, &rows, field, row);
                let delims = Delimiters::new(field, row);
                let records = to_record_list(&text, &delims).unwrap();
                let written = to_delimited(&headers, &records, &delims);
                prop_assert_eq!(to_record_list(&written, &delims).unwrap(), records);
            }
        }
    }
}
