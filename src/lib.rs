pub mod config;
pub mod fetch;
pub mod frame;
pub mod parse;
pub mod plot;

pub use config::{Config, Source};
pub use frame::{FrameOptions, LoadFrame, ReportZone};
pub use parse::{
    split_into_rows_and_headers, to_column_table, to_delimited, to_record_list, ColumnTable,
    Delimiters, ParseError, Record,
};
