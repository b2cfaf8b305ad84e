//! Transformation module.
//!
//! This module turns parsed CSV rows into SQL-ready records:
//! - Fields: per-field cleaners producing SQL literals
//! - Record: row pipeline in destination column order
//! - Pipeline: the full CSV-to-SQL conversion

pub mod fields;
pub mod pipeline;
pub mod record;

pub use fields::*;
pub use pipeline::{convert_bytes, convert_csv_file, ConvertOptions, ConvertSummary, CsvInfo};
pub use record::{build_record, TransformedRecord};
