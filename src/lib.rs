//! # Matricula Import - enrollment CSV to batched SQL INSERTs
//!
//! Converts a delimited CSV export of student-enrollment records into
//! batched SQL `INSERT` statements for the `previous_year_students` table,
//! for bulk migration when the database's native bulk-load path is
//! unavailable.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  SQL Batch  │
//! │ (ISO/UTF8)  │     │ (auto-enc)  │     │ (cleaners)  │     │   Writer    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matricula_import::{convert_csv_file, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert_csv_file(
//!     Path::new("previous_year_students_rows_upload.csv"),
//!     Path::new("insert_students.sql"),
//!     &ConvertOptions::default(),
//! ).unwrap();
//! println!("{} records in {} batches", summary.total_records, summary.total_batches);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Destination schema contract and domain constants
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Field cleaners, row pipeline, conversion pipeline
//! - [`writer`] - Batched SQL INSERT writer

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// SQL output
pub mod writer;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, CsvResult, PipelineError, PipelineResult, WriterError, WriterResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AppliedDiscount, ACADEMIC_YEAR, COLUMNS, DEFAULT_BATCH_SIZE, STATUS_APPROVED, TABLE,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_file, ParseResult,
    Record, DEFAULT_DELIMITER,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    build_record, clean_decimal, clean_digits, clean_gender, clean_text, convert_bytes,
    convert_csv_file, convert_date, discounts_json, school_slug, ConvertOptions, ConvertSummary,
    CsvInfo, TransformedRecord,
};

// =============================================================================
// Re-exports - SQL Writer
// =============================================================================

pub use writer::{SqlBatchWriter, WriteSummary};
