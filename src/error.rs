//! Error types for the enrollment import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV reading and decoding errors
//! - [`WriterError`] - SQL batch writer errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Note that malformed *field values* are never errors: the transformers
//! degrade them to `NULL` (or `0` for decimals) by design, and structurally
//! invalid rows are skipped, not reported here.

use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors during CSV reading and decoding.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// SQL Writer Errors
// =============================================================================

/// Errors from the SQL batch writer.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Failed to write output.
    #[error("Failed to write SQL output: {0}")]
    Io(#[from] std::io::Error),

    /// The writer already emitted its trailer and accepts no more records.
    #[error("SQL writer already finished")]
    Finished,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::convert_csv_file`]. It wraps all
/// lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// SQL writer error.
    #[error("SQL writer error: {0}")]
    Writer(#[from] WriterError),

    /// IO error outside the CSV/SQL layers (e.g. creating the output file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for SQL writer operations.
pub type WriterResult<T> = Result<T, WriterError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
