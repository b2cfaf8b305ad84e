//! High-level pipeline: CSV in, batched SQL out.
//!
//! Composes the parser, the row transform, and the batch writer into the
//! single-pass conversion the tool exists for.
//!
//! # Example
//!
//! ```rust,ignore
//! use matricula_import::{convert_csv_file, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert_csv_file(
//!     Path::new("previous_year_students_rows_upload.csv"),
//!     Path::new("out.sql"),
//!     &ConvertOptions::default(),
//! )?;
//! eprintln!("{} records in {} batches", summary.total_records, summary.total_batches);
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PipelineResult;
use crate::models::DEFAULT_BATCH_SIZE;
use crate::parser;
use crate::writer::SqlBatchWriter;

use super::record::build_record;

/// Options for the conversion pipeline.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Records per INSERT statement.
    pub batch_size: usize,

    /// CSV delimiter; `None` auto-detects from the header line.
    pub delimiter: Option<char>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: None,
        }
    }
}

/// CSV input metadata, reported back to the caller.
#[derive(Debug, Clone)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of a complete conversion.
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    /// Records emitted into INSERT statements.
    pub total_records: usize,
    /// INSERT statements emitted.
    pub total_batches: usize,
    /// Rows dropped by the skip rule (blank or repeated-header rows).
    pub skipped_rows: usize,
    /// Input metadata.
    pub csv_info: CsvInfo,
}

/// Convert a CSV file into a SQL file.
///
/// This is the main entry point. I/O failures propagate; malformed field
/// values degrade per the field cleaners and never fail the run.
pub fn convert_csv_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> PipelineResult<ConvertSummary> {
    let bytes = std::fs::read(input)?;
    let file = File::create(output)?;
    let mut out = BufWriter::new(file);
    let summary = convert_bytes(&bytes, &mut out, options)?;
    out.flush()?;
    Ok(summary)
}

/// Convert CSV bytes, writing the SQL to any [`Write`] sink.
pub fn convert_bytes<W: Write>(
    bytes: &[u8],
    out: W,
    options: &ConvertOptions,
) -> PipelineResult<ConvertSummary> {
    let parsed = parser::parse_bytes(bytes, options.delimiter)?;

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.headers.clone(),
        row_count: parsed.records.len(),
    };

    let mut writer = SqlBatchWriter::new(out, options.batch_size)?;
    let mut skipped_rows = 0;

    for row in &parsed.records {
        match build_record(row) {
            Some(record) => writer.push(record)?,
            None => skipped_rows += 1,
        }
    }

    let totals = writer.finish()?;

    Ok(ConvertSummary {
        total_records: totals.total_records,
        total_batches: totals.total_batches,
        skipped_rows,
        csv_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn sample_csv(rows: usize) -> String {
        let mut csv = String::from(
            "student_name;student_cpf;student_birth_date;student_gender;base_value;\
             final_monthly_value;discount_code;discount_description;total_discount_percentage\n",
        );
        for i in 0..rows {
            writeln!(
                csv,
                "Aluno {i};{i:011};01/02/2015;F;1500,00;1350,00;IIR;Irmãos;10"
            )
            .unwrap();
        }
        csv
    }

    fn convert(csv: &str, options: &ConvertOptions) -> (String, ConvertSummary) {
        let mut buf = Vec::new();
        let summary = convert_bytes(csv.as_bytes(), &mut buf, options).unwrap();
        (String::from_utf8(buf).unwrap(), summary)
    }

    #[test]
    fn test_end_to_end_250_rows_three_batches() {
        let (sql, summary) = convert(&sample_csv(250), &ConvertOptions::default());

        assert_eq!(summary.total_records, 250);
        assert_eq!(summary.total_batches, 3);
        assert_eq!(summary.skipped_rows, 0);
        assert_eq!(sql.matches("INSERT INTO").count(), 3);
        assert!(sql.contains("-- Batch 1 (records 1 to 100)"));
        assert!(sql.contains("-- Final batch 3 (records 201 to 250)"));
        assert!(sql.contains("-- Total records processed: 250"));
        assert!(sql.contains("-- Total batches: 3"));

        let commit = sql.find("COMMIT;").unwrap();
        assert_eq!(sql[commit..].matches("-- Verification query").count(), 1);
    }

    #[test]
    fn test_repeated_header_rows_excluded_from_counts() {
        let mut csv = sample_csv(3);
        // a concatenated export repeats its header mid-file
        csv.push_str("student_name;student_cpf;student_birth_date;student_gender;base_value;final_monthly_value;discount_code;discount_description;total_discount_percentage\n");
        csv.push_str("Aluno 3;00000000003;01/02/2015;F;1500,00;1350,00;;;0\n");

        let (sql, summary) = convert(&csv, &ConvertOptions::default());
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.skipped_rows, 1);
        assert!(sql.contains("-- Total records processed: 4"));
    }

    #[test]
    fn test_custom_batch_size() {
        let (_, summary) = convert(
            &sample_csv(5),
            &ConvertOptions {
                batch_size: 2,
                delimiter: None,
            },
        );
        assert_eq!(summary.total_batches, 3);
    }

    #[test]
    fn test_transformed_values_reach_output() {
        let (sql, _) = convert(&sample_csv(1), &ConvertOptions::default());
        assert!(sql.contains("'Aluno 0'"));
        assert!(sql.contains("'2015-02-01'"));
        assert!(sql.contains("1500, 10, 0, 1350"));
        assert!(sql.contains(r#""discount_name":"Irmãos""#));
        assert!(sql.contains("'2024', 'approved', NOW(), NOW()"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("students.csv");
        let output = dir.path().join("out.sql");
        std::fs::write(&input, sample_csv(12)).unwrap();

        let summary =
            convert_csv_file(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.total_records, 12);
        assert_eq!(summary.total_batches, 1);

        let sql = std::fs::read_to_string(&output).unwrap();
        assert!(sql.contains("-- Final batch 1 (records 1 to 12)"));
        assert!(sql.ends_with("WHERE academic_year = '2024';\n"));
    }

    #[test]
    fn test_missing_input_file_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_csv_file(
            &dir.path().join("nope.csv"),
            &dir.path().join("out.sql"),
            &ConvertOptions::default(),
        );
        assert!(result.is_err());
    }
}
