//! Matricula Import CLI - enrollment CSV to batched SQL INSERTs
//!
//! ```bash
//! matricula-import convert students.csv -o insert_students.sql
//! matricula-import parse students.csv      # debug: just parse CSV to JSON
//! ```
//!
//! Run without arguments beyond the subcommand to use the fixed migration
//! paths the tool was written for.

use clap::{Parser, Subcommand};
use matricula_import::{convert_csv_file, parse_file, ConvertOptions, DEFAULT_BATCH_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// Input file produced by the source system's export.
const DEFAULT_INPUT: &str = "previous_year_students_rows_upload.csv";

/// Migration file the generated SQL lands in.
const DEFAULT_OUTPUT: &str = "supabase/migrations/035_insert_previous_year_students_batch.sql";

#[derive(Parser)]
#[command(name = "matricula-import")]
#[command(about = "Convert student enrollment CSV exports into batched SQL INSERT statements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV export into a batched SQL INSERT file
    Convert {
        /// Input CSV file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output SQL file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Records per INSERT statement
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Parse a CSV file and output JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            batch_size,
            delimiter,
        } => cmd_convert(&input, &output, batch_size, delimiter),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    batch_size: usize,
    delimiter: Option<char>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let options = ConvertOptions {
        batch_size,
        delimiter,
    };
    let summary = convert_csv_file(input, output, &options)?;

    eprintln!("   Encoding: {}", summary.csv_info.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        format_delimiter(summary.csv_info.delimiter)
    );
    eprintln!("   Rows: {}", summary.csv_info.row_count);
    if summary.skipped_rows > 0 {
        eprintln!(
            "   Skipped: {} (blank or repeated-header rows)",
            summary.skipped_rows
        );
    }

    eprintln!("✅ SQL file generated: {}", output.display());
    eprintln!("   Total records: {}", summary.total_records);
    eprintln!("   Total batches: {}", summary.total_batches);

    eprintln!();
    eprintln!("To use the generated SQL:");
    eprintln!("1. Open the SQL editor of the target database");
    eprintln!("2. Copy and paste the content from {}", output.display());
    eprintln!("3. Execute the SQL in batches if needed");

    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_file(input, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
