//! Batched SQL INSERT writer.
//!
//! Accumulates transformed records and emits one numbered
//! `INSERT ... VALUES (...), (...);` per full batch, wrapped in a single
//! transaction. The writer is a small state machine: it starts
//! `Accumulating`, flushing is the transition action fired when the buffer
//! reaches the batch size (or on [`SqlBatchWriter::finish`] for a partial
//! final batch), and `finish` moves it to `Done`, after which any further
//! call is a [`WriterError::Finished`].

use std::io::Write;

use chrono::Utc;

use crate::error::{WriterError, WriterResult};
use crate::models::{ACADEMIC_YEAR, COLUMNS, DEFAULT_BATCH_SIZE, TABLE};
use crate::transform::record::TransformedRecord;

/// How the column list is wrapped inside the INSERT header, as group sizes
/// per line. Sums to [`COLUMNS`]`.len()`.
const HEADER_GROUPS: [usize; 9] = [5, 6, 5, 5, 4, 3, 3, 3, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Accepting records; flushes a batch whenever the buffer fills.
    Accumulating,
    /// Trailer written; the writer accepts nothing more.
    Done,
}

/// Counters reported after the trailer is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Records emitted across all batches.
    pub total_records: usize,
    /// INSERT statements emitted.
    pub total_batches: usize,
}

/// Writes batched INSERT statements to any [`Write`] sink.
pub struct SqlBatchWriter<W: Write> {
    out: W,
    batch_size: usize,
    batch: Vec<TransformedRecord>,
    total_records: usize,
    total_batches: usize,
    state: WriterState,
}

impl<W: Write> SqlBatchWriter<W> {
    /// Create a writer and emit the file preamble (generated-at header and
    /// transaction begin).
    pub fn new(out: W, batch_size: usize) -> WriterResult<Self> {
        let mut writer = Self {
            out,
            batch_size: batch_size.max(1),
            batch: Vec::new(),
            total_records: 0,
            total_batches: 0,
            state: WriterState::Accumulating,
        };
        writer.write_preamble()?;
        Ok(writer)
    }

    /// Create a writer with the default batch size.
    pub fn with_defaults(out: W) -> WriterResult<Self> {
        Self::new(out, DEFAULT_BATCH_SIZE)
    }

    /// Append one record, flushing a full batch if this push fills it.
    pub fn push(&mut self, record: TransformedRecord) -> WriterResult<()> {
        if self.state == WriterState::Done {
            return Err(WriterError::Finished);
        }
        self.batch.push(record);
        self.total_records += 1;
        if self.batch.len() >= self.batch_size {
            self.flush_batch(false)?;
        }
        Ok(())
    }

    /// Flush any partial batch, write the transaction commit, summary
    /// counts, and verification query, and move to the terminal state.
    pub fn finish(&mut self) -> WriterResult<WriteSummary> {
        if self.state == WriterState::Done {
            return Err(WriterError::Finished);
        }
        self.flush_batch(true)?;

        writeln!(self.out, "COMMIT;")?;
        writeln!(self.out)?;
        writeln!(self.out, "-- Total records processed: {}", self.total_records)?;
        writeln!(self.out, "-- Total batches: {}", self.total_batches)?;
        writeln!(self.out)?;
        writeln!(self.out, "-- Verification query")?;
        writeln!(self.out, "SELECT COUNT(*) as total_imported,")?;
        writeln!(self.out, "       COUNT(DISTINCT student_cpf) as unique_cpfs,")?;
        writeln!(
            self.out,
            "       AVG(final_monthly_value)::DECIMAL(10,2) as avg_value"
        )?;
        writeln!(self.out, "FROM {}", TABLE)?;
        writeln!(self.out, "WHERE academic_year = '{}';", ACADEMIC_YEAR)?;
        self.out.flush()?;

        self.state = WriterState::Done;
        Ok(WriteSummary {
            total_records: self.total_records,
            total_batches: self.total_batches,
        })
    }

    fn write_preamble(&mut self) -> WriterResult<()> {
        writeln!(self.out, "-- Auto-generated SQL from CSV")?;
        writeln!(self.out, "-- Generated at: {}", Utc::now().to_rfc3339())?;
        writeln!(self.out)?;
        writeln!(self.out, "BEGIN;")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn flush_batch(&mut self, is_final: bool) -> WriterResult<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.total_batches += 1;

        let first = self.total_records - self.batch.len() + 1;
        let label = if is_final { "Final batch" } else { "Batch" };
        writeln!(
            self.out,
            "-- {} {} (records {} to {})",
            label, self.total_batches, first, self.total_records
        )?;

        writeln!(self.out, "INSERT INTO {} (", TABLE)?;
        let mut start = 0;
        for len in HEADER_GROUPS {
            let group = COLUMNS[start..start + len].join(", ");
            start += len;
            let trailing = if start < COLUMNS.len() { "," } else { "" };
            writeln!(self.out, "  {}{}", group, trailing)?;
        }
        writeln!(self.out, ") VALUES")?;

        let tuples: Vec<String> = self.batch.iter().map(|r| r.to_sql_tuple()).collect();
        writeln!(self.out, "{};", tuples.join(",\n"))?;
        writeln!(self.out)?;

        self.batch.clear();
        Ok(())
    }
}
