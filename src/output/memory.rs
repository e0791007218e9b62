use crate::output::traits::{OutputRecord, OutputResult, RecordSink};

/// Record sink that keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<OutputRecord>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    /// Number of times `flush` was called
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, record: &OutputRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.flushes += 1;
        Ok(())
    }
}
