//! Transfer outcomes and run totals

use std::path::PathBuf;

/// What happened to one entry handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Downloaded { local_path: PathBuf, bytes: u64 },
    /// Size zero or absent: a directory or an empty file.
    SkippedEmpty,
    Excluded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub bytes: u64,
}

impl TransferSummary {
    pub(crate) fn record(&mut self, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            TransferOutcome::SkippedEmpty => self.skipped += 1,
            TransferOutcome::Excluded => self.excluded += 1,
        }
    }
}
