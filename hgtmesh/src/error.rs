use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HgtError {
    /// The file could not be opened or read.
    #[error("unable to read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File length does not match the requested format.
    #[error("invalid HGT file len {len} for {path:?}, expected {expected}")]
    CorruptFile {
        path: PathBuf,
        len: u64,
        expected: u64,
    },

    /// The file ended before row `row` could be fully read.
    #[error("HGT file {path:?} truncated at row {row}")]
    Truncated { path: PathBuf, row: usize },

    /// A file stem that isn't of the form `N44W072`.
    #[error("invalid HGT name {0:?}")]
    HgtName(PathBuf),

    /// In-memory rows that don't form a square grid.
    #[error("height grid of dimension {dimension} has a row of {len} samples")]
    Ragged { dimension: usize, len: usize },

    /// A flat sample buffer whose length isn't `dimension²`.
    #[error("expected {dimension}x{dimension} samples, got {len}")]
    SampleCount { dimension: usize, len: usize },

    #[error("height grid has no samples")]
    EmptyGrid,
}

impl HgtError {
    /// Returns `true` for errors caused by malformed file contents.
    ///
    /// Re-reading a corrupt file will fail the same way.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptFile { .. } | Self::Truncated { .. })
    }
}
