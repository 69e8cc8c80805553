/// Error taxonomy for the engine.
///
/// Per-file failures (`Io`, `CollisionUnresolved`) are caught by the
/// orchestrators, logged and counted. Only the setup-phase variants
/// (`NoVolumes`, `DestinationUnavailable`) abort a run, and they are always
/// raised before the first filesystem mutation.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Permission denied or I/O failure on a single file or directory.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Both the requested name and its timestamp-qualified variant exist.
    #[error("destination already exists even after timestamp qualification: {}", path.display())]
    CollisionUnresolved { path: PathBuf },

    #[error("destination root {} cannot be created: {source}", path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no volumes available to scan")]
    NoVolumes,

    #[error("failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl SweepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoVolumes | Self::DestinationUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
