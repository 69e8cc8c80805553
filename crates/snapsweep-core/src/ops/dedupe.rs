/// Deduplicate: find exact-content duplicates under the destination root
/// and delete every non-survivor.
use super::RunSummary;
use crate::analysis::{find_duplicates, remove_duplicates, DuplicateSet};
use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::events::{EventSink, SweepEvent};
use serde::Serialize;
use std::fs;
use std::io;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupeSummary {
    pub dry_run: bool,
    pub files_hashed: u64,
    pub groups: u64,
    pub duplicates: u64,
    /// Deleted, or would be deleted in a dry run.
    pub removed: u64,
    pub bytes_reclaimed: u64,
    /// Files left out of grouping because they could not be read.
    pub unreadable: u64,
    pub errors: u64,
}

/// Summary plus the groups it was computed from.
#[derive(Debug, Clone)]
pub struct DedupeReport {
    pub summary: DedupeSummary,
    pub duplicates: DuplicateSet,
}

pub fn dedupe(config: &SweepConfig, sink: &mut dyn EventSink) -> Result<DedupeReport> {
    let root = config.destination_root();
    let meta = fs::metadata(root).map_err(|source| SweepError::DestinationUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(SweepError::DestinationUnavailable {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    info!("Hashing images under {}", root.display());
    let duplicates = find_duplicates(root, config.classifier(), sink);
    let removal = remove_duplicates(&duplicates, config.dry_run(), sink);

    let summary = DedupeSummary {
        dry_run: config.dry_run(),
        files_hashed: duplicates.files_hashed,
        groups: duplicates.groups.len() as u64,
        duplicates: duplicates.duplicate_count(),
        removed: removal.removed,
        bytes_reclaimed: removal.bytes_reclaimed,
        unreadable: duplicates.unreadable.len() as u64,
        errors: removal.errors,
    };
    info!(
        "{} duplicate(s) in {} group(s), {} bytes reclaimable",
        summary.duplicates, summary.groups, summary.bytes_reclaimed
    );
    sink.emit(SweepEvent::Finished(RunSummary::Dedupe(summary.clone())));
    Ok(DedupeReport {
        summary,
        duplicates,
    })
}
