/// Rename: prefix every image in the destination tree with its capture
/// date.
use super::RunSummary;
use crate::config::SweepConfig;
use crate::dating::{rename_with_date, DateResolver, RenameOutcome};
use crate::error::{Result, SweepError};
use crate::events::{EventSink, SweepEvent};
use crate::model::FileRecord;
use crate::scanner::Scanner;
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameSummary {
    pub dry_run: bool,
    pub override_existing: bool,
    pub examined: u64,
    pub renamed: u64,
    pub collisions: u64,
    /// Already dated, left alone.
    pub skipped: u64,
    pub unchanged: u64,
    pub errors: u64,
}

pub fn rename(
    config: &SweepConfig,
    resolver: &DateResolver,
    override_existing: bool,
    sink: &mut dyn EventSink,
) -> Result<RenameSummary> {
    let root = config.destination_root();
    fs::metadata(root).map_err(|source| SweepError::DestinationUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    let dry_run = config.dry_run();
    let mut summary = RenameSummary {
        dry_run,
        override_existing,
        ..Default::default()
    };

    // Collect first: a renamed file must not be visited twice.
    let mut records: Vec<FileRecord> = Vec::new();
    for item in Scanner::for_destination(config.classifier()).scan(root, "destination") {
        match item {
            Ok(record) => records.push(record),
            Err(issue) => {
                summary.errors += 1;
                sink.emit(SweepEvent::Error {
                    path: issue.path,
                    message: issue.message,
                });
            }
        }
    }
    info!("Renaming {} image(s) under {}", records.len(), root.display());

    for record in records {
        summary.examined += 1;
        match rename_with_date(&record.path, resolver, override_existing, dry_run) {
            Ok(RenameOutcome::Renamed { transfer, .. }) => {
                summary.renamed += 1;
                if transfer.collided {
                    summary.collisions += 1;
                }
                sink.emit(SweepEvent::Renamed {
                    source: record.path,
                    destination: transfer.destination,
                    collided: transfer.collided,
                    dry_run,
                });
            }
            Ok(RenameOutcome::AlreadyDated { date }) => {
                summary.skipped += 1;
                sink.emit(SweepEvent::Skipped {
                    path: record.path,
                    reason: format!("already dated {}", date.format("%Y-%m-%d")),
                });
            }
            Ok(RenameOutcome::Unchanged) => {
                summary.unchanged += 1;
            }
            Err(err) => {
                warn!("Cannot rename {}: {err}", record.path.display());
                summary.errors += 1;
                sink.emit(SweepEvent::Error {
                    path: record.path,
                    message: err.to_string(),
                });
            }
        }
    }

    sink.emit(SweepEvent::Finished(RunSummary::Rename(summary.clone())));
    Ok(summary)
}
