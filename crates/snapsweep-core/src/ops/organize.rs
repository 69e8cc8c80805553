/// Organize: gather images from every volume into
/// `<destination>/Images from <label>/`.
use super::RunSummary;
use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::events::{EventSink, SweepEvent};
use crate::model::{FileRecord, Volume};
use crate::scanner::progress::PROGRESS_INTERVAL;
use crate::scanner::Scanner;
use crate::transfer::{transfer, TransferMode};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Emit a transfer progress event every this many files.
const TRANSFER_PROGRESS_EVERY: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeStats {
    pub label: String,
    pub root: PathBuf,
    pub found: u64,
    /// Moved, or planned in a dry run.
    pub moved: u64,
    pub collisions: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizeSummary {
    pub dry_run: bool,
    pub destination: PathBuf,
    pub total_found: u64,
    pub total_moved: u64,
    pub collisions: u64,
    pub total_errors: u64,
    pub by_volume: Vec<VolumeStats>,
}

/// Scan each volume, then move its images into its destination folder.
///
/// Fails before any mutation when `volumes` is empty or the destination
/// root cannot be created. A dry run neither creates directories nor moves
/// files; its counters describe what a real run would do.
pub fn organize(
    config: &SweepConfig,
    volumes: &[Volume],
    sink: &mut dyn EventSink,
) -> Result<OrganizeSummary> {
    if volumes.is_empty() {
        return Err(SweepError::NoVolumes);
    }
    let destination = config.destination_root();
    let dry_run = config.dry_run();
    if !dry_run {
        fs::create_dir_all(destination).map_err(|source| SweepError::DestinationUnavailable {
            path: destination.to_path_buf(),
            source,
        })?;
    }
    info!(
        "Organizing {} volume(s) into {}{}",
        volumes.len(),
        destination.display(),
        if dry_run { " (dry run)" } else { "" }
    );

    let scanner = Scanner::for_volume(config.exclusions(), config.classifier());
    let mut summary = OrganizeSummary {
        dry_run,
        destination: destination.to_path_buf(),
        ..Default::default()
    };

    for volume in volumes {
        let mut stats = VolumeStats {
            label: volume.label.clone(),
            root: volume.root.clone(),
            ..Default::default()
        };
        sink.emit(SweepEvent::VolumeStarted {
            label: volume.label.clone(),
            root: volume.root.clone(),
        });

        let records = collect_volume(&scanner, volume, &mut stats, sink);
        stats.found = records.len() as u64;
        info!("Found {} image(s) on {}", stats.found, volume.label);

        if !records.is_empty() {
            move_records(config, volume, &records, &mut stats, sink);
        }

        summary.total_found += stats.found;
        summary.total_moved += stats.moved;
        summary.collisions += stats.collisions;
        summary.total_errors += stats.errors;
        summary.by_volume.push(stats);
    }

    sink.emit(SweepEvent::Finished(RunSummary::Organize(summary.clone())));
    Ok(summary)
}

/// Drain a full scan of `volume` before anything moves, so transfers never
/// race the walk.
fn collect_volume(
    scanner: &Scanner,
    volume: &Volume,
    stats: &mut VolumeStats,
    sink: &mut dyn EventSink,
) -> Vec<FileRecord> {
    let mut iter = scanner.scan(&volume.root, &volume.label);
    let mut records = Vec::new();
    let mut next_report = PROGRESS_INTERVAL;

    while let Some(item) = iter.next() {
        match item {
            Ok(record) => {
                sink.emit(SweepEvent::FileFound {
                    path: record.path.clone(),
                    size: record.size,
                });
                records.push(record);
            }
            Err(issue) => {
                stats.errors += 1;
                sink.emit(SweepEvent::Error {
                    path: issue.path,
                    message: issue.message,
                });
            }
        }

        let seen = iter.stats().entries_seen;
        if seen >= next_report {
            next_report = seen + PROGRESS_INTERVAL;
            sink.emit(progress_event(&iter));
        }
    }

    sink.emit(progress_event(&iter));
    records
}

fn progress_event(iter: &crate::scanner::ScanIter) -> SweepEvent {
    let stats = iter.stats();
    SweepEvent::ScanProgress {
        label: iter.label().to_string(),
        entries_seen: stats.entries_seen,
        images_found: stats.images_found,
        current_path: iter.current_path().to_path_buf(),
    }
}

fn move_records(
    config: &SweepConfig,
    volume: &Volume,
    records: &[FileRecord],
    stats: &mut VolumeStats,
    sink: &mut dyn EventSink,
) {
    let dry_run = config.dry_run();
    let folder = config.destination_root().join(volume.folder_name());
    if !dry_run {
        if let Err(err) = fs::create_dir_all(&folder) {
            warn!("Cannot create {}: {err}", folder.display());
            stats.errors += records.len() as u64;
            sink.emit(SweepEvent::Error {
                path: folder,
                message: err.to_string(),
            });
            return;
        }
    }

    let total = records.len() as u64;
    for (done, record) in (1..).zip(records) {
        let Some(name) = record.file_name() else {
            continue;
        };
        match transfer(&record.path, &folder.join(name), TransferMode::Move, dry_run) {
            Ok(outcome) => {
                stats.moved += 1;
                if outcome.collided {
                    stats.collisions += 1;
                }
                sink.emit(SweepEvent::Transferred {
                    source: record.path.clone(),
                    destination: outcome.destination,
                    collided: outcome.collided,
                    dry_run,
                });
            }
            Err(err) => {
                warn!("Cannot move {}: {err}", record.path.display());
                stats.errors += 1;
                sink.emit(SweepEvent::Error {
                    path: record.path.clone(),
                    message: err.to_string(),
                });
            }
        }

        if done % TRANSFER_PROGRESS_EVERY == 0 || done == total {
            sink.emit(SweepEvent::TransferProgress {
                done,
                total,
                dry_run,
            });
        }
    }
}
