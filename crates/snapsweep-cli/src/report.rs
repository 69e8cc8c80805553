/// Human-readable rendering of events and summaries, and the run log file.
use chrono::Local;
use snapsweep_core::model::size::format_bytes;
use snapsweep_core::ops::RunSummary;
use snapsweep_core::SweepEvent;
use std::fs;
use std::path::{Path, PathBuf};

const RULE: &str = "======================================================================";

/// How loudly an event is shown on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Progress,
    Detail,
    Problem,
}

/// One-line description of `event`, or `None` for events with no text of
/// their own (the final summary is rendered separately).
pub fn describe(event: &SweepEvent) -> Option<(Level, String)> {
    let line = match event {
        SweepEvent::VolumeStarted { label, root } => (
            Level::Progress,
            format!("Scanning {label} ({})", root.display()),
        ),
        SweepEvent::ScanProgress {
            label,
            entries_seen,
            images_found,
            ..
        } => (
            Level::Progress,
            format!("  {label}: {entries_seen} entries, {images_found} image(s) found"),
        ),
        SweepEvent::FileFound { path, size } => (
            Level::Detail,
            format!("  Found {} ({})", path.display(), format_bytes(*size)),
        ),
        SweepEvent::Transferred {
            source,
            destination,
            collided,
            dry_run,
        } => {
            let verb = if *dry_run { "Would move" } else { "Moved" };
            let note = if *collided { " (name taken, timestamped)" } else { "" };
            let level = if *dry_run { Level::Progress } else { Level::Detail };
            (
                level,
                format!(
                    "  {verb}: {} -> {}{note}",
                    source.display(),
                    destination.display()
                ),
            )
        }
        SweepEvent::TransferProgress {
            done,
            total,
            dry_run,
        } => {
            let verb = if *dry_run { "planned" } else { "moved" };
            (Level::Progress, format!("  Progress: {done}/{total} images {verb}"))
        }
        SweepEvent::DuplicateFound {
            survivor,
            duplicate,
            size,
        } => (
            Level::Detail,
            format!(
                "  Duplicate of {}: {} ({})",
                survivor.display(),
                duplicate.display(),
                format_bytes(*size)
            ),
        ),
        SweepEvent::Removed {
            path,
            size,
            dry_run,
        } => {
            let verb = if *dry_run { "Would delete" } else { "Deleted" };
            (
                Level::Progress,
                format!("  {verb}: {} ({})", path.display(), format_bytes(*size)),
            )
        }
        SweepEvent::Renamed {
            source,
            destination,
            collided,
            dry_run,
        } => {
            let verb = if *dry_run { "Would rename" } else { "Renamed" };
            let note = if *collided { " (name taken, timestamped)" } else { "" };
            (
                Level::Progress,
                format!(
                    "  {verb}: {} -> {}{note}",
                    source.display(),
                    file_name(destination)
                ),
            )
        }
        SweepEvent::Skipped { path, reason } => (
            Level::Detail,
            format!("  Skipped {}: {reason}", path.display()),
        ),
        SweepEvent::Error { path, message } => (
            Level::Problem,
            format!("  Error: {}: {message}", path.display()),
        ),
        SweepEvent::Finished(_) => return None,
    };
    Some(line)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The end-of-run summary block. Always produced, even when files failed.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![RULE.to_string(), "SUMMARY".to_string(), RULE.to_string()];
    match summary {
        RunSummary::Organize(s) => {
            if s.dry_run {
                lines.push("DRY RUN - no files were moved".into());
            }
            lines.push(format!("Destination: {}", s.destination.display()));
            lines.push(format!("Total images found: {}", s.total_found));
            let verb = if s.dry_run { "to move" } else { "moved" };
            lines.push(format!("Total images {verb}: {}", s.total_moved));
            lines.push(format!("Renamed on collision: {}", s.collisions));
            lines.push(format!("Total errors: {}", s.total_errors));
            lines.push(String::new());
            lines.push("By volume:".into());
            for v in &s.by_volume {
                lines.push(format!("  {}: {}/{} moved", v.label, v.moved, v.found));
            }
        }
        RunSummary::Dedupe(s) => {
            if s.dry_run {
                lines.push("DRY RUN - no files were deleted".into());
            }
            lines.push(format!("Files hashed: {}", s.files_hashed));
            lines.push(format!("Duplicate groups: {}", s.groups));
            lines.push(format!("Duplicates: {}", s.duplicates));
            let verb = if s.dry_run { "to remove" } else { "removed" };
            lines.push(format!("Files {verb}: {}", s.removed));
            lines.push(format!("Space reclaimed: {}", format_bytes(s.bytes_reclaimed)));
            lines.push(format!("Unreadable (kept): {}", s.unreadable));
            lines.push(format!("Errors: {}", s.errors));
        }
        RunSummary::Rename(s) => {
            if s.dry_run {
                lines.push("DRY RUN - no files were renamed".into());
            }
            lines.push(format!("Images examined: {}", s.examined));
            let verb = if s.dry_run { "to rename" } else { "renamed" };
            lines.push(format!("Images {verb}: {}", s.renamed));
            lines.push(format!("Renamed on collision: {}", s.collisions));
            lines.push(format!("Skipped (already dated): {}", s.skipped));
            lines.push(format!("Unchanged (date already correct): {}", s.unchanged));
            lines.push(format!("Errors: {}", s.errors));
        }
    }
    lines.push(RULE.to_string());
    lines
}

/// Timestamped copy of every console line, saved into the destination
/// after a real organize run.
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn push(&mut self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.lines.push(format!("[{stamp}] {message}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write `organize_log_YYYYMMDD_HHMMSS.txt` into `dir`.
    pub fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let name = format!("organize_log_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        fs::write(&path, self.lines.join("\n"))?;
        Ok(path)
    }
}
