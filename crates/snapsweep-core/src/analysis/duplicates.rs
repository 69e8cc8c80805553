/// Exact-content duplicate detection (BLAKE3 over the full file).
///
/// Two files are duplicates if and only if their bytes are identical.
/// Names, sizes and timestamps are never used as evidence.
///
/// Strategy:
/// 1. Walk the destination tree in sorted order (see [`Scanner`]) and hash
///    every image in full.
/// 2. Group by digest in discovery order. Groups of one are dropped.
/// 3. The first-discovered member of a group is its survivor; the rest are
///    removal candidates. Because the walk is sorted, the survivor is the
///    lexically first path and does not depend on the platform.
///
/// A file that cannot be read while hashing is reported and left out of
/// every group, so it is neither a survivor nor deleted.
use crate::error::{Result, SweepError};
use crate::events::{EventSink, SweepEvent};
use crate::policy::ImageClassifier;
use crate::scanner::Scanner;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file inside a duplicate group, relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateFile {
    pub relative_path: PathBuf,
    pub size: u64,
}

/// Files sharing one content digest, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Lowercase hex BLAKE3 digest.
    pub digest: String,
    pub files: Vec<DuplicateFile>,
}

impl DuplicateGroup {
    /// The retained member.
    pub fn survivor(&self) -> &DuplicateFile {
        &self.files[0]
    }

    /// Members marked for removal.
    pub fn removable(&self) -> &[DuplicateFile] {
        &self.files[1..]
    }
}

/// Result of a detection pass. Built fresh for each run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateSet {
    pub root: PathBuf,
    /// Only groups with two or more members, in discovery order of their
    /// first member.
    pub groups: Vec<DuplicateGroup>,
    pub files_hashed: u64,
    /// Files that could not be read and were excluded from grouping.
    pub unreadable: Vec<(PathBuf, String)>,
}

impl DuplicateSet {
    pub fn duplicate_count(&self) -> u64 {
        self.groups.iter().map(|g| g.removable().len() as u64).sum()
    }

    /// Bytes freed by deleting every non-survivor.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups
            .iter()
            .flat_map(|g| g.removable())
            .map(|f| f.size)
            .sum()
    }

    /// Write the groups as CSV rows: digest, role, path, size.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let report_err = |source| SweepError::Report {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(report_err)?;
        writer
            .write_record(["digest", "role", "path", "size"])
            .map_err(report_err)?;
        for group in &self.groups {
            for (i, file) in group.files.iter().enumerate() {
                let role = if i == 0 { "survivor" } else { "duplicate" };
                let full = self.root.join(&file.relative_path);
                let full = full.to_string_lossy();
                let size = file.size.to_string();
                writer
                    .write_record([group.digest.as_str(), role, full.as_ref(), size.as_str()])
                    .map_err(report_err)?;
            }
        }
        writer
            .flush()
            .map_err(|e| report_err(csv::Error::from(e)))?;
        Ok(())
    }
}

/// What a removal pass deleted (or would delete).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalSummary {
    pub removed: u64,
    pub bytes_reclaimed: u64,
    pub errors: u64,
    pub dry_run: bool,
}

/// Full-content BLAKE3 digest of `path` as lowercase hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update_reader(BufReader::new(file))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Hash every image under `destination_root` and group identical content.
///
/// Only the destination tree is read; source volumes are never touched.
pub fn find_duplicates(
    destination_root: &Path,
    classifier: &ImageClassifier,
    sink: &mut dyn EventSink,
) -> DuplicateSet {
    let scanner = Scanner::for_destination(classifier);
    let mut set = DuplicateSet {
        root: destination_root.to_path_buf(),
        ..Default::default()
    };
    let mut by_digest: HashMap<String, Vec<DuplicateFile>> = HashMap::new();
    // Digests in order of first discovery.
    let mut order: Vec<String> = Vec::new();

    for item in scanner.scan(destination_root, "destination") {
        let record = match item {
            Ok(record) => record,
            Err(issue) => {
                sink.emit(SweepEvent::Error {
                    path: issue.path.clone(),
                    message: issue.message.clone(),
                });
                set.unreadable.push((issue.path, issue.message));
                continue;
            }
        };

        let digest = match hash_file(&record.path) {
            Ok(digest) => digest,
            Err(err) => {
                warn!("Cannot hash {}: {err}", record.path.display());
                sink.emit(SweepEvent::Error {
                    path: record.path.clone(),
                    message: format!("unreadable during hashing: {err}"),
                });
                set.unreadable.push((record.path, err.to_string()));
                continue;
            }
        };
        set.files_hashed += 1;

        let relative_path = record
            .path
            .strip_prefix(destination_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| record.path.clone());
        let files = by_digest.entry(digest.clone()).or_insert_with(|| {
            order.push(digest);
            Vec::new()
        });
        files.push(DuplicateFile {
            relative_path,
            size: record.size,
        });
    }

    for digest in order {
        let Some(files) = by_digest.remove(&digest) else {
            continue;
        };
        if files.len() < 2 {
            continue;
        }
        let survivor = destination_root.join(&files[0].relative_path);
        for dup in &files[1..] {
            sink.emit(SweepEvent::DuplicateFound {
                survivor: survivor.clone(),
                duplicate: destination_root.join(&dup.relative_path),
                size: dup.size,
            });
        }
        set.groups.push(DuplicateGroup { digest, files });
    }

    debug!(
        "Hashed {} files under {}: {} duplicate groups",
        set.files_hashed,
        destination_root.display(),
        set.groups.len()
    );
    set
}

/// Delete every non-survivor in `set`.
///
/// A dry run deletes nothing and reports exactly the count and byte total
/// a real run would remove.
pub fn remove_duplicates(
    set: &DuplicateSet,
    dry_run: bool,
    sink: &mut dyn EventSink,
) -> RemovalSummary {
    let mut summary = RemovalSummary {
        dry_run,
        ..Default::default()
    };

    for file in set.groups.iter().flat_map(|g| g.removable()) {
        let path = set.root.join(&file.relative_path);
        if !dry_run {
            if let Err(err) = fs::remove_file(&path) {
                warn!("Cannot remove {}: {err}", path.display());
                summary.errors += 1;
                sink.emit(SweepEvent::Error {
                    path,
                    message: err.to_string(),
                });
                continue;
            }
        }
        summary.removed += 1;
        summary.bytes_reclaimed += file.size;
        sink.emit(SweepEvent::Removed {
            path,
            size: file.size,
            dry_run,
        });
    }
    summary
}
