/// Volume scanner — walks a root and yields qualifying image records.
///
/// The walk is a `jwalk` traversal configured for this engine's needs:
///
/// - **Serial, sorted.** Entries are read on the calling thread and each
///   directory's children are sorted by name, so two scans of the same
///   tree yield records in the same order on every platform.
/// - **Pre-descent pruning.** Exclusion is evaluated in `process_read_dir`,
///   i.e. on a directory's children *before* they are queued. An excluded
///   directory is never opened or stat'd, and nothing beneath it is yielded.
/// - **Lazy.** [`ScanIter`] pulls one directory at a time; a scan can be
///   abandoned at any point without cost.
///
/// Unreadable directories and files surface as [`ScanIssue`] items; the walk
/// continues with their siblings.
pub mod progress;

use crate::model::FileRecord;
use crate::policy::classifier::extension_of;
use crate::policy::{ExclusionPolicy, ImageClassifier};
use progress::ScanStats;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

type EntryResult = Result<jwalk::DirEntry<((), ())>, jwalk::Error>;

/// A directory or file the scanner could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Scanner configuration: what to prune and what to keep.
#[derive(Debug, Clone)]
pub struct Scanner {
    exclusions: Option<Arc<ExclusionPolicy>>,
    classifier: Arc<ImageClassifier>,
}

impl Scanner {
    /// Scanner for source volumes: prunes with `exclusions`, which always
    /// contains the destination root.
    pub fn for_volume(exclusions: &ExclusionPolicy, classifier: &ImageClassifier) -> Self {
        Self {
            exclusions: Some(Arc::new(exclusions.clone())),
            classifier: Arc::new(classifier.clone()),
        }
    }

    /// Scanner for the destination tree itself: no pruning.
    pub fn for_destination(classifier: &ImageClassifier) -> Self {
        Self {
            exclusions: None,
            classifier: Arc::new(classifier.clone()),
        }
    }

    /// Start a fresh, lazy scan of `root`. Records are tagged with `label`.
    ///
    /// A root that *is* the destination yields nothing; name fragments are
    /// only applied below the root.
    pub fn scan(&self, root: &Path, label: &str) -> ScanIter {
        let walker = match &self.exclusions {
            Some(rules) if rules.is_destination(root) => {
                info!(
                    "Skipping {}: it is the destination root",
                    root.display()
                );
                None
            }
            Some(rules) => Some(build_walker(root, Some(Arc::clone(rules)))),
            None => Some(build_walker(root, None)),
        };

        ScanIter {
            walker,
            root: root.to_path_buf(),
            label: label.to_string(),
            classifier: Arc::clone(&self.classifier),
            stats: ScanStats::default(),
            current_path: root.to_path_buf(),
        }
    }
}

fn build_walker(
    root: &Path,
    exclusions: Option<Arc<ExclusionPolicy>>,
) -> Box<dyn Iterator<Item = EntryResult>> {
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    match exclusions {
        Some(rules) => Box::new(
            walker
                .process_read_dir(move |_depth, _dir, _state, children| {
                    children.retain(|child| match child {
                        Ok(entry) if entry.file_type().is_dir() => {
                            let path = entry.path();
                            let excluded = rules.is_excluded(&path);
                            if excluded {
                                debug!("Pruned excluded directory {}", path.display());
                            }
                            !excluded
                        }
                        _ => true,
                    });
                })
                .into_iter(),
        ),
        None => Box::new(walker.into_iter()),
    }
}

/// Lazy sequence of image records for one root.
pub struct ScanIter {
    walker: Option<Box<dyn Iterator<Item = EntryResult>>>,
    root: PathBuf,
    label: String,
    classifier: Arc<ImageClassifier>,
    stats: ScanStats,
    current_path: PathBuf,
}

impl ScanIter {
    /// Running counters for progress reporting.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Last path the walk touched.
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Iterator for ScanIter {
    type Item = Result<FileRecord, ScanIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        let walker = self.walker.as_mut()?;
        loop {
            let entry = match walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    // jwalk only errors on directory reads and entry stats.
                    self.stats.errors += 1;
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.current_path.clone());
                    warn!("Cannot read {}: {err}", path.display());
                    return Some(Err(ScanIssue {
                        path,
                        message: err.to_string(),
                    }));
                }
            };

            let path = entry.path();
            if path == self.root {
                continue;
            }
            self.stats.entries_seen += 1;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                self.stats.dirs_entered += 1;
                self.current_path = path;
                continue;
            }
            // Symlinks and special files are never transferred.
            if !file_type.is_file() || !self.classifier.is_image(&path) {
                continue;
            }

            let size = match std::fs::symlink_metadata(&path) {
                Ok(meta) => meta.len(),
                Err(err) => {
                    self.stats.errors += 1;
                    warn!("Cannot stat {}: {err}", path.display());
                    return Some(Err(ScanIssue {
                        path,
                        message: err.to_string(),
                    }));
                }
            };

            self.stats.images_found += 1;
            self.current_path = path.clone();
            let extension = extension_of(&path).unwrap_or_default();
            return Some(Ok(FileRecord {
                path,
                volume: self.label.clone(),
                size,
                extension,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, bytes: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, bytes).unwrap();
    }

    fn names(records: &[FileRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn yields_only_images_with_sizes() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"12345");
        touch(&tmp.path().join("notes.txt"), b"x");
        touch(&tmp.path().join("sub/b.PNG"), b"123");

        let policy = ExclusionPolicy::new(&tmp.path().join("dest"));
        let scanner = Scanner::for_volume(&policy, &ImageClassifier::default());
        let records: Vec<FileRecord> = scanner
            .scan(tmp.path(), "vol")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(names(&records), vec!["a.jpg", "b.PNG"]);
        assert_eq!(records[0].size, 5);
        assert_eq!(records[1].extension.as_str(), "png");
        assert!(records.iter().all(|r| r.volume == "vol"));
    }

    #[test]
    fn excluded_subtrees_are_never_yielded() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("keep/a.jpg"), b"a");
        touch(&tmp.path().join("node_modules/pkg/icon.png"), b"b");
        touch(&tmp.path().join("Games/SteamLibrary/shot.jpg"), b"c");

        let policy = ExclusionPolicy::new(&tmp.path().join("dest"));
        let scanner = Scanner::for_volume(&policy, &ImageClassifier::default());
        let records: Vec<FileRecord> = scanner
            .scan(tmp.path(), "vol")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(names(&records), vec!["a.jpg"]);
    }

    #[test]
    fn destination_inside_volume_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("Photos to Clean");
        touch(&dest.join("Images from X/old.jpg"), b"old");
        touch(&tmp.path().join("new.jpg"), b"new");

        let policy = ExclusionPolicy::new(&dest);
        let scanner = Scanner::for_volume(&policy, &ImageClassifier::default());
        let records: Vec<FileRecord> = scanner
            .scan(tmp.path(), "vol")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(names(&records), vec!["new.jpg"]);
    }

    #[test]
    fn scanning_the_destination_itself_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), b"a");

        let policy = ExclusionPolicy::new(tmp.path());
        let scanner = Scanner::for_volume(&policy, &ImageClassifier::default());
        assert_eq!(scanner.scan(tmp.path(), "vol").count(), 0);
    }

    #[test]
    fn destination_scanner_does_not_prune() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Images from Drive Steam/a.jpg"), b"a");

        let scanner = Scanner::for_destination(&ImageClassifier::default());
        let records: Vec<FileRecord> = scanner
            .scan(tmp.path(), "dest")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn order_is_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            touch(&tmp.path().join(name), b"x");
        }
        let scanner = Scanner::for_destination(&ImageClassifier::default());
        let records: Vec<FileRecord> = scanner
            .scan(tmp.path(), "dest")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(names(&records), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn missing_root_reports_issue_instead_of_panicking() {
        let tmp = TempDir::new().unwrap();
        let scanner = Scanner::for_destination(&ImageClassifier::default());
        let items: Vec<_> = scanner.scan(&tmp.path().join("absent"), "x").collect();
        assert!(items.iter().all(|i| i.is_err()));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_reported_and_siblings_still_scanned() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("locked/hidden.jpg"), b"h");
        touch(&tmp.path().join("open/visible.jpg"), b"v");
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root ignores permission bits; nothing to test then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let policy = ExclusionPolicy::new(&tmp.path().join("dest"));
        let scanner = Scanner::for_volume(&policy, &ImageClassifier::default());
        let mut iter = scanner.scan(tmp.path(), "vol");
        let items: Vec<_> = iter.by_ref().collect();
        let stats = iter.stats();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let records: Vec<FileRecord> = items.iter().filter_map(|i| i.clone().ok()).collect();
        let issues: Vec<&ScanIssue> = items.iter().filter_map(|i| i.as_ref().err()).collect();
        assert_eq!(names(&records), vec!["visible.jpg"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn stats_count_entries_and_images() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("d/a.jpg"), b"a");
        touch(&tmp.path().join("d/b.txt"), b"b");

        let scanner = Scanner::for_destination(&ImageClassifier::default());
        let mut iter = scanner.scan(tmp.path(), "dest");
        while iter.next().is_some() {}
        let stats = iter.stats();
        assert_eq!(stats.images_found, 1);
        assert_eq!(stats.dirs_entered, 1);
        assert_eq!(stats.entries_seen, 3);
    }
}
