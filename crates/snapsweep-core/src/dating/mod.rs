/// Capture-date resolution and date-prefixed renaming.
///
/// A [`DateResolver`] holds an ordered list of [`DateSource`]s and returns
/// the first date any of them produces. The default chain is embedded
/// metadata (EXIF `DateTimeOriginal`) followed by the filesystem creation
/// time. Resolution never fails: if every source is empty the current local
/// date is used.
pub mod rename;
pub mod source;

pub use rename::{date_prefix, dated_name, rename_with_date, RenameOutcome};
pub use source::{DateSource, ExifDateSource, FilesystemDateSource};

use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::debug;

/// A resolved date and the name of the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub source: &'static str,
}

pub struct DateResolver {
    sources: Vec<Box<dyn DateSource + Send + Sync>>,
}

impl Default for DateResolver {
    /// Metadata first, filesystem second.
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExifDateSource),
            Box::new(FilesystemDateSource),
        ])
    }
}

impl DateResolver {
    pub fn new(sources: Vec<Box<dyn DateSource + Send + Sync>>) -> Self {
        Self { sources }
    }

    /// Chain without the metadata capability.
    pub fn filesystem_only() -> Self {
        Self::new(vec![Box::new(FilesystemDateSource)])
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, path: &Path) -> ResolvedDate {
        for source in &self.sources {
            if let Some(date) = source.capture_date(path) {
                debug!("{}: {date} from {}", path.display(), source.name());
                return ResolvedDate {
                    date,
                    source: source.name(),
                };
            }
        }
        ResolvedDate {
            date: Local::now().date_naive(),
            source: "today",
        }
    }

    pub fn resolve_date(&self, path: &Path) -> NaiveDate {
        self.resolve(path).date
    }
}
