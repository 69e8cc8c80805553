/// Immutable run configuration.
///
/// Built once by the caller and passed by reference into every
/// orchestrator, so tests can run with isolated extension and exclusion
/// sets.
use crate::policy::{ExclusionPolicy, ImageClassifier};
use std::path::{Path, PathBuf};

/// Default name of the destination folder the CLI creates on the desktop.
pub const DEFAULT_DESTINATION_NAME: &str = "Photos to Clean";

#[derive(Debug, Clone)]
pub struct SweepConfig {
    destination_root: PathBuf,
    exclusions: ExclusionPolicy,
    classifier: ImageClassifier,
    dry_run: bool,
}

impl SweepConfig {
    /// Built-in exclusions and extensions; the destination root is always
    /// excluded from scanning.
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        let destination_root = destination_root.into();
        Self {
            exclusions: ExclusionPolicy::new(&destination_root),
            classifier: ImageClassifier::default(),
            destination_root,
            dry_run: false,
        }
    }

    pub fn with_custom_exclusions<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclusions = self.exclusions.with_custom_fragments(fragments);
        self
    }

    pub fn with_classifier(mut self, classifier: ImageClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_extensions<I, S>(self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_classifier(ImageClassifier::with_extensions(extensions))
    }

    /// Preview mode: compute everything, mutate nothing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn exclusions(&self) -> &ExclusionPolicy {
        &self.exclusions
    }

    pub fn classifier(&self) -> &ImageClassifier {
        &self.classifier
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
