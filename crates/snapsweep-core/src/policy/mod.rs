/// Traversal policy — which directories the scanner may enter and which
/// files count as images.
///
/// Both policies are immutable values built once per run and handed to the
/// components that need them.
pub mod classifier;
pub mod exclusion;

pub use classifier::{ImageClassifier, IMAGE_EXTENSIONS};
pub use exclusion::{ExclusionPolicy, BUILTIN_FRAGMENTS};
