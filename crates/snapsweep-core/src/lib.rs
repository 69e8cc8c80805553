/// snapsweep core — image classification and safe-transfer engine.
///
/// This crate holds every rule that can lose or corrupt data, with zero
/// terminal I/O. Frontends drive it through plain function calls and
/// receive progress on an [`events::EventSink`].
///
/// # Modules
///
/// - [`policy`] — Directory exclusion rules and the image extension set.
/// - [`scanner`] — Lazy, pruning volume walker producing [`model::FileRecord`]s.
/// - [`transfer`] — Move/rename that never overwrites an existing file.
/// - [`analysis`] — Content-hash duplicate detection and removal.
/// - [`dating`] — Capture-date resolution and `YYYYMMDD_` renaming.
/// - [`ops`] — Organize / Deduplicate / Rename orchestrators.
/// - [`platform`] — Volume (drive) enumeration.
pub mod analysis;
pub mod config;
pub mod dating;
pub mod error;
pub mod events;
pub mod model;
pub mod ops;
pub mod platform;
pub mod policy;
pub mod scanner;
pub mod transfer;

pub use config::SweepConfig;
pub use error::{Result, SweepError};
pub use events::{EventSink, NullSink, SweepEvent};
pub use model::{FileRecord, Volume};
