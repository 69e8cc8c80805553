/// Orchestrators — sequence the engine components for one operation,
/// count outcomes and emit events. All per-file failures are local: they
/// are logged, emitted and counted, and the run continues.
pub mod dedupe;
pub mod organize;
pub mod rename;

pub use dedupe::{dedupe, DedupeReport, DedupeSummary};
pub use organize::{organize, OrganizeSummary, VolumeStats};
pub use rename::{rename, RenameSummary};

use serde::Serialize;

/// Summary of any operation, as emitted in [`crate::SweepEvent::Finished`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum RunSummary {
    Organize(OrganizeSummary),
    Dedupe(DedupeSummary),
    Rename(RenameSummary),
}
