/// Scan counters — cheap `Copy` snapshots the orchestrators turn into
/// progress events.

/// How many walked entries pass between two progress events.
pub const PROGRESS_INTERVAL: u64 = 500;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Files and directories seen below the root (pruned ones excluded).
    pub entries_seen: u64,
    pub dirs_entered: u64,
    pub images_found: u64,
    /// Unreadable directories or files.
    pub errors: u64,
}
