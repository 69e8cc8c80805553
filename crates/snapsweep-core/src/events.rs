/// Structured run events.
///
/// The engine never prints. Every observable step is emitted as a
/// [`SweepEvent`] into an [`EventSink`] owned by the caller, which decides
/// how to render or persist it.
use crate::ops::RunSummary;
use crossbeam_channel::Sender;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum SweepEvent {
    /// A volume scan is starting.
    VolumeStarted { label: String, root: PathBuf },
    /// Periodic scan counters; also sent once when a volume is finished.
    ScanProgress {
        label: String,
        entries_seen: u64,
        images_found: u64,
        current_path: PathBuf,
    },
    /// A qualifying image was found.
    FileFound { path: PathBuf, size: u64 },
    /// A file was moved (or, in a dry run, would be moved).
    Transferred {
        source: PathBuf,
        destination: PathBuf,
        collided: bool,
        dry_run: bool,
    },
    /// Transfer progress within one volume (`done` of `total`).
    TransferProgress { done: u64, total: u64, dry_run: bool },
    /// A non-survivor member of a duplicate group.
    DuplicateFound {
        survivor: PathBuf,
        duplicate: PathBuf,
        size: u64,
    },
    /// A duplicate was deleted (or would be, in a dry run).
    Removed {
        path: PathBuf,
        size: u64,
        dry_run: bool,
    },
    Renamed {
        source: PathBuf,
        destination: PathBuf,
        collided: bool,
        dry_run: bool,
    },
    /// A file was left as is, e.g. already carrying a date prefix.
    Skipped { path: PathBuf, reason: String },
    /// A non-fatal per-file or per-directory failure.
    Error { path: PathBuf, message: String },
    Finished(RunSummary),
}

/// Destination for run events.
pub trait EventSink {
    fn emit(&mut self, event: SweepEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SweepEvent) {}
}

/// Collects events in memory.
impl EventSink for Vec<SweepEvent> {
    fn emit(&mut self, event: SweepEvent) {
        self.push(event);
    }
}

/// Forwards events to another thread.
///
/// A disconnected receiver is not an error for the engine: the run
/// continues and its summary is still returned to the caller.
impl EventSink for Sender<SweepEvent> {
    fn emit(&mut self, event: SweepEvent) {
        let _ = self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<SweepEvent> = Vec::new();
        sink.emit(SweepEvent::Skipped {
            path: PathBuf::from("a"),
            reason: "first".into(),
        });
        sink.emit(SweepEvent::Skipped {
            path: PathBuf::from("b"),
            reason: "second".into(),
        });
        assert_eq!(sink.len(), 2);
        assert!(matches!(&sink[0], SweepEvent::Skipped { reason, .. } if reason == "first"));
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = crossbeam_channel::unbounded::<SweepEvent>();
        drop(rx);
        tx.emit(SweepEvent::Error {
            path: PathBuf::from("x"),
            message: "ignored".into(),
        });
    }
}
