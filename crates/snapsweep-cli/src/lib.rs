/// snapsweep command-line frontend.
///
/// Parses arguments, runs one engine operation on a worker thread, and
/// renders the event stream and the final summary. All file-handling rules
/// live in `snapsweep-core`.
pub mod app;
pub mod cli;
pub mod report;

pub use app::run;
pub use cli::{Cli, Commands};
