/// Data model shared by the scanner, the transfer primitive and the
/// orchestrators.
pub mod record;
pub mod size;

pub use record::{FileRecord, Volume};
