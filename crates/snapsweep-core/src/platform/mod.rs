/// Platform-specific volume enumeration.
///
/// The engine itself never discovers volumes; frontends call
/// [`enumerate_drives`] and pass the roots they choose to the orchestrators.
pub mod drives;

pub use drives::{enumerate_drives, DriveInfo, DriveType};
