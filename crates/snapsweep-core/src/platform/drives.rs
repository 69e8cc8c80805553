/// Drive enumeration.
///
/// On Windows this lists local drive roots through the Win32 API. Other
/// platforms have a single filesystem root, which is returned as a fixed
/// drive.
use crate::model::size::format_bytes;
use crate::model::Volume;
use std::path::PathBuf;

/// Information about a single drive.
#[derive(Debug, Clone)]
pub struct DriveInfo {
    /// Mount point path, e.g. "C:\".
    pub path: PathBuf,
    /// Drive letter, e.g. "C:". Empty where drives have no letters.
    pub letter: String,
    pub drive_type: DriveType,
    /// Volume label (e.g. "Windows", "Data").
    pub label: String,
    /// Filesystem name (e.g. "NTFS", "FAT32").
    pub filesystem: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl DriveInfo {
    /// The scan target for this drive.
    pub fn volume(&self) -> Volume {
        Volume::from_root(self.path.clone())
    }

    /// One-line description for listings.
    pub fn describe(&self) -> String {
        let name = if self.label.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", self.label)
        };
        let filesystem = if self.filesystem.is_empty() {
            String::new()
        } else {
            format!(", {}", self.filesystem)
        };
        let mut line = format!(
            "{}{} [{}{}]",
            self.path.display(),
            name,
            self.drive_type.label(),
            filesystem
        );
        // Capacity is unknown off Windows.
        if self.total_bytes > 0 {
            line.push_str(&format!(
                " {} free of {}",
                format_bytes(self.free_bytes),
                format_bytes(self.total_bytes)
            ));
        }
        line
    }
}

/// Drive type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Fixed,
    Removable,
    Network,
    CdRom,
    Unknown,
}

impl DriveType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Removable => "Removable",
            Self::Network => "Network",
            Self::CdRom => "CD-ROM",
            Self::Unknown => "Unknown",
        }
    }
}

/// UTF-16 buffer up to its first NUL, or the whole buffer if unterminated.
#[cfg_attr(not(windows), allow(dead_code))]
fn until_nul(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

/// Enumerate all local drives. Network drives are never returned.
#[cfg(windows)]
pub fn enumerate_drives() -> Vec<DriveInfo> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::Win32::Storage::FileSystem::{
        GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    };

    const DRIVE_REMOVABLE_VAL: u32 = 2;
    const DRIVE_FIXED_VAL: u32 = 3;
    const DRIVE_REMOTE_VAL: u32 = 4;
    const DRIVE_CDROM_VAL: u32 = 5;

    let mut drives = Vec::new();

    // Null-separated list of drive roots.
    let mut buffer = [0u16; 256];
    let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
    if len == 0 {
        tracing::warn!("GetLogicalDriveStringsW returned 0");
        return drives;
    }
    let full = OsString::from_wide(&buffer[..len as usize]);
    let full_str = full.to_string_lossy();

    for root in full_str.split('\0').filter(|s| !s.is_empty()) {
        let root_wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
        let root_pcwstr = windows::core::PCWSTR(root_wide.as_ptr());

        let drive_type = match unsafe { GetDriveTypeW(root_pcwstr) } {
            DRIVE_FIXED_VAL => DriveType::Fixed,
            DRIVE_REMOVABLE_VAL => DriveType::Removable,
            DRIVE_REMOTE_VAL => DriveType::Network,
            DRIVE_CDROM_VAL => DriveType::CdRom,
            _ => DriveType::Unknown,
        };
        if drive_type == DriveType::Network {
            continue;
        }

        let mut label_buf = [0u16; 256];
        let mut fs_buf = [0u16; 256];
        let has_volume_info = unsafe {
            GetVolumeInformationW(
                root_pcwstr,
                Some(&mut label_buf),
                None,
                None,
                None,
                Some(&mut fs_buf),
            )
            .is_ok()
        };
        let (label, filesystem) = if has_volume_info {
            (until_nul(&label_buf), until_nul(&fs_buf))
        } else {
            (String::new(), String::new())
        };

        let mut free_caller: u64 = 0;
        let mut total: u64 = 0;
        let has_space = unsafe {
            GetDiskFreeSpaceExW(
                root_pcwstr,
                Some(&mut free_caller as *mut u64),
                Some(&mut total as *mut u64),
                None,
            )
            .is_ok()
        };
        let (total_bytes, free_bytes) = if has_space {
            (total, free_caller)
        } else {
            (0, 0)
        };

        drives.push(DriveInfo {
            path: PathBuf::from(root),
            letter: root.trim_end_matches('\\').to_string(),
            drive_type,
            label,
            filesystem,
            total_bytes,
            free_bytes,
        });
    }

    drives
}

/// Enumerate all local drives: the filesystem root.
#[cfg(not(windows))]
pub fn enumerate_drives() -> Vec<DriveInfo> {
    vec![DriveInfo {
        path: PathBuf::from("/"),
        letter: String::new(),
        drive_type: DriveType::Fixed,
        label: String::new(),
        filesystem: String::new(),
        total_bytes: 0,
        free_bytes: 0,
    }]
}
