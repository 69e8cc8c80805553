/// Volumes and the file records the scanner produces for them.
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An independently rooted storage unit to scan, e.g. a drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Directory the scan starts from.
    pub root: PathBuf,
    /// Label used in the destination layout (`Images from <label>`).
    pub label: String,
}

impl Volume {
    pub fn new(root: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            label: label.into(),
        }
    }

    /// Derive the label from the root path.
    ///
    /// A drive root such as `C:\` becomes `Drive C`; any other root uses its
    /// final component, and `/` becomes `Root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let label = label_for_root(&root);
        Self { root, label }
    }

    /// Name of this volume's folder under the destination root.
    pub fn folder_name(&self) -> String {
        format!("Images from {}", self.label)
    }
}

fn label_for_root(root: &Path) -> String {
    let text = root.to_string_lossy();
    if let Some(letter) = drive_letter(&text) {
        return format!("Drive {letter}");
    }
    match root.file_name() {
        Some(name) => sanitize_label(&name.to_string_lossy()),
        None => "Root".to_string(),
    }
}

/// `C:`, `C:\` and `C:/` all name drive C.
fn drive_letter(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_alphabetic() || chars.next()? != ':' {
        return None;
    }
    match chars.as_str() {
        "" | "\\" | "/" => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

/// Labels become directory names, so separators are not allowed.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

/// A qualifying image found during a scan.
///
/// Immutable; consumed once by a transfer or a hash operation. After a
/// transfer the filesystem is authoritative and the record is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Label of the volume the file was found on.
    pub volume: String,
    pub size: u64,
    /// Lowercase extension without the dot.
    pub extension: CompactString,
}

impl FileRecord {
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}
