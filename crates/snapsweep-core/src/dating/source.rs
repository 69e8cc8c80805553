/// Date sources for the resolver chain.
use crate::policy::classifier::extension_of;
use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// A capability that may know when a file was captured.
pub trait DateSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `None` when this source has no answer for `path`.
    fn capture_date(&self, path: &Path) -> Option<NaiveDate>;
}

/// Formats whose containers can carry an EXIF block.
const EXIF_CONTAINERS: &[&str] = &[
    "jpg", "jpeg", "tif", "tiff", "heic", "png", "webp", "cr2", "nef", "orf", "sr2", "raw",
];

/// EXIF "original capture" timestamp (`DateTimeOriginal`, then
/// `DateTimeDigitized`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifDateSource;

impl DateSource for ExifDateSource {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn capture_date(&self, path: &Path) -> Option<NaiveDate> {
        let ext = extension_of(path)?;
        if !EXIF_CONTAINERS.contains(&ext.as_str()) {
            return None;
        }
        let mut reader = BufReader::new(File::open(path).ok()?);
        let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
        let field = exif
            .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
            .or_else(|| exif.get_field(exif::Tag::DateTimeDigitized, exif::In::PRIMARY))?;
        match &field.value {
            exif::Value::Ascii(parts) => parts.first().and_then(|raw| parse_exif_date(raw)),
            _ => None,
        }
    }
}

/// `YYYY:MM:DD HH:MM:SS` → calendar date. Zeroed or impossible dates
/// (cameras write `0000:00:00 00:00:00` when unset) yield `None`.
pub(crate) fn parse_exif_date(raw: &[u8]) -> Option<NaiveDate> {
    let stamp = exif::DateTime::from_ascii(raw).ok()?;
    NaiveDate::from_ymd_opt(
        i32::from(stamp.year),
        u32::from(stamp.month),
        u32::from(stamp.day),
    )
}

/// Filesystem creation time, or modification time where the filesystem
/// records no birth time. Converted to the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemDateSource;

impl DateSource for FilesystemDateSource {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn capture_date(&self, path: &Path) -> Option<NaiveDate> {
        let meta = fs::metadata(path).ok()?;
        let stamp = meta.created().or_else(|_| meta.modified()).ok()?;
        Some(DateTime::<Local>::from(stamp).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn exif_timestamp_parses_to_date() {
        assert_eq!(
            parse_exif_date(b"2019:07:14 18:03:22"),
            NaiveDate::from_ymd_opt(2019, 7, 14)
        );
    }

    #[test]
    fn zeroed_exif_timestamp_is_absent() {
        assert_eq!(parse_exif_date(b"0000:00:00 00:00:00"), None);
        assert_eq!(parse_exif_date(b"garbage"), None);
    }

    #[test]
    fn exif_source_ignores_formats_without_exif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.svg");
        fs::write(&path, b"<svg/>").unwrap();
        assert_eq!(ExifDateSource.capture_date(&path), None);
    }

    #[test]
    fn exif_source_is_absent_for_corrupt_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        fs::write(&path, b"\xFF\xD8 definitely not exif").unwrap();
        assert_eq!(ExifDateSource.capture_date(&path), None);
    }

    #[test]
    fn filesystem_source_answers_for_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.gif");
        fs::write(&path, b"gif").unwrap();
        assert!(FilesystemDateSource.capture_date(&path).is_some());
        assert!(FilesystemDateSource
            .capture_date(&tmp.path().join("missing.gif"))
            .is_none());
    }
}
