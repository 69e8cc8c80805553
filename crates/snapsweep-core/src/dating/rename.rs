/// `YYYYMMDD_<original-name>` renaming.
///
/// A name that already starts with a valid `YYYYMMDD_` prefix is "already
/// dated" and left alone unless the caller asks to override. With
/// override, the old prefix is replaced rather than stacked, so repeated
/// runs never grow the name.
use super::DateResolver;
use crate::error::Result;
use crate::transfer::{transfer, TransferMode, TransferOutcome};
use chrono::NaiveDate;
use std::ffi::{OsStr, OsString};
use std::path::Path;

const PREFIX_FORMAT: &str = "%Y%m%d";
/// Eight digits plus the underscore.
const PREFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed {
        date: NaiveDate,
        transfer: TransferOutcome,
    },
    /// Skipped: the name already carries a date prefix.
    AlreadyDated { date: NaiveDate },
    /// Override requested but the resolved name equals the current one.
    Unchanged,
}

/// The date encoded in a leading `YYYYMMDD_`, if it is a real calendar date.
pub fn date_prefix(file_name: &str) -> Option<NaiveDate> {
    let bytes = file_name.as_bytes().get(..PREFIX_LEN)?;
    if bytes[8] != b'_' || !bytes[..8].iter().all(u8::is_ascii_digit) {
        return None;
    }
    // All ASCII, so byte 8 is a char boundary.
    let digits = &file_name[..8];
    let year = digits[..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYYMMDD_` + `original`, extension untouched.
pub fn dated_name(date: NaiveDate, original: &OsStr) -> OsString {
    let mut name = OsString::from(format!("{}_", date.format(PREFIX_FORMAT)));
    name.push(original);
    name
}

/// Prefix `path`'s file name with its resolved capture date.
///
/// Collisions are resolved by [`transfer`]; a skip is not an error.
pub fn rename_with_date(
    path: &Path,
    resolver: &DateResolver,
    override_existing: bool,
    dry_run: bool,
) -> Result<RenameOutcome> {
    let Some(file_name) = path.file_name() else {
        return Ok(RenameOutcome::Unchanged);
    };
    let lossy = file_name.to_string_lossy();

    let original: &OsStr = match date_prefix(&lossy) {
        Some(date) if !override_existing => return Ok(RenameOutcome::AlreadyDated { date }),
        // Prefix is ASCII, so the UTF-8 slice is exact.
        Some(_) => file_name
            .to_str()
            .map(|s| OsStr::new(&s[PREFIX_LEN..]))
            .unwrap_or(file_name),
        None => file_name,
    };

    let date = resolver.resolve_date(path);
    let target = path.with_file_name(dated_name(date, original));
    if target == path {
        return Ok(RenameOutcome::Unchanged);
    }

    let outcome = transfer(path, &target, TransferMode::Rename, dry_run)?;
    Ok(RenameOutcome::Renamed {
        date,
        transfer: outcome,
    })
}
