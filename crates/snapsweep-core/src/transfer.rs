/// Conflict-safe move/rename — the only primitive that writes into the
/// destination tree.
///
/// Guarantees:
/// - An existing file is never overwritten. A taken name is qualified with
///   a `_YYYYMMDD_HHMMSS` token before the extension and tried once more;
///   if that name is taken too the call fails with
///   [`SweepError::CollisionUnresolved`].
/// - A real run performs exactly one filesystem mutation, or none if an
///   error is raised first. A dry run performs none and reports what would
///   happen.
/// - A move between filesystems falls back to copy-then-delete, writing
///   through `create_new` so the copy cannot clobber a file either.
///
/// The occupancy check and the rename are two steps, and `fs::rename`
/// replaces an existing target. The guarantee therefore assumes the engine
/// is the only writer in the destination tree for the length of a run.
use crate::error::{Result, SweepError};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp token appended to a colliding file stem.
pub const COLLISION_TOKEN_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferMode {
    /// Relocate, possibly across volumes.
    Move,
    /// Change the name within the same directory.
    Rename,
}

/// What a transfer did (or would do, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// Final path of the file.
    pub destination: PathBuf,
    /// True when the requested name was taken and a qualified one was used.
    pub collided: bool,
    pub dry_run: bool,
}

/// Transfer `source` to `destination` using the current local time for a
/// collision token.
pub fn transfer(
    source: &Path,
    destination: &Path,
    mode: TransferMode,
    dry_run: bool,
) -> Result<TransferOutcome> {
    transfer_at(source, destination, mode, dry_run, Local::now().naive_local())
}

/// Transfer with an explicit clock reading for the collision token.
///
/// Occupancy is checked immediately before the rename; a file created at
/// the target by another process in between is not detected.
pub fn transfer_at(
    source: &Path,
    destination: &Path,
    mode: TransferMode,
    dry_run: bool,
    now: NaiveDateTime,
) -> Result<TransferOutcome> {
    let (target, collided) = if exists(destination)? {
        let qualified = qualified_path(destination, now);
        if exists(&qualified)? {
            return Err(SweepError::CollisionUnresolved { path: qualified });
        }
        (qualified, true)
    } else {
        (destination.to_path_buf(), false)
    };

    if !dry_run {
        match mode {
            TransferMode::Rename => {
                fs::rename(source, &target).map_err(|e| SweepError::io(source, e))?
            }
            TransferMode::Move => move_file(source, &target)?,
        }
        debug!("{} -> {}", source.display(), target.display());
    }

    Ok(TransferOutcome {
        destination: target,
        collided,
        dry_run,
    })
}

/// `<dir>/<stem>_<YYYYMMDD_HHMMSS>.<ext>` for `path`.
pub fn qualified_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let token = now.format(COLLISION_TOKEN_FORMAT);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{token}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{token}"),
    };
    path.with_file_name(name)
}

/// Symlinks count as occupants: `symlink_metadata` does not follow them.
fn exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(SweepError::io(path, err)),
    }
}

fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(source, target)
        }
        Err(err) => Err(SweepError::io(source, err)),
    }
}

/// Cross-volume move. On any failure the partial copy is removed so the
/// source stays the only copy.
fn copy_then_remove(source: &Path, target: &Path) -> Result<()> {
    let mut reader = File::open(source).map_err(|e| SweepError::io(source, e))?;
    let modified = reader.metadata().and_then(|m| m.modified()).ok();
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| SweepError::io(target, e))?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|_| {
        if let Some(time) = modified {
            writer.set_modified(time)?;
        }
        writer.sync_all()
    });
    drop(writer);
    drop(reader);

    if let Err(err) = copied.and_then(|_| fs::remove_file(source)) {
        let _ = fs::remove_file(target);
        return Err(SweepError::io(source, err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn free_destination_is_used_as_is() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        let dst = tmp.path().join("out.jpg");
        fs::write(&src, b"data").unwrap();

        let out = transfer_at(&src, &dst, TransferMode::Move, false, at(1, 2, 3)).unwrap();
        assert_eq!(out.destination, dst);
        assert!(!out.collided);
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"data");
    }

    #[test]
    fn collision_gets_timestamp_and_occupant_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.jpg");
        let dst = tmp.path().join("IMG1.jpg");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"occupant").unwrap();

        let out = transfer_at(&src, &dst, TransferMode::Move, false, at(14, 5, 9)).unwrap();
        assert!(out.collided);
        assert_eq!(out.destination, tmp.path().join("IMG1_20240309_140509.jpg"));
        assert_eq!(fs::read(&dst).unwrap(), b"occupant");
        assert_eq!(fs::read(&out.destination).unwrap(), b"new");
    }

    #[test]
    fn second_collision_is_an_error_not_an_overwrite() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.jpg");
        let dst = tmp.path().join("IMG1.jpg");
        let qualified = tmp.path().join("IMG1_20240309_000000.jpg");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"one").unwrap();
        fs::write(&qualified, b"two").unwrap();

        let err = transfer_at(&src, &dst, TransferMode::Move, false, at(0, 0, 0)).unwrap_err();
        assert!(matches!(err, SweepError::CollisionUnresolved { path } if path == qualified));
        assert_eq!(fs::read(&qualified).unwrap(), b"two");
        assert!(src.exists(), "source must not be touched on failure");
    }

    #[test]
    fn dry_run_computes_outcome_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.png");
        let dst = tmp.path().join("taken.png");
        fs::write(&src, b"s").unwrap();
        fs::write(&dst, b"t").unwrap();

        let out = transfer_at(&src, &dst, TransferMode::Rename, true, at(9, 30, 0)).unwrap();
        assert!(out.dry_run);
        assert!(out.collided);
        assert_eq!(out.destination, tmp.path().join("taken_20240309_093000.png"));
        assert!(src.exists());
        assert!(!out.destination.exists());
    }

    #[test]
    fn qualified_path_without_extension() {
        let p = qualified_path(Path::new("/x/README"), at(23, 59, 59));
        assert_eq!(p, PathBuf::from("/x/README_20240309_235959"));
    }

    #[test]
    fn missing_source_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = transfer(
            &tmp.path().join("nope.jpg"),
            &tmp.path().join("out.jpg"),
            TransferMode::Move,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, SweepError::Io { .. }));
    }

    #[test]
    fn copy_fallback_refuses_existing_target() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        let dst = tmp.path().join("b.jpg");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"b").unwrap();

        assert!(copy_then_remove(&src, &dst).is_err());
        assert_eq!(fs::read(&dst).unwrap(), b"b");
        assert!(src.exists());
    }

    #[test]
    fn copy_fallback_moves_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        let dst = tmp.path().join("b.jpg");
        fs::write(&src, b"payload").unwrap();

        copy_then_remove(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }
}
