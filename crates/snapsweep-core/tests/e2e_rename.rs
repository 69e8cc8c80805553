/// End-to-end rename tests over a destination tree.
use chrono::NaiveDate;
use snapsweep_core::dating::{DateResolver, DateSource};
use snapsweep_core::ops::rename;
use snapsweep_core::{NullSink, SweepConfig, SweepEvent};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Fixed(NaiveDate);

impl DateSource for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }
    fn capture_date(&self, _path: &Path) -> Option<NaiveDate> {
        Some(self.0)
    }
}

fn resolver() -> DateResolver {
    DateResolver::new(vec![Box::new(Fixed(
        NaiveDate::from_ymd_opt(2021, 12, 24).unwrap(),
    ))])
}

fn write(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn rename_twice_renames_once_then_skips() {
    let dest = TempDir::new().unwrap();
    write(&dest.path().join("Images from V/tree.jpg"), b"x");
    let config = SweepConfig::new(dest.path());

    let first = rename(&config, &resolver(), false, &mut NullSink).unwrap();
    assert_eq!(first.renamed, 1);
    let renamed = dest.path().join("Images from V/20211224_tree.jpg");
    assert!(renamed.exists());

    let mut events: Vec<SweepEvent> = Vec::new();
    let second = rename(&config, &resolver(), false, &mut events).unwrap();
    assert_eq!(second.renamed, 0);
    assert_eq!(second.skipped, 1);
    assert!(renamed.exists());
    assert!(events
        .iter()
        .any(|e| matches!(e, SweepEvent::Skipped { reason, .. } if reason.contains("already dated"))));
}

#[test]
fn non_images_are_left_alone() {
    let dest = TempDir::new().unwrap();
    write(&dest.path().join("organize_log_20240101_000000.txt"), b"log");
    let config = SweepConfig::new(dest.path());

    let summary = rename(&config, &resolver(), false, &mut NullSink).unwrap();
    assert_eq!(summary.examined, 0);
    assert!(dest.path().join("organize_log_20240101_000000.txt").exists());
}

#[test]
fn metadata_less_file_gets_filesystem_date() {
    let dest = TempDir::new().unwrap();
    let path = dest.path().join("plain.png");
    write(&path, b"no exif here");
    let meta = fs::metadata(&path).unwrap();
    let stamp = meta.created().or_else(|_| meta.modified()).unwrap();
    let expected = chrono::DateTime::<chrono::Local>::from(stamp).date_naive();

    let config = SweepConfig::new(dest.path());
    rename(&config, &DateResolver::filesystem_only(), false, &mut NullSink).unwrap();

    let expected_name = format!("{}_plain.png", expected.format("%Y%m%d"));
    assert!(dest.path().join(expected_name).exists());
}

#[test]
fn dry_run_renames_nothing() {
    let dest = TempDir::new().unwrap();
    write(&dest.path().join("a.jpg"), b"a");
    let config = SweepConfig::new(dest.path()).with_dry_run(true);

    let summary = rename(&config, &resolver(), false, &mut NullSink).unwrap();
    assert_eq!(summary.renamed, 1);
    assert!(dest.path().join("a.jpg").exists());
    assert!(!dest.path().join("20211224_a.jpg").exists());
}
