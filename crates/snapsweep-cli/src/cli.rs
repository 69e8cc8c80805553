/// Command-line definition.
use clap::{Parser, Subcommand};
use snapsweep_core::config::DEFAULT_DESTINATION_NAME;
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snapsweep",
    author,
    version,
    about = "Gather images from every drive into one folder, drop exact duplicates, rename by capture date",
    long_about = None
)]
pub struct Cli {
    /// Destination root [default: <home>/Desktop/Photos to Clean]
    #[arg(long, global = true, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Log every file, not just progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Move images from volumes into "<dest>/Images from <volume>"
    Organize {
        /// Volume root to scan (repeatable)
        #[arg(long = "volume", value_name = "PATH")]
        volumes: Vec<PathBuf>,
        /// Scan every local drive
        #[arg(long, conflicts_with = "volumes")]
        all_drives: bool,
        /// Extra directory-name fragment to skip (repeatable, case-insensitive)
        #[arg(long = "exclude", value_name = "FRAGMENT")]
        exclude: Vec<String>,
        /// Report what would move without touching anything
        #[arg(long)]
        dry_run: bool,
        /// Do not write organize_log_*.txt into the destination
        #[arg(long)]
        no_log: bool,
    },
    /// Delete exact-content duplicates inside the destination
    Dedupe {
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
        /// Write duplicate groups to a CSV file
        #[arg(long, value_name = "CSV")]
        report: Option<PathBuf>,
    },
    /// Prefix images in the destination with YYYYMMDD_ capture dates
    Rename {
        /// Re-date files that already carry a date prefix
        #[arg(long)]
        override_existing: bool,
        /// Use filesystem dates only, ignoring embedded metadata
        #[arg(long)]
        no_metadata: bool,
        /// Report new names without renaming
        #[arg(long)]
        dry_run: bool,
    },
    /// List the local drives that --all-drives would scan
    Drives,
}

impl Cli {
    /// The destination root: `--dest`, else the desktop default.
    pub fn destination(&self) -> Option<PathBuf> {
        self.dest.clone().or_else(default_destination)
    }
}

/// `<home>/Desktop/Photos to Clean`, from `USERPROFILE` or `HOME`.
pub fn default_destination() -> Option<PathBuf> {
    let home = env::var_os("USERPROFILE")
        .filter(|v| !v.is_empty())
        .or_else(|| env::var_os("HOME").filter(|v| !v.is_empty()))?;
    Some(
        PathBuf::from(home)
            .join("Desktop")
            .join(DEFAULT_DESTINATION_NAME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn organize_collects_repeated_flags() {
        let cli = parse(&[
            "snapsweep",
            "--dest",
            "/out",
            "organize",
            "--volume",
            "/a",
            "--volume",
            "/b",
            "--exclude",
            "Backup",
            "--dry-run",
        ]);
        assert_eq!(cli.dest, Some(PathBuf::from("/out")));
        assert_eq!(
            cli.command,
            Commands::Organize {
                volumes: vec![PathBuf::from("/a"), PathBuf::from("/b")],
                all_drives: false,
                exclude: vec!["Backup".into()],
                dry_run: true,
                no_log: false,
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["snapsweep", "dedupe", "--dry-run", "--json", "--dest", "/d"]);
        assert!(cli.json);
        assert_eq!(cli.destination(), Some(PathBuf::from("/d")));
    }

    #[test]
    fn all_drives_conflicts_with_explicit_volumes() {
        let err = Cli::try_parse_from(["snapsweep", "organize", "--all-drives", "--volume", "/a"]);
        assert!(err.is_err());
    }

    #[test]
    fn rename_flags() {
        let cli = parse(&["snapsweep", "rename", "--override-existing", "--no-metadata"]);
        assert_eq!(
            cli.command,
            Commands::Rename {
                override_existing: true,
                no_metadata: true,
                dry_run: false,
            }
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["snapsweep"]).is_err());
    }
}
