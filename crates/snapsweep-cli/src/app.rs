/// Runs one operation on a background worker and renders its events.
///
/// The engine is single-threaded: exactly one worker performs every
/// filesystem mutation in sequence. The calling thread only drains the
/// event channel, so console output never stalls the run and a slow
/// terminal cannot reorder transfers.
use crate::cli::{Cli, Commands};
use crate::report::{self, Level, RunLog};
use anyhow::{anyhow, Context};
use crossbeam_channel::Sender;
use snapsweep_core::dating::DateResolver;
use snapsweep_core::ops::{self, RunSummary};
use snapsweep_core::platform::enumerate_drives;
use snapsweep_core::{EventSink, SweepConfig, SweepEvent, Volume};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

/// Maximum number of events that may queue between the worker and the
/// console. A burst beyond this briefly blocks the worker instead of
/// growing the heap.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let destination = || {
        cli.destination()
            .context("cannot determine a destination: pass --dest or set HOME/USERPROFILE")
    };

    let (summary, log) = match &cli.command {
        Commands::Drives => {
            for drive in enumerate_drives() {
                println!("{}", drive.describe());
            }
            return Ok(());
        }
        Commands::Organize {
            volumes,
            all_drives,
            exclude,
            dry_run,
            no_log,
        } => {
            let destination = destination()?;
            let volumes = select_volumes(volumes.clone(), *all_drives);
            let config = SweepConfig::new(&destination)
                .with_custom_exclusions(exclude.clone())
                .with_dry_run(*dry_run);
            let (summary, log) = run_job(move |sink| {
                ops::organize(&config, &volumes, sink).map(RunSummary::Organize)
            })?;
            if !*dry_run && !*no_log {
                save_log(&log, &destination);
            }
            (summary, log)
        }
        Commands::Dedupe { dry_run, report } => {
            let destination = destination()?;
            let config = SweepConfig::new(&destination).with_dry_run(*dry_run);
            let (dedupe, log) = run_job(move |sink| ops::dedupe(&config, sink))?;
            if let Some(path) = report {
                dedupe
                    .duplicates
                    .write_csv(path)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("Duplicate report written to {}", path.display());
            }
            (RunSummary::Dedupe(dedupe.summary), log)
        }
        Commands::Rename {
            override_existing,
            no_metadata,
            dry_run,
        } => {
            let destination = destination()?;
            let config = SweepConfig::new(&destination).with_dry_run(*dry_run);
            let override_existing = *override_existing;
            let resolver = if *no_metadata {
                DateResolver::filesystem_only()
            } else {
                DateResolver::default()
            };
            run_job(move |sink| {
                ops::rename(&config, &resolver, override_existing, sink).map(RunSummary::Rename)
            })?
        }
    };
    debug!("{} log line(s) recorded", log.lines().len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in report::summary_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Explicit `--volume` roots, or every enumerated drive.
fn select_volumes(explicit: Vec<PathBuf>, all_drives: bool) -> Vec<Volume> {
    if all_drives {
        return enumerate_drives().iter().map(|d| d.volume()).collect();
    }
    explicit.into_iter().map(Volume::from_root).collect()
}

/// Run `job` on the worker thread, rendering its events until it finishes.
fn run_job<T, F>(job: F) -> anyhow::Result<(T, RunLog)>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn EventSink) -> snapsweep_core::Result<T> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded::<SweepEvent>(EVENT_CHANNEL_CAPACITY);
    let worker = thread::Builder::new()
        .name("snapsweep-worker".into())
        .spawn(move || {
            let mut tx: Sender<SweepEvent> = tx;
            job(&mut tx)
        })
        .context("failed to spawn worker thread")?;

    let mut log = RunLog::default();
    // Ends when the worker drops its sender.
    for event in rx.iter() {
        render(&event, &mut log);
    }

    let result = worker
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))?;
    let value = result?;
    Ok((value, log))
}

fn render(event: &SweepEvent, log: &mut RunLog) {
    if let SweepEvent::Finished(summary) = event {
        for line in report::summary_lines(summary) {
            log.push(&line);
        }
        return;
    }
    let Some((level, line)) = report::describe(event) else {
        return;
    };
    match level {
        Level::Progress => info!("{line}"),
        Level::Detail => debug!("{line}"),
        Level::Problem => warn!("{line}"),
    }
    log.push(&line);
}

fn save_log(log: &RunLog, destination: &Path) {
    match log.save(destination) {
        Ok(path) => info!("Log saved to: {}", path.display()),
        Err(err) => warn!("Error saving log: {err}"),
    }
}
