//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `timeledger_core` linkage end to end against an in-memory
//!   database.
//! - Optionally start file logging (`--log-dir`, `--log-level`) before the
//!   check so the logging bootstrap is exercised too.
//! - Print the current week's reconciliation summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use timeledger_core::{
    core_version, default_log_level, init_logging, logging_status, open_db_in_memory,
    Granularity, LedgerConfig, LedgerService, SqliteSnapshotRepository, SystemClock,
};

const USAGE: &str = "usage: timeledger_cli [--log-dir <dir>] [--log-level <level>]";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
}

impl CliArgs {
    fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .filter(|value| !value.starts_with("--"))
                    .ok_or_else(|| format!("{flag} needs a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--log-dir" => parsed.log_dir = Some(PathBuf::from(value("--log-dir")?)),
                "--log-level" => parsed.log_level = Some(value("--log-level")?),
                other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
            }
        }
        if parsed.log_level.is_some() && parsed.log_dir.is_none() {
            return Err(format!("--log-level requires --log-dir\n{USAGE}"));
        }
        Ok(parsed)
    }
}

fn main() -> ExitCode {
    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    println!("timeledger_core version={}", core_version());
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("timeledger smoke check failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &args.log_dir {
        let dir = absolute_dir(dir)?;
        let level = args.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, &dir.to_string_lossy())?;
        if let Some((active_level, active_dir)) = logging_status() {
            println!("logging level={active_level} dir={}", active_dir.display());
        }
    }

    let conn = open_db_in_memory()?;
    let repo = SqliteSnapshotRepository::try_new(&conn)?;
    let service = LedgerService::open(repo, SystemClock, LedgerConfig::default())?;

    let report = service.report(Granularity::Week, None);
    println!("period={}", report.period.label);
    println!(
        "coverage={}% unreconciled_hours={:.1} gaps={}",
        report.summary.coverage_percent,
        report.summary.unreconciled_hours(),
        report.gaps.len()
    );
    Ok(())
}

/// Logging only accepts absolute directories; relative ones resolve
/// against the working directory.
fn absolute_dir(dir: &Path) -> std::io::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
