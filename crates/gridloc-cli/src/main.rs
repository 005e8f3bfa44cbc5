//! `gridloc` – Grid Localization Command Line Interface
//!
//! Runs one localize-and-navigate mission against the simulated robot:
//!
//! 1. Loads `~/.gridloc/config.toml` (defaults when absent).  `gridloc init`
//!    writes the default file and exits.
//! 2. Loads the map.  A first positional argument overrides `map_path`.
//!    Config or map errors abort before the robot moves.
//! 3. Localizes, drives to the target, then to the destination.
//! 4. Intercepts **Ctrl-C** to cancel the mission between segments.
//!
//! Exits with status 1 when the mission fails and 2 on a setup error.

mod config;

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

use gridloc_hal::{SimFeedback, SimRobot};
use gridloc_perception::MapFile;
use gridloc_runtime::{Mission, MissionOutcome, MissionReport};
use gridloc_types::GridError;

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (defaults to "info").  Set
    // GRIDLOC_LOG_FORMAT=json for newline-delimited JSON logs.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("GRIDLOC_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("init") {
        return init_config();
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let mut cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            println!(
                "  No config at {}; using defaults.  Run `{}` to create one.",
                config::config_path().display().to_string().dimmed(),
                "gridloc init".bold()
            );
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => return setup_failed(&e),
    };
    if let Some(map) = arg {
        cfg.map_path = PathBuf::from(map);
    }
    if let Err(e) = cfg.validate() {
        return setup_failed(&e);
    }

    // ── Map ───────────────────────────────────────────────────────────────
    let map_file = match MapFile::load(&cfg.map_path, cfg.width, cfg.height) {
        Ok(m) => m,
        Err(e) => return setup_failed(&e),
    };
    println!(
        "  Map {} ({}x{}), target {}, destination {}",
        cfg.map_path.display().to_string().bold(),
        cfg.width,
        cfg.height,
        map_file.target.to_string().cyan(),
        map_file.destination.to_string().cyan()
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping after this segment …".yellow().bold());
        cancel_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; the mission cannot be cancelled");
    }

    // ── Mission ───────────────────────────────────────────────────────────
    let mut robot = SimRobot::new(map_file.map.clone(), cfg.start_pose())
        .with_samples_per_read(cfg.sensor_samples);
    let mut feedback = SimFeedback::new();
    let mut mission = Mission::from_map_file(map_file, cfg.localizer_config());

    println!("  Simulated robot starts at {}\n", cfg.start_pose().to_string().dimmed());
    let report = mission.run(&mut robot, &mut feedback, &cancel);
    print_report(&report, &robot);

    if let Some(path) = &cfg.report_path {
        match write_report(&report, path) {
            Ok(()) => info!(path = %path.display(), "mission report written"),
            Err(e) => error!(error = %e, "failed to write mission report"),
        }
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn init_config() -> ExitCode {
    let cfg = config::Config::default();
    match config::save(&cfg) {
        Ok(()) => {
            println!(
                "  {} Config saved to {}\n",
                "✓".green().bold(),
                config::config_path().display().to_string().bold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => setup_failed(&e),
    }
}

fn setup_failed(e: &GridError) -> ExitCode {
    error!(error = %e, "setup failed");
    println!("{}: {}", "Setup error".red().bold(), e);
    ExitCode::from(2)
}

// ─────────────────────────────────────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────────────────────────────────────

fn print_report(report: &MissionReport, robot: &SimRobot) {
    println!();
    match &report.estimate {
        Some(estimate) => println!(
            "  {} {} (weight {:.3}) after {} iteration(s)",
            "Localized:".green().bold(),
            estimate.pose,
            estimate.weight,
            report.iterations
        ),
        None => println!(
            "  {} after {} iteration(s)",
            "Not localized".red().bold(),
            report.iterations
        ),
    }
    for (i, leg) in report.legs.iter().enumerate() {
        let steps: Vec<String> = leg.directives.iter().map(ToString::to_string).collect();
        let steps = if steps.is_empty() { "stay".to_string() } else { steps.join(", ") };
        println!("  Leg {}: {}", i + 1, steps.dimmed());
    }
    match &report.outcome {
        MissionOutcome::Completed => println!(
            "  {} robot at {} ({} advances, {} turns)",
            "Mission complete:".green().bold(),
            robot.pose(),
            robot.advances(),
            robot.turns()
        ),
        MissionOutcome::Failed { error } => {
            println!("  {} {}", "Mission failed:".red().bold(), error)
        }
    }
    println!();
}

fn write_report(report: &MissionReport, path: &Path) -> Result<(), GridError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| GridError::Io(format!("failed to serialize report: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| GridError::Io(format!("failed to write report {}: {e}", path.display())))
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("  {} {}",
        "gridloc".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Grid localization and navigation");
    println!();
}
