//! CLI command implementations.

use colored::Colorize;
use gkeep_core::{scan_directory, Notice, Notifier, ScanOptions, ScanReport, SilentNotifier};
use gkeep_watcher::{SessionConfig, SessionStats, WatchSession};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Prints every notice to the terminal as it happens.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        println!("{}", format_notice(notice));
    }
}

fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::MarkerCreated(_) => format!("{} {}", "✓".green(), notice),
        Notice::MarkerRemoved(_) => format!("{} {}", "✓".yellow(), notice),
    }
}

/// Scan a tree once and exit.
pub fn scan(path: &Path, options: ScanOptions, json_output: bool) -> Result<()> {
    if json_output {
        let report = scan_directory(path, &options, &SilentNotifier)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Scanning {}...", path.display()));

    let result = scan_directory(path, &options, &SilentNotifier);
    spinner.finish_and_clear();
    let report = result?;

    for dir in &report.markers_created {
        println!("{}", format_notice(&Notice::MarkerCreated(dir.clone())));
    }
    for dir in &report.markers_removed {
        println!("{}", format_notice(&Notice::MarkerRemoved(dir.clone())));
    }
    print_scan_summary(&report);

    Ok(())
}

fn print_scan_summary(report: &ScanReport) {
    let removed = if report.markers_removed.is_empty() {
        String::new()
    } else {
        format!(", {} removed", report.markers_removed.len())
    };
    println!(
        "{} Scanned {} directories, {} markers created{} in {}ms",
        "✓".green(),
        report.directories_visited.to_string().cyan(),
        report.markers_created.len().to_string().cyan(),
        removed,
        report.duration_ms
    );
}

/// Scan a tree, then keep its markers up to date until Ctrl+C.
pub async fn watch(path: &Path, config: SessionConfig) -> Result<()> {
    println!("{}", "Scanning for empty directories...".cyan());

    let root = path.to_path_buf();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let (session, report) =
        tokio::task::spawn_blocking(move || WatchSession::start(&root, config, notifier))
            .await??;

    print_scan_summary(&report);
    println!(
        "{} Watching {}",
        "✓".green(),
        session.root().display().to_string().cyan()
    );
    println!("  Press {} to stop", "Ctrl+C".cyan());

    let stop = Arc::new(AtomicBool::new(false));
    let runner = {
        let stop = stop.clone();
        tokio::task::spawn_blocking(move || session.run(&stop))
    };

    tokio::signal::ctrl_c().await?;
    stop.store(true, Ordering::Relaxed);

    let stats = runner.await?;
    print_session_summary(&stats);

    Ok(())
}

fn print_session_summary(stats: &SessionStats) {
    println!();
    println!(
        "{} Stopped after {} events ({} created, {} removed)",
        "✓".green(),
        stats.events_handled,
        stats.markers_created,
        stats.markers_removed
    );
    if stats.handler_failures > 0 {
        println!(
            "{} {} events could not be handled, rerun with {} for details",
            "⚠".yellow(),
            stats.handler_failures,
            "--verbose".cyan()
        );
    }
}
