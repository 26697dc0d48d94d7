//! gkeep CLI - Command-line interface for gkeep
//!
//! Keeps `.gitkeep` markers in the empty directories of a tree, either
//! once (`scan`) or continuously while the tree changes (`watch`).

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use gkeep_core::{ReactorOptions, ScanOptions};
use gkeep_watcher::SessionConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod picker;

#[derive(Parser)]
#[command(name = "gkeep")]
#[command(author = "gkeep Contributors")]
#[command(version)]
#[command(about = "Keep empty directories alive with .gitkeep markers", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanFlags {
    /// Treat symlinked directories as directories (each scanned once)
    #[arg(long)]
    follow_symlinks: bool,

    /// Remove markers from directories that are no longer empty
    #[arg(long)]
    prune: bool,
}

impl ScanFlags {
    fn options(&self) -> ScanOptions {
        ScanOptions {
            follow_symlinks: self.follow_symlinks,
            prune_stale: self.prune,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder, then keep its markers up to date until Ctrl+C
    Watch {
        /// Folder to watch (opens a folder picker when omitted)
        path: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanFlags,

        /// Recreate a marker when a deletion leaves its directory empty
        #[arg(long)]
        reseed_on_delete: bool,
    },

    /// Seed markers into empty directories once and exit
    Scan {
        /// Folder to scan (opens a folder picker when omitted)
        path: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanFlags,

        /// Print the scan report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Watch {
            path,
            scan,
            reseed_on_delete,
        } => match picker::resolve_root(path) {
            Ok(root) => {
                let config = SessionConfig {
                    scan: scan.options(),
                    reactor: ReactorOptions {
                        reseed_on_delete,
                        follow_symlinks: scan.follow_symlinks,
                    },
                    ..Default::default()
                };
                commands::watch(&root, config).await
            }
            Err(e) => Err(e.into()),
        },
        Commands::Scan { path, scan, json } => match picker::resolve_root(path) {
            Ok(root) => commands::scan(&root, scan.options(), json),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
