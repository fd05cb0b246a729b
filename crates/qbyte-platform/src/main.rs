//! QBYTE unified coherence platform launcher
//!
//! Usage:
//!   qbyte --root ~/.qbyte --import ./uploads
//!   qbyte --root ~/.qbyte --watch
//!
//! One-shot runs import, scan the workload corpus, load and evolve the
//! organism ecosystem, print the HUD, and export the state report. Watch
//! mode keeps going until interrupted.

use clap::Parser;
use qbyte_core::config::PlatformConfig;
use qbyte_platform::channels::ChannelLayer;
use qbyte_platform::paths::PlatformPaths;
use qbyte_platform::platform::Platform;
use qbyte_platform::version::VersionController;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qbyte", about = "QBYTE unified coherence platform")]
struct Cli {
    /// Platform root holding organisms, workloads, logs, and output
    #[arg(long, default_value = "~/.qbyte")]
    root: String,

    /// Path to config file (TOML). Default: <root>/config/platform.toml
    #[arg(long)]
    config: Option<String>,

    /// Import a directory of uploaded corpus files before running
    #[arg(long)]
    import: Option<String>,

    /// Evolution ticks for this run (overrides config)
    #[arg(long)]
    iterations: Option<u32>,

    /// Keep running: watch for new organisms and archived jobs
    #[arg(long)]
    watch: bool,

    /// Dump default config as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Show binary and workspace schema version and exit
    #[arg(long)]
    version_info: bool,

    /// Roll the workspace schema back to v1 and exit
    #[arg(long)]
    rollback: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let root = expand_tilde(&cli.root);
    let paths = PlatformPaths::new(root.clone());

    if cli.dump_config {
        println!("{}", PlatformConfig::default().to_toml());
        return Ok(());
    }

    if cli.version_info {
        let version = VersionController::new(paths).current_version();
        println!("qbyte v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "workspace schema version: {}",
            if version == 0 {
                "uninitialized".to_string()
            } else {
                version.to_string()
            }
        );
        return Ok(());
    }

    // The appender layer opens its file at init, so logs/ must exist first.
    std::fs::create_dir_all(paths.logs())?;
    let file_appender = tracing_appender::rolling::never(paths.logs(), "qbyte.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(ChannelLayer::new(paths.logs()))
        .init();

    if cli.rollback {
        VersionController::new(paths).rollback_v2_to_v1()?;
        return Ok(());
    }

    let config = match cli.config {
        Some(path) => PlatformConfig::load_strict(&expand_tilde(&path))?,
        None => PlatformConfig::load(&paths.config_file()),
    };

    banner();

    let platform = Platform::open(root, config.clone())?;

    if let Some(uploads) = cli.import {
        let counts = platform.import(&expand_tilde(&uploads))?;
        info!(
            "Imported {} organisms, {} scripts, {} notes",
            counts.organisms, counts.scripts, counts.notes
        );
    }

    platform.scan_corpus().await;
    platform.load_organisms().await;

    if cli.watch {
        return platform.watch().await;
    }

    if platform.organism_count().await > 0 {
        let iterations = cli
            .iterations
            .unwrap_or(config.evolution.iterations);
        platform.evolve(iterations).await;
    }

    println!();
    println!("{}", platform.hud().await);

    let report_path = platform.export().await?;
    println!();
    println!("[COMPLETE] Platform state exported to: {}", report_path.display());

    Ok(())
}

fn banner() {
    println!("╔══════════════════════════════════════════════════╗");
    println!(
        "║     QBYTE UNIFIED COHERENCE PLATFORM v{}      ║",
        env!("CARGO_PKG_VERSION")
    );
    println!("║     4-Regime CCCE Convergence Engine             ║");
    println!("╠══════════════════════════════════════════════════╣");
    println!("║  organisms/   ← .dna definitions                 ║");
    println!("║  workloads/   ← archived quantum jobs            ║");
    println!("║  output/      ← checkpoints + state report       ║");
    println!("║  logs/        ← AURA|AIDEN|PLATFORM|CCCE         ║");
    println!("╚══════════════════════════════════════════════════╝");
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
