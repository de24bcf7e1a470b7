use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pixel_deduper_core::config::LogLevel;
use pixel_deduper_core::logging::{init_logger, LOG_ENV_VAR};
use pixel_deduper_core::processing::{ImageCrateCodec, ProgressTracker};
use pixel_deduper_core::safety::SafetyManager;
use pixel_deduper_core::{Config, DuplicateStore, Error, PixelDeduper, Session};

mod console_viewer;

use console_viewer::ConsoleViewer;

/// Bad arguments or configuration, and any other failure not listed below
const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID_ROOT: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "pixel-deduper")]
#[command(about = "Find pixel-identical duplicate images and review them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory for duplicate images and review the results
    Scan {
        /// Directory to scan for duplicate images
        directory: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recurse: bool,

        /// Similarity threshold, clamped to 0.1..=1.0
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: Option<f64>,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for log files
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "pixel-deduper.json")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also end up here
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan {
            directory,
            recurse,
            threshold,
            verbose,
            config,
            log_dir,
        } => {
            // Set up configuration
            let mut config = match &config {
                Some(config_path) => Config::from_file(config_path)
                    .with_context(|| format!("Cannot load {}", config_path.display()))?,
                None => Config::default(),
            };

            // Override config with command line arguments
            config.recursive |= recurse;
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            if log_dir.is_some() {
                config.log_dir = log_dir;
            }
            config.log_level = match verbose {
                0 => config.log_level,
                1 => LogLevel::Debug,
                _ => LogLevel::Trace,
            };

            config.validate()?;
            init_logging(&config);

            let deduper = PixelDeduper::new(config);
            let scanning = Arc::new(AtomicBool::new(true));
            install_interrupt_handler(Arc::clone(&scanning), deduper.shutdown_handle())?;

            scan(&directory, &deduper, &scanning)
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Scan `directory`, then review the duplicates found
///
/// `scanning` is cleared once the comparison phase is over.
fn scan(directory: &Path, deduper: &PixelDeduper, scanning: &AtomicBool) -> anyhow::Result<()> {
    let candidates = deduper.discover(directory)?;
    if candidates.len() < 2 {
        println!(
            "Not enough image files to compare in {} ({} found)",
            directory.display(),
            candidates.len()
        );
        return Ok(());
    }

    println!("Comparing {} images...", candidates.len());
    let outcome = deduper.run_scan(&candidates, &ProgressTracker::new());
    scanning.store(false, Ordering::SeqCst);
    let outcome = outcome?;

    if outcome.stats.decode_failures > 0 {
        warn!(
            "{} comparison(s) failed to decode an image",
            outcome.stats.decode_failures
        );
    }
    if outcome.groups.is_empty() {
        println!("No duplicates found.");
        return Ok(());
    }

    info!("Starting review of {} group(s)", outcome.groups.len());
    let mut session = Session::new(
        DuplicateStore::new(outcome.groups),
        ImageCrateCodec,
        ConsoleViewer::new(),
        SafetyManager::new(),
    )
    .with_largest_dimension(deduper.config().largest_dimension)
    .with_clear_screen(io::stdout().is_terminal());

    session.run(|buf| io::stdin().read_line(buf), &mut io::stdout())?;
    info!("Review finished");
    Ok(())
}

/// Ctrl-C stops a running scan cooperatively and exits immediately otherwise
fn install_interrupt_handler(
    scanning: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        if scanning.load(Ordering::SeqCst) {
            cancel.store(true, Ordering::SeqCst);
        } else {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    })
    .context("Failed to install Ctrl-C handler")
}

/// Log to rotated files; fall back to stderr when the log directory is unusable
fn init_logging(config: &Config) {
    let log_dir = config.resolved_log_dir();
    if let Err(e) = init_logger(&log_dir, LevelFilter::from(config.log_level)) {
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV_VAR, "warn"))
            .init();
        warn!("File logging unavailable in {}: {}", log_dir.display(), e);
    }
}

/// Map a failure to the process exit code
///
/// Only an invalid scan root and an interrupted scan have codes of their own;
/// argument, configuration and runtime I/O errors all exit with 1.
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<Error>() {
        Some(Error::DirectoryNotFound(_)) => EXIT_INVALID_ROOT,
        Some(Error::Interrupted) => EXIT_INTERRUPTED,
        _ => EXIT_FAILURE,
    }
}
