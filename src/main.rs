//! USB Device Descriptor Report - CLI entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use log::error;
use std::path::PathBuf;

use usbdevlist::access::SysfsAccess;
use usbdevlist::config::{Config, example_config};
use usbdevlist::enumerate::run;
use usbdevlist::reader::ReadOptions;

#[derive(Parser)]
#[command(name = "usbdevlist")]
#[command(about = "List USB devices with their descriptor trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: auto-detect)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sysfs USB device directory (overrides config)
    #[arg(long, global = true)]
    sysfs_root: Option<PathBuf>,

    /// usbfs device node directory (overrides config)
    #[arg(long, global = true)]
    devfs_root: Option<PathBuf>,

    /// Never open devices; skips the active configuration query
    #[arg(long, global = true)]
    no_open: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the descriptor report for every device (default)
    Report,

    /// Print blank example config file
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions early (doesn't need config or devices)
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "usbdevlist", &mut std::io::stdout());
        return Ok(());
    }

    // Load config
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_logging(&config.settings.log_level, cli.verbose);

    match cli.command {
        Some(Commands::InitConfig) => {
            print!("{}", example_config());
        }
        Some(Commands::Completions { .. }) => {
            // Handled above before loading config
            unreachable!()
        }
        Some(Commands::Report) | None => {
            let settings = &config.settings;
            let sysfs_root = cli.sysfs_root.as_ref().unwrap_or(&settings.sysfs_root);
            let devfs_root = cli.devfs_root.as_ref().unwrap_or(&settings.devfs_root);
            let options = ReadOptions {
                query_active_configuration: settings.query_active_configuration && !cli.no_open,
            };

            let mut access = SysfsAccess::with_paths(sysfs_root, devfs_root);
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = run(&mut access, &options, &mut stdout) {
                error!("{}", e);
                drop(stdout);
                std::process::exit(e.exit_code());
            }
        }
    }

    Ok(())
}

/// Set up stderr logging. RUST_LOG takes precedence over config and flags.
fn init_logging(configured: &str, verbose: u8) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
