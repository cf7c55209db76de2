//! Command-line interface for rolling-terrain.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::config::TerrainConfig;
use crate::engine::headless::{run_ticks, write_snapshot};
use crate::engine::{EngineResult, Windowing};

#[derive(Debug, Parser)]
#[command(
    name = "rolling-terrain",
    about = "Animated wireframe terrain background",
    version
)]
pub struct Cli {
    /// JSON config file; missing fields fall back to defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the window and animate (default).
    Run,

    /// Advance the terrain without a window and dump the frame as JSON.
    Snapshot(SnapshotArgs),

    /// Print the default config as JSON.
    #[command(name = "print-config")]
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Number of animation ticks to advance before capturing.
    #[arg(long, default_value_t = 0)]
    pub ticks: u64,

    /// Output file; stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run_from_env() -> EngineResult<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> EngineResult<()> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = TerrainConfig::load_or_default(cli.config.as_deref())?;
            Windowing::run_app(config)
        }
        Commands::Snapshot(args) => {
            let config = TerrainConfig::load_or_default(cli.config.as_deref())?;
            let snapshot = run_ticks(&config, args.ticks);
            write_snapshot(&snapshot, args.output.as_deref())
        }
        Commands::PrintConfig => {
            println!("{}", TerrainConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["rolling-terrain"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn snapshot_args_parse() {
        let cli = Cli::try_parse_from([
            "rolling-terrain",
            "snapshot",
            "--ticks",
            "120",
            "--output",
            "frame.json",
            "--config",
            "bg.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bg.json")));
        match cli.command {
            Some(Commands::Snapshot(args)) => {
                assert_eq!(args.ticks, 120);
                assert_eq!(args.output, Some(PathBuf::from("frame.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn print_config_dispatches_successfully() {
        let result = run(Cli {
            config: None,
            command: Some(Commands::PrintConfig),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn snapshot_with_missing_config_is_io_error() {
        let result = run(Cli {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            command: Some(Commands::Snapshot(SnapshotArgs {
                ticks: 1,
                output: None,
            })),
        });
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
