//! Cultivation engine command line.
//!
//! Composition root: loads `.env`, installs logging, loads content and runs
//! one subcommand against the engine or an in-memory runtime.
mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AccrueArgs, SimulateArgs, StatsArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Cultivation combat and progression engine", long_about = None)]
struct Cli {
    /// Content directory with balance.toml and trials.ron (overrides CULTIVATION_CONTENT_DIR).
    #[arg(long, global = true)]
    content_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fight one trial and print the combat log.
    SimulateTrial(SimulateArgs),
    /// Show derived combat stats and power score.
    Stats(StatsArgs),
    /// Let a character cultivate on a simulated clock.
    Accrue(AccrueArgs),
    /// List the trial catalog.
    Trials,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logging::setup_logging()?;

    let mut config = cultivation_runtime::RuntimeConfig::from_env();
    if let Some(dir) = cli.content_dir {
        config.content_dir = Some(dir);
    }
    let content = commands::Content::load(&config)?;

    match cli.command {
        Command::SimulateTrial(args) => commands::simulate_trial(&content, args),
        Command::Stats(args) => commands::stats(&content, args),
        Command::Accrue(args) => commands::accrue(content, config, args).await,
        Command::Trials => {
            commands::list_trials(&content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_trial_parses_path_case_insensitively() {
        let cli = Cli::try_parse_from([
            "cultivation",
            "simulate-trial",
            "--trial",
            "bandit_camp",
            "--path",
            "Body",
            "--seed",
            "42",
        ])
        .unwrap();
        match cli.command {
            Command::SimulateTrial(args) => {
                assert_eq!(args.path, cultivation_core::CultivationPath::Body);
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.level, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_path_is_rejected() {
        assert!(Cli::try_parse_from(["cultivation", "stats", "--path", "sword"]).is_err());
    }
}
