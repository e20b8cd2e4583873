use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use touchsweeper_core::*;

mod render;
mod script;

/// Replay a touch script against a headless game and print the final board.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML touch script
    script: PathBuf,

    /// TOML file with gesture and view settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a JSON snapshot instead of the text grid
    #[arg(long)]
    json: bool,
}

fn init_logger(verbose: &clap_verbosity_flag::Verbosity) -> Result<()> {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("Error initializing logger: {err}"))
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read settings {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid settings {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.verbose)?;

    let settings = load_settings(args.settings.as_deref())?;
    let text = fs::read_to_string(&args.script)
        .with_context(|| format!("Could not read script {}", args.script.display()))?;
    let script = script::Script::parse(&text)
        .with_context(|| format!("Could not load script {}", args.script.display()))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut controller = GameController::new(settings, seed);
    script.replay(&mut controller)?;

    if args.json {
        let snapshot = render::Snapshot::capture(&controller);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::text(&controller));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn args_parse_flags() {
        let args = Args::try_parse_from([
            "touchsweeper-sim",
            "-vv",
            "--seed",
            "7",
            "--json",
            "run.toml",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(7));
        assert!(args.json);
        assert_eq!(args.script, PathBuf::from("run.toml"));
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Info);
    }
}
