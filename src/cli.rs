//! Command-line interface
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Past-tense pronunciation boss fight
#[derive(Parser, Debug)]
#[command(name = "pastboss")]
#[command(about = "Past-tense pronunciation boss fight")]
#[command(version)]
pub struct Args {
    /// Run a scripted battle without a window, using the given JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the battle log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed, overriding the config file (headless mode only)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tick limit before the battle is abandoned, overriding the config file (headless mode only)
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_graphical_mode() {
        let args = Args::try_parse_from(["pastboss"]).unwrap();
        assert!(args.headless.is_none());
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_headless_overrides() {
        let args = Args::try_parse_from([
            "pastboss",
            "--headless",
            "battle.json",
            "--seed",
            "42",
            "--max-ticks",
            "9000",
            "--output",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.headless, Some(PathBuf::from("battle.json")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.max_ticks, Some(9000));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }
}
