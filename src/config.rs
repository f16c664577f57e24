use clap::Parser;
use std::path::PathBuf;

use scorebook::names::DEFAULT_SIMILARITY_THRESHOLD;

/// Resolves baserunner movement and scorecard notation for parsed games
#[derive(Parser, Debug, Clone)]
#[command(name = "scorebook", version, about)]
pub struct Config {
    /// Game record JSON files to enhance
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the enhanced records are written to
    #[arg(long, env = "SCOREBOOK_OUTPUT_DIR", default_value = "enhanced")]
    pub output_dir: PathBuf,

    /// Minimum similarity (0.0–1.0] for matching a name not found exactly
    #[arg(long, env = "SCOREBOOK_FUZZY_THRESHOLD", default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub fuzzy_threshold: f64,

    /// Stop at the first game that cannot be resolved
    #[arg(long, env = "SCOREBOOK_FAIL_FAST", default_value = "false")]
    pub fail_fast: bool,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            anyhow::bail!("fuzzy_threshold must be greater than 0.0 and at most 1.0");
        }
        if self.output_dir.is_file() {
            anyhow::bail!(
                "output_dir {} is a file, not a directory",
                self.output_dir.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("scorebook").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["game.json"]);
        assert_eq!(config.inputs, vec![PathBuf::from("game.json")]);
        assert_eq!(config.output_dir, PathBuf::from("enhanced"));
        approx::assert_relative_eq!(config.fuzzy_threshold, 0.8);
        assert!(!config.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(parse(&["--fuzzy-threshold", "0", "game.json"]).validate().is_err());
        assert!(parse(&["--fuzzy-threshold", "1.5", "game.json"]).validate().is_err());
        assert!(parse(&["--fuzzy-threshold", "1.0", "game.json"]).validate().is_ok());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Config::try_parse_from(["scorebook"]).is_err());
    }
}
