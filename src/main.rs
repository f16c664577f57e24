use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

mod config;

use config::Config;
use scorebook::{FuzzyNameMatcher, GameEnhancer, GameRecord};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let enhancer = GameEnhancer::new(FuzzyNameMatcher::new(config.fuzzy_threshold));
    let mut enhanced = 0;
    let mut skipped = 0;

    for input in &config.inputs {
        match enhance_file(&enhancer, &config, input) {
            Ok(output) => {
                enhanced += 1;
                info!("Wrote {}", output.display());
            }
            Err(err) if config.fail_fast => return Err(err),
            Err(err) => {
                skipped += 1;
                error!("Skipping {}: {:#}", input.display(), err);
            }
        }
    }

    info!("Enhanced {} game(s), skipped {}", enhanced, skipped);
    Ok(())
}

/// Reads one game record, resolves it and writes it under the output
/// directory with the same file name.
fn enhance_file(enhancer: &GameEnhancer, config: &Config, input: &Path) -> Result<PathBuf> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut record: GameRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to decode game record {}", input.display()))?;
    let game_id = record.id()?;
    let roster = record.roster();
    if roster.is_empty() {
        warn!("{} has no players; any runner needing a name lookup will fail", game_id);
    } else {
        debug!("{}: {} players", game_id, roster.len());
    }

    let summary = enhancer.execute(&mut record.game, &roster).map_err(|err| {
        error!(kind = err.kind(), "{} failed: {}", game_id, err);
        err
    })?;
    info!(
        "{}: {} vs {} on {}, {} plays, {} held runner(s), {} pinch-runner swap(s), {} scoring mark(s)",
        game_id,
        game_id.away,
        game_id.home,
        game_id.date,
        summary.plays,
        summary.holds_added,
        summary.swaps_removed,
        summary.scoring_marks
    );

    let file_name = input
        .file_name()
        .with_context(|| format!("No file name in {}", input.display()))?;
    let output = config.output_dir.join(file_name);
    let json = if config.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(output)
}
