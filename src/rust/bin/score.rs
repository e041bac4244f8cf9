use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ladle::{CsvRecordSource, ModelStore, ScoringService, Settings};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Score unlabeled rows with a saved soup classifier", long_about = None)]
struct Args {
    /// CSV export whose first column holds the text to score (header row skipped)
    input: PathBuf,

    /// Model file to load (defaults to the ladle cache directory)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Dotenv file to read settings from instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    ladle::init_logger();
    let args = Args::parse();

    let settings = match &args.env_file {
        Some(path) => Settings::from_env_file(path),
        None => Settings::from_env(),
    };
    info!("Resolved settings:\n{}", settings);

    let store = args
        .model
        .as_ref()
        .map(ModelStore::new)
        .unwrap_or_else(ModelStore::new_default);
    let source = CsvRecordSource::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let mut service = ScoringService::from_store(&store, source, settings)
        .with_context(|| format!("failed to load model from {}", store.path().display()))?;

    for scored in service.score_source()? {
        println!("{}\t{}", scored.is_soup, scored.text);
    }
    Ok(())
}
