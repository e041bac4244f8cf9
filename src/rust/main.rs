use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use ladle::workflow::train_and_evaluate;
use ladle::{ClassifierBuilder, Confirm, FixedAnswer, ModelStore, StdinPrompt};
use log::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Train a soup classifier and report on held-out data", long_about = None)]
struct Args {
    /// CSV file with labeled training records
    training_csv: PathBuf,

    /// CSV file with labeled records held out for evaluation
    test_csv: PathBuf,

    /// Where to write the model (defaults to the ladle cache directory)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Save the model without asking
    #[arg(short, long, conflicts_with = "no_save")]
    yes: bool,

    /// Never save the model
    #[arg(long)]
    no_save: bool,

    /// Number of passes over the training set
    #[arg(long, default_value_t = 5)]
    epochs: usize,

    /// Seed for the training order
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            eprintln!("This program requires two args: train_file, test_file");
            return ExitCode::from(1);
        }
    };

    ladle::init_logger();
    info!("=== Starting training run ===");

    let store = args
        .model
        .as_ref()
        .map(ModelStore::new)
        .unwrap_or_else(ModelStore::new_default);
    let builder = ClassifierBuilder::new()
        .with_max_epochs(args.epochs)
        .with_seed(args.seed);

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(FixedAnswer(true))
    } else if args.no_save {
        Box::new(FixedAnswer(false))
    } else {
        Box::new(StdinPrompt::stdio())
    };

    let mut stdout = io::stdout();
    match train_and_evaluate(
        &args.training_csv,
        &args.test_csv,
        &builder,
        &store,
        confirm.as_mut(),
        &mut stdout,
    ) {
        Ok(run) => {
            info!(
                "=== Training run complete (took {:.2?}) ===",
                run.train_time
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Training run failed: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
