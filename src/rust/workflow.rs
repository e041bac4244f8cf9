//! The train → evaluate → confirm → save flow behind the `train_and_evaluate` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;

use crate::classifier::{Classifier, ClassifierBuilder};
use crate::dataset::RecordReader;
use crate::evaluation::{evaluate, ClassificationReport};
use crate::model_store::ModelStore;
use crate::prompt::Confirm;

pub const SAVE_QUESTION: &str = "Save model?";

/// Outcome of a completed training run.
#[derive(Debug)]
pub struct TrainingRun {
    pub classifier: Classifier,
    pub report: ClassificationReport,
    pub train_time: Duration,
    /// Where the model was written, if the caller agreed to save it.
    pub saved_to: Option<PathBuf>,
}

/// Trains on `training_csv`, reports on `test_csv`, then asks `confirm` whether to
/// persist the model into `store`. Human-readable progress goes to `out`.
pub fn train_and_evaluate<C, W>(
    training_csv: &Path,
    test_csv: &Path,
    builder: &ClassifierBuilder,
    store: &ModelStore,
    confirm: &mut C,
    out: &mut W,
) -> Result<TrainingRun>
where
    C: Confirm + ?Sized,
    W: Write,
{
    let reader = RecordReader::new();
    let training = reader
        .read_path(training_csv)
        .with_context(|| format!("failed to read training data from {}", training_csv.display()))?;
    let test = reader
        .read_path(test_csv)
        .with_context(|| format!("failed to read test data from {}", test_csv.display()))?;

    let start = Instant::now();
    let classifier = builder.fit(&training).context("training failed")?;
    let train_time = start.elapsed();
    writeln!(out, "train time: {:.3}s", train_time.as_secs_f64())?;

    let report = evaluate(&classifier, &test).context("evaluation failed")?;
    writeln!(out, "{}", report)?;

    let saved_to = if confirm.confirm(SAVE_QUESTION)? {
        store
            .save(&classifier)
            .with_context(|| format!("failed to save model to {}", store.path().display()))?;
        writeln!(out, "Saved model to {}", store.path().display())?;
        Some(store.path().to_path_buf())
    } else {
        info!("Model not saved");
        None
    };

    writeln!(out, "done")?;
    Ok(TrainingRun {
        classifier,
        report,
        train_time,
        saved_to,
    })
}
