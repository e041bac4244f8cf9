//! Scoring unlabeled text from an external record source with a persisted classifier.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::{debug, info};
use thiserror::Error;

use crate::classifier::{Classifier, ClassifierError};
use crate::model_store::{ModelError, ModelStore};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed source row: {0}")]
    Format(String),
    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Anything that can hand over rows of text to be scored.
///
/// Implementations own their connection; it is released when the source is dropped.
pub trait RecordSource {
    fn fetch_texts(&mut self) -> Result<Vec<String>, SourceError>;

    /// Human-readable identifier used in logs.
    fn name(&self) -> String;
}

/// Reads the first column of a CSV export, skipping the header row.
pub struct CsvRecordSource {
    path: PathBuf,
    reader: Option<csv::Reader<File>>,
}

impl CsvRecordSource {
    /// Opens the file immediately so a missing source fails at construction.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open_with_delimiter(path, b',')
    }

    pub fn open_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        debug!("Opened record source {:?}", path);
        Ok(Self {
            path,
            reader: Some(reader),
        })
    }
}

impl RecordSource for CsvRecordSource {
    fn fetch_texts(&mut self) -> Result<Vec<String>, SourceError> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| SourceError::Unavailable(format!("{:?} already consumed", self.path)))?;

        let mut texts = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| SourceError::Format(e.to_string()))?;
            match row.get(0) {
                Some(text) if !text.trim().is_empty() => texts.push(text.to_string()),
                _ => debug!("Skipping empty row at {:?}", row.position().map(|p| p.line())),
            }
        }
        self.reader = None;
        Ok(texts)
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

impl Drop for CsvRecordSource {
    fn drop(&mut self) {
        debug!("Closed record source {:?}", self.path);
    }
}

/// An in-memory source, mostly useful for tests and piping.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    texts: Vec<String>,
}

impl StaticSource {
    pub fn new<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }
}

impl RecordSource for StaticSource {
    fn fetch_texts(&mut self) -> Result<Vec<String>, SourceError> {
        Ok(self.texts.clone())
    }

    fn name(&self) -> String {
        format!("static({} rows)", self.texts.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredText {
    pub text: String,
    pub is_soup: bool,
    pub score: f64,
}

/// Applies a loaded classifier to rows pulled from a [`RecordSource`].
pub struct ScoringService<S: RecordSource> {
    classifier: Classifier,
    source: S,
    settings: Settings,
}

impl<S: RecordSource> ScoringService<S> {
    pub fn new(classifier: Classifier, source: S, settings: Settings) -> Self {
        info!(
            "Scoring service ready ({} environment, source {})",
            settings.environment,
            source.name()
        );
        Self {
            classifier,
            source,
            settings,
        }
    }

    /// Loads the classifier from `store` and wires it to `source`.
    pub fn from_store(store: &ModelStore, source: S, settings: Settings) -> Result<Self, ScoringError> {
        let classifier = store.load()?;
        Ok(Self::new(classifier, source, settings))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Predicts labels for `texts`. Depends only on the classifier and the input.
    pub fn predict_all<T: AsRef<str>>(&self, texts: &[T]) -> Result<Vec<bool>, ClassifierError> {
        self.classifier.predict(texts)
    }

    /// Fetches every row from the source and scores it.
    pub fn score_source(&mut self) -> Result<Vec<ScoredText>, ScoringError> {
        let texts = self.source.fetch_texts()?;
        info!("Fetched {} rows from {}", texts.len(), self.source.name());

        let scores = self.classifier.decision_function(&texts)?;
        let scored: Vec<ScoredText> = texts
            .into_iter()
            .zip(scores)
            .map(|(text, score)| ScoredText {
                text,
                is_soup: score > 0.0,
                score,
            })
            .collect();

        info!(
            "Scored {} rows, {} classified as soup",
            scored.len(),
            scored.iter().filter(|s| s.is_soup).count()
        );
        Ok(scored)
    }

    /// Releases the source and returns the classifier.
    pub fn into_classifier(self) -> Classifier {
        self.classifier
    }
}
