use std::time::Instant;

use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::sgd::{SgdClassifier, SgdConfig};
use super::vectorizer::TfIdfVectorizer;
use crate::dataset::RecordSet;

/// Configures and runs the training pipeline: fit the vectorizer on the training texts,
/// transform them, then fit the linear model on the resulting features.
#[derive(Debug, Clone, Default)]
pub struct ClassifierBuilder {
    config: SgdConfig,
}

impl ClassifierBuilder {
    /// Creates a builder with the default training configuration
    ///
    /// # Example
    /// ```
    /// use ladle::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// assert_eq!(builder.config().max_epochs, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            config: SgdConfig::default(),
        }
    }

    /// Replaces the whole training configuration
    pub fn with_config(mut self, config: SgdConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of passes over the training set
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.config.max_epochs = max_epochs;
        self
    }

    /// Sets the L2 regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Sets the seed that fixes the training order
    ///
    /// # Example
    /// ```
    /// use ladle::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_seed(7)
    ///     .with_max_epochs(10);
    /// assert_eq!(builder.config().seed, 7);
    /// ```
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_intercept_decay(mut self, intercept_decay: f64) -> Self {
        self.config.intercept_decay = intercept_decay;
        self
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    /// Fits a classifier on a labeled record set
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The fitted classifier, or an error if:
    ///   - The record set is empty
    ///   - The configuration is invalid
    pub fn fit(&self, records: &RecordSet) -> Result<Classifier, ClassifierError> {
        self.fit_texts(&records.texts(), &records.label_flags())
    }

    /// Fits a classifier on index-aligned texts and labels
    pub fn fit_texts<S: AsRef<str>>(&self, texts: &[S], labels: &[bool]) -> Result<Classifier, ClassifierError> {
        self.config.validate()?;
        if texts.is_empty() {
            return Err(ClassifierError::ValidationError(
                "At least one training record is required".into(),
            ));
        }
        if texts.len() != labels.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Found {} labels for {} texts",
                labels.len(),
                texts.len()
            )));
        }

        let start = Instant::now();
        let (vectorizer, features) = TfIdfVectorizer::fit_transform(texts);
        info!(
            "Vectorized {} documents into {} features",
            features.n_rows(),
            features.n_features()
        );

        let model = SgdClassifier::fit(&self.config, &features, labels)?;
        info!("Training completed in {:.3}s", start.elapsed().as_secs_f64());

        Ok(Classifier::from_parts(vectorizer, model, self.config.clone()))
    }
}
