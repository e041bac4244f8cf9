use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::sgd::{LinearModel, SgdConfig};
use super::vectorizer::TfIdfVectorizer;

/// A fitted text classifier: TF-IDF features followed by a linear decision function.
///
/// Once fitted the classifier is read-only, so it is `Send + Sync` and can be shared
/// behind an `Arc` by any number of readers.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ladle::{Classifier, Record, RecordSet};
///
/// let training = RecordSet::new(vec![
///     Record::new("tomato bisque", true),
///     Record::new("chicken noodle", true),
///     Record::new("leather boots", false),
///     Record::new("wool sweater", false),
/// ]);
///
/// let classifier = Classifier::builder().fit(&training)?;
/// let predictions = classifier.predict(&["chicken bisque", "wool boots"])?;
/// assert_eq!(predictions, vec![true, false]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    vectorizer: TfIdfVectorizer,
    model: LinearModel,
    config: SgdConfig,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder with the default training configuration
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    pub(crate) fn from_parts(vectorizer: TfIdfVectorizer, model: LinearModel, config: SgdConfig) -> Self {
        Self {
            vectorizer,
            model,
            config,
        }
    }

    /// Returns a summary of the fitted state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            vocabulary_size: self.vectorizer.vocabulary_size(),
            n_training_documents: self.vectorizer.n_documents(),
            max_epochs: self.config.max_epochs,
            alpha: self.config.alpha,
            seed: self.config.seed,
            bias: self.model.bias(),
        }
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    /// Signed distance of each text from the decision boundary. Positive means soup.
    pub fn decision_function<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<f64>, ClassifierError> {
        let features = self.vectorizer.transform(texts);
        self.model.decision_function(&features)
    }

    /// Predicts a label for every text, in input order.
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<bool>, ClassifierError> {
        let features = self.vectorizer.transform(texts);
        self.model.predict(&features)
    }

    pub fn predict_one(&self, text: &str) -> Result<bool, ClassifierError> {
        let row = self.vectorizer.transform_one(text);
        if self.model.n_features() != self.vectorizer.vocabulary_size() {
            return Err(ClassifierError::PredictionError(
                "vectorizer and model disagree on feature count".into(),
            ));
        }
        Ok(self.model.decision(&row) > 0.0)
    }

    /// Checks that the parts of a deserialized classifier fit together.
    pub(crate) fn validate(&self) -> Result<(), String> {
        self.vectorizer.validate()?;
        self.model.validate()?;
        if self.model.n_features() != self.vectorizer.vocabulary_size() {
            return Err(format!(
                "model has {} weights but vocabulary has {} tokens",
                self.model.n_features(),
                self.vectorizer.vocabulary_size()
            ));
        }
        self.config.validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, RecordSet};

    fn setup_test_classifier() -> Classifier {
        let training = RecordSet::new(vec![
            Record::new("tomato bisque", true),
            Record::new("chicken noodle", true),
            Record::new("leather boots", false),
            Record::new("wool sweater", false),
        ]);
        Classifier::builder().fit(&training).unwrap()
    }

    #[test]
    fn test_class_info() {
        let classifier = setup_test_classifier();
        let info = classifier.info();
        assert_eq!(info.vocabulary_size, 8);
        assert_eq!(info.n_training_documents, 4);
        assert_eq!(info.max_epochs, 5);
        assert_eq!(info.seed, 42);
    }

    #[test]
    fn test_predict_one_matches_batch() {
        let classifier = setup_test_classifier();
        let texts = ["chicken bisque", "wool boots", "leather noodle"];
        let batch = classifier.predict(&texts).unwrap();
        let single: Vec<bool> = texts
            .iter()
            .map(|t| classifier.predict_one(t).unwrap())
            .collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn test_decision_sign_matches_prediction() {
        let classifier = setup_test_classifier();
        let texts = ["tomato bisque", "wool sweater"];
        let scores = classifier.decision_function(&texts).unwrap();
        assert!(scores[0] > 0.0);
        assert!(scores[1] < 0.0);
    }

    #[test]
    fn test_empty_input() {
        let classifier = setup_test_classifier();
        let empty: [&str; 0] = [];
        assert!(classifier.predict(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(setup_test_classifier().validate().is_ok());
    }
}
