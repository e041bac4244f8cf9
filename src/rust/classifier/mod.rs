//! Training and prediction: TF-IDF feature extraction followed by a linear SGD classifier.

mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod error;
pub mod sgd;
mod utils;
pub mod vectorizer;

pub use builder::ClassifierBuilder;
pub use classifier::Classifier;
pub use error::ClassifierError;
pub use sgd::{LinearModel, SgdClassifier, SgdConfig};
pub use vectorizer::{tokenize, FeatureMatrix, SparseVector, TfIdfVectorizer};

/// Summary of a fitted classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInfo {
    pub vocabulary_size: usize,
    pub n_training_documents: usize,
    pub max_epochs: usize,
    pub alpha: f64,
    pub seed: u64,
    pub bias: f64,
}
