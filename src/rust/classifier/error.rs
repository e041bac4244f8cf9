use thiserror::Error;

/// Represents the different types of errors that can occur while training or using the classifier.
#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    /// Invalid training input: empty feature matrix, mismatched label count or bad hyperparameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Error occurred while making predictions
    #[error("Prediction error: {0}")]
    PredictionError(String),
}
