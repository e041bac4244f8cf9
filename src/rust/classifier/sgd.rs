//! Linear binary classifier trained with stochastic gradient descent on the hinge loss.

use log::debug;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::all_finite;
use super::vectorizer::{FeatureMatrix, SparseVector};

/// Intercept updates are damped for sparse input.
pub const SPARSE_INTERCEPT_DECAY: f64 = 0.01;

/// Below this the lazily applied weight scale is folded back into the weights.
const MIN_WEIGHT_SCALE: f64 = 1e-9;

/// Hyperparameters for [`SgdClassifier::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    /// Number of full passes over the training rows. There is no early stopping.
    pub max_epochs: usize,
    /// L2 regularization strength.
    pub alpha: f64,
    /// Seeds the per-epoch shuffle.
    pub seed: u64,
    pub intercept_decay: f64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            max_epochs: 5,
            alpha: 1e-3,
            seed: 42,
            intercept_decay: SPARSE_INTERCEPT_DECAY,
        }
    }
}

impl SgdConfig {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.max_epochs == 0 {
            return Err(ClassifierError::ValidationError(
                "max_epochs must be at least 1".into(),
            ));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "alpha must be a positive finite number, got {}",
                self.alpha
            )));
        }
        if !self.intercept_decay.is_finite() || self.intercept_decay < 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "intercept_decay must be a non-negative finite number, got {}",
                self.intercept_decay
            )));
        }
        Ok(())
    }

    /// Offset of the "optimal" learning rate schedule `eta = 1 / (alpha * (t0 + t - 1))`.
    fn optimal_t0(&self) -> f64 {
        let typw = (1.0 / self.alpha.sqrt()).sqrt();
        // hinge dloss(-typw, 1) = -1, so the initial step is typw itself
        let initial_eta = typw / 1.0f64.max(hinge_dloss(-typw, 1.0));
        1.0 / (initial_eta * self.alpha)
    }
}

/// Derivative of the hinge loss with respect to the margin.
fn hinge_dloss(p: f64, y: f64) -> f64 {
    if p * y <= 1.0 {
        -y
    } else {
        0.0
    }
}

/// Learned weights and bias of a linear decision function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearModel {
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn decision(&self, row: &SparseVector) -> f64 {
        row.dot(&self.weights) + self.bias
    }

    pub fn decision_function(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ClassifierError> {
        if matrix.n_features() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "feature matrix has {} columns but the model expects {}",
                matrix.n_features(),
                self.n_features()
            )));
        }
        matrix.check_indices().map_err(ClassifierError::PredictionError)?;
        Ok(matrix.rows().iter().map(|row| self.decision(row)).collect())
    }

    /// `true` where the decision value is strictly positive.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<bool>, ClassifierError> {
        Ok(self
            .decision_function(matrix)?
            .into_iter()
            .map(|score| score > 0.0)
            .collect())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let weights_finite = self
            .weights
            .as_slice()
            .map(all_finite)
            .unwrap_or_else(|| self.weights.iter().all(|w| w.is_finite()));
        if !weights_finite || !self.bias.is_finite() {
            return Err("weights and bias must be finite".to_string());
        }
        Ok(())
    }
}

/// Stochastic gradient descent trainer for [`LinearModel`].
pub struct SgdClassifier;

impl SgdClassifier {
    /// Fits a hinge-loss, L2-regularized linear model.
    ///
    /// Rows are visited in a seeded shuffled order each epoch, so identical inputs and
    /// configuration always produce identical weights.
    ///
    /// # Errors
    /// - `ValidationError` if the matrix has no rows, the label count differs from the
    ///   row count, a row indexes past the matrix width, or the configuration is invalid
    pub fn fit(
        config: &SgdConfig,
        matrix: &FeatureMatrix,
        labels: &[bool],
    ) -> Result<LinearModel, ClassifierError> {
        config.validate()?;
        if matrix.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Feature matrix has zero rows".into(),
            ));
        }
        if labels.len() != matrix.n_rows() {
            return Err(ClassifierError::ValidationError(format!(
                "Found {} labels for {} rows",
                labels.len(),
                matrix.n_rows()
            )));
        }
        matrix.check_indices().map_err(ClassifierError::ValidationError)?;

        let mut weights = Array1::<f64>::zeros(matrix.n_features());
        let mut scale = 1.0;
        let mut bias = 0.0;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..matrix.n_rows()).collect();
        let t0 = config.optimal_t0();
        let mut t = 1.0;

        for epoch in 0..config.max_epochs {
            order.shuffle(&mut rng);
            let mut violations = 0usize;

            for &i in &order {
                let row = matrix.row(i);
                let y = if labels[i] { 1.0 } else { -1.0 };

                let p = scale * row.dot(&weights) + bias;
                let eta = 1.0 / (config.alpha * (t0 + t - 1.0));
                let update = -eta * hinge_dloss(p, y);

                scale *= (1.0 - eta * config.alpha).max(0.0);
                if scale < MIN_WEIGHT_SCALE {
                    weights.mapv_inplace(|w| w * scale);
                    scale = 1.0;
                }

                if update != 0.0 {
                    violations += 1;
                    for (idx, value) in row.iter() {
                        weights[idx] += update * value / scale;
                    }
                    bias += update * config.intercept_decay;
                }
                t += 1.0;
            }

            debug!(
                "epoch {}/{}: {} margin violations over {} rows",
                epoch + 1,
                config.max_epochs,
                violations,
                order.len()
            );
        }

        weights.mapv_inplace(|w| w * scale);
        Ok(LinearModel::new(weights, bias))
    }
}
