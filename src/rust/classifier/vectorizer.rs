//! Bag-of-words feature extraction: token counts rescaled by inverse document frequency.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::utils::{all_finite, normalize_vector, sparse_dot};

lazy_static! {
    /// Words of two or more characters.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
}

/// Splits text into lowercase word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A sparse feature row. Indices are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn dot(&self, dense: &Array1<f64>) -> f64 {
        sparse_dot(&self.indices, &self.values, dense)
    }
}

/// Rows of sparse features sharing one feature space.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<SparseVector>, n_features: usize) -> Self {
        Self { rows, n_features }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &SparseVector {
        &self.rows[index]
    }

    /// Fails if any row stores an index outside `0..n_features`.
    pub fn check_indices(&self) -> Result<(), String> {
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(&last) = row.indices.last() {
                if last >= self.n_features {
                    return Err(format!(
                        "row {} has feature index {} but the matrix has {} columns",
                        i, last, self.n_features
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fitted TF-IDF vectorizer.
///
/// Fitting learns a vocabulary (indices assigned in lexicographic token order) and
/// smoothed inverse document frequencies `ln((1 + n) / (1 + df)) + 1`. Transforming
/// counts known tokens, multiplies by their idf and scales each row to unit L2 norm.
/// Tokens outside the vocabulary contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Learns vocabulary and document frequencies from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (idx, (token, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(token, idx);
        }

        Self {
            vocabulary,
            idf,
            n_documents,
        }
    }

    /// Fits on `documents` and returns their feature matrix.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, FeatureMatrix) {
        let vectorizer = Self::fit(documents);
        let matrix = vectorizer.transform(documents);
        (vectorizer, matrix)
    }

    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> FeatureMatrix {
        let rows = documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect();
        FeatureMatrix::new(rows, self.vocabulary_size())
    }

    pub fn transform_one(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let (indices, mut values): (Vec<usize>, Vec<f64>) = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .unzip();
        normalize_vector(&mut values);

        SparseVector { indices, values }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn feature_index(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Checks internal consistency of a deserialized vectorizer.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf has {} entries but vocabulary has {}",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        let mut seen = vec![false; self.vocabulary.len()];
        for (token, &idx) in &self.vocabulary {
            if idx >= seen.len() || seen[idx] {
                return Err(format!("token '{}' has invalid index {}", token, idx));
            }
            seen[idx] = true;
        }
        if !all_finite(&self.idf) || self.idf.iter().any(|&w| w <= 0.0) {
            return Err("idf weights must be finite and positive".to_string());
        }
        Ok(())
    }
}
