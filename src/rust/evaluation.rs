//! Held-out evaluation with per-class precision, recall and F1.

use std::fmt;

use log::info;

use crate::classifier::{Classifier, ClassifierError};
use crate::dataset::RecordSet;

pub const POSITIVE_CLASS: &str = "is_soup";
pub const NEGATIVE_CLASS: &str = "is_not_soup";

/// Counts of agreement between labels and predictions, with `true` as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn tally(labels: &[bool], predictions: &[bool]) -> Self {
        let mut counts = Self::default();
        for (&label, &predicted) in labels.iter().zip(predictions) {
            match (label, predicted) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of records whose true label is this class
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Metrics for both classes plus overall accuracy and averages.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub is_soup: ClassMetrics,
    pub is_not_soup: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionCounts,
}

impl ClassificationReport {
    /// Builds a report from index-aligned true labels and predictions.
    pub fn from_predictions(labels: &[bool], predictions: &[bool]) -> Result<Self, ClassifierError> {
        if labels.len() != predictions.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Found {} predictions for {} labels",
                predictions.len(),
                labels.len()
            )));
        }

        let confusion = ConfusionCounts::tally(labels, predictions);
        let is_soup = ClassMetrics::from_counts(
            confusion.true_positives,
            confusion.false_positives,
            confusion.false_negatives,
        );
        let is_not_soup = ClassMetrics::from_counts(
            confusion.true_negatives,
            confusion.false_negatives,
            confusion.false_positives,
        );

        let total = confusion.total();
        let accuracy = ratio(confusion.true_positives + confusion.true_negatives, total);

        let macro_avg = ClassMetrics {
            precision: (is_soup.precision + is_not_soup.precision) / 2.0,
            recall: (is_soup.recall + is_not_soup.recall) / 2.0,
            f1: (is_soup.f1 + is_not_soup.f1) / 2.0,
            support: total,
        };

        let weighted = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                (pick(&is_soup) * is_soup.support as f64
                    + pick(&is_not_soup) * is_not_soup.support as f64)
                    / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Ok(Self {
            is_soup,
            is_not_soup,
            accuracy,
            macro_avg,
            weighted_avg,
            confusion,
        })
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        match name {
            POSITIVE_CLASS => Some(&self.is_soup),
            NEGATIVE_CLASS => Some(&self.is_not_soup),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )
        };

        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        row(f, POSITIVE_CLASS, &self.is_soup)?;
        row(f, NEGATIVE_CLASS, &self.is_not_soup)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}

/// Scores `classifier` against a labeled held-out set.
pub fn evaluate(classifier: &Classifier, records: &RecordSet) -> Result<ClassificationReport, ClassifierError> {
    let predictions = classifier.predict(&records.texts())?;
    let report = ClassificationReport::from_predictions(&records.label_flags(), &predictions)?;
    info!(
        "Evaluated {} records: accuracy {:.3}",
        records.len(),
        report.accuracy
    );
    Ok(report)
}
