//! Set-based precision / recall / F1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Precision, recall and F1 for one prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Prf1 {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Score `predicted` against `truth`.
///
/// Empty-set conventions:
/// - nothing predicted: precision is 1.0 when the truth is empty too, else 0.0
/// - empty truth: recall is 1.0
/// - precision + recall == 0: F1 is 0.0
pub fn compute_prf1<T: Ord>(predicted: &BTreeSet<T>, truth: &BTreeSet<T>) -> Prf1 {
    let tp = predicted.intersection(truth).count() as f64;

    let precision = if predicted.is_empty() {
        if truth.is_empty() { 1.0 } else { 0.0 }
    } else {
        tp / predicted.len() as f64
    };
    let recall = if truth.is_empty() {
        1.0
    } else {
        tp / truth.len() as f64
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Prf1 {
        precision,
        recall,
        f1,
    }
}

/// Fraction of the truth covered by the retrieved candidates; 0.0 for an
/// empty truth.
pub fn retrieval_overlap<T: Ord>(retrieved: &BTreeSet<T>, truth: &BTreeSet<T>) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    retrieved.intersection(truth).count() as f64 / truth.len() as f64
}

/// Predicted and true sets of one category with their score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore<T: Ord> {
    pub predicted: BTreeSet<T>,
    pub truth: BTreeSet<T>,
    #[serde(flatten)]
    pub score: Prf1,
}

impl<T: Ord> CategoryScore<T> {
    pub fn score(predicted: BTreeSet<T>, truth: BTreeSet<T>) -> Self {
        let score = compute_prf1(&predicted, &truth);
        Self {
            predicted,
            truth,
            score,
        }
    }
}
