// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Model performance metrics
//!
//! Two sources feed the metrics views: the static published record the
//! results pages display (not derived from any data), and a confusion
//! matrix computed live by the demo evaluation, where the scoring
//! engine's verdicts are compared against the generator's ground truth.

use crate::scoring::Verdict;
use serde::{Deserialize, Serialize};

/// The five headline metrics shown on the results page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub auc: f64,
}

impl ModelMetrics {
    /// The static record the demo advertises. Not derived from data.
    pub fn published() -> Self {
        Self {
            accuracy: 0.923,
            precision: 0.891,
            recall: 0.876,
            f1_score: 0.883,
            auc: 0.945,
        }
    }

    /// Derive the headline metrics from an observed confusion matrix
    /// and a separately computed AUC.
    pub fn from_confusion(cm: &ConfusionMatrix, auc: f64) -> Self {
        Self {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            auc,
        }
    }

    pub fn format(&self) -> String {
        format!(
            r#"Model Metrics
=============
Accuracy:  {:.4} ({:.1}%)
Precision: {:.4}
Recall:    {:.4}
F1 Score:  {:.4}
AUC:       {:.4}
"#,
            self.accuracy,
            self.accuracy * 100.0,
            self.precision,
            self.recall,
            self.f1_score,
            self.auc,
        )
    }
}

/// Confusion matrix with Bot as the positive class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn from_verdicts(predicted: &[Verdict], actual: &[Verdict]) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "prediction and ground truth lengths must match"
        );

        let mut matrix = Self::default();
        for (pred, truth) in predicted.iter().zip(actual.iter()) {
            match (pred, truth) {
                (Verdict::Bot, Verdict::Bot) => matrix.tp += 1,
                (Verdict::Human, Verdict::Human) => matrix.tn += 1,
                (Verdict::Bot, Verdict::Human) => matrix.fp += 1,
                (Verdict::Human, Verdict::Bot) => matrix.fn_ += 1,
            }
        }
        matrix
    }

    /// The fixed demo matrix shown on the results page.
    pub fn published() -> Self {
        Self {
            tp: 1641,
            tn: 1847,
            fp: 123,
            fn_: 89,
        }
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    pub fn recall(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }

    pub fn format(&self) -> String {
        format!(
            r#"Confusion Matrix
                Predicted
                Bot     Human
Actual Bot    {:>6}   {:>6}
       Human  {:>6}   {:>6}
"#,
            self.tp, self.fn_, self.fp, self.tn,
        )
    }
}

/// AUC-ROC via the trapezoidal rule, ranking samples by their bot
/// confidence. Returns 0.5 when either class is absent.
pub fn auc_from_scores(actual: &[Verdict], scores: &[f64]) -> f64 {
    let mut pairs: Vec<(Verdict, f64)> = actual
        .iter()
        .copied()
        .zip(scores.iter().copied())
        .collect();
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let n_pos = pairs.iter().filter(|(v, _)| v.is_bot()).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;
    if n_pos == 0.0 || n_neg == 0.0 {
        return 0.5;
    }

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut tpr_prev = 0.0;
    let mut fpr_prev = 0.0;
    let mut auc = 0.0;

    for (verdict, _) in &pairs {
        if verdict.is_bot() {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let tpr = tp / n_pos;
        let fpr = fp / n_neg;
        auc += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;
        tpr_prev = tpr;
        fpr_prev = fpr;
    }

    auc
}
