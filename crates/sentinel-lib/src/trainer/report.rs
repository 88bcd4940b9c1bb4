//! Classification metrics for a fitted model

use serde::Serialize;
use std::collections::BTreeSet;

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class metrics with accuracy and averages
///
/// Undefined ratios (no predicted or no actual samples of a class) are
/// reported as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn new(y_true: &[u32], y_pred: &[u32]) -> Self {
        let total = y_true.len().min(y_pred.len());
        let pairs: Vec<(u32, u32)> = y_true
            .iter()
            .copied()
            .zip(y_pred.iter().copied())
            .collect();

        let labels: BTreeSet<u32> = pairs.iter().flat_map(|&(t, p)| [t, p]).collect();

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|&label| {
                let true_positive = pairs.iter().filter(|&&(t, p)| t == label && p == label).count();
                let predicted = pairs.iter().filter(|&&(_, p)| p == label).count();
                let support = pairs.iter().filter(|&&(t, _)| t == label).count();
                let precision = ratio(true_positive, predicted);
                let recall = ratio(true_positive, support);
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let correct = pairs.iter().filter(|&&(t, p)| t == p).count();
        let class_count = classes.len().max(1) as f64;
        let weight_total = total.max(1) as f64;

        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / class_count,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / class_count,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / class_count,
            support: total,
        };
        let weighted = |value: fn(&ClassMetrics) -> f64| {
            classes
                .iter()
                .map(|c| value(c) * c.support as f64)
                .sum::<f64>()
                / weight_total
        };
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Self {
            accuracy: ratio(correct, total),
            classes,
            macro_avg,
            weighted_avg,
            total,
        }
    }

    /// Per-class rows followed by the averages
    pub fn rows(&self) -> Vec<&ClassMetrics> {
        self.classes
            .iter()
            .chain([&self.macro_avg, &self.weighted_avg])
            .collect()
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                class.label, class.precision, class.recall, class.f1_score, class.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        for avg in [&self.macro_avg, &self.weighted_avg] {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                avg.label, avg.precision, avg.recall, avg.f1_score, avg.support
            )?;
        }
        Ok(())
    }
}
