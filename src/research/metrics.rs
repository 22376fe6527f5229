//! Evaluation metrics for classifiers.
use serde::Serialize;

use crate::error::{Result, VoteError};


/// Points of a receiver operating characteristic curve.
///
/// `thresholds` is strictly decreasing.
/// The first point is `(0, 0)` with threshold `+inf`;
/// `fpr[i]` and `tpr[i]` are the rates of the rule
/// `score >= thresholds[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    /// False positive rates.
    pub fpr: Vec<f64>,
    /// True positive rates.
    pub tpr: Vec<f64>,
    /// Decision thresholds.
    pub thresholds: Vec<f64>,
}


/// Computes the ROC curve of the scores `y_score`
/// for the positive class `pos_label`.
///
/// Fails with [`VoteError::UndefinedMetric`] if `y_true` contains
/// only positive or only negative examples,
/// or if a score is `NaN`.
pub fn roc_curve(y_true: &[usize], y_score: &[f64], pos_label: usize)
    -> Result<RocCurve>
{
    check_len(y_true.len(), y_score.len())?;
    if y_score.iter().any(|s| s.is_nan()) {
        return Err(VoteError::UndefinedMetric(
            "the scores contain NaN".to_string()
        ));
    }

    let n_pos = y_true.iter().filter(|&&y| y == pos_label).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(VoteError::UndefinedMetric(
            "ROC needs both positive and negative examples".to_string()
        ));
    }

    let mut order = (0..y_score.len()).collect::<Vec<_>>();
    order.sort_by(|&i, &j| y_score[j].total_cmp(&y_score[i]));

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];

    let (mut tp, mut fp) = (0_usize, 0_usize);
    for (p, &i) in order.iter().enumerate() {
        if y_true[i] == pos_label { tp += 1; } else { fp += 1; }

        // emit a point after the last example of each distinct score
        let last = order.get(p + 1)
            .map_or(true, |&j| y_score[j] != y_score[i]);
        if last {
            fpr.push(fp as f64 / n_neg as f64);
            tpr.push(tp as f64 / n_pos as f64);
            thresholds.push(y_score[i]);
        }
    }

    Ok(RocCurve { fpr, tpr, thresholds })
}


/// Computes the area under the curve `(x, y)` with the trapezoidal rule.
///
/// `x` must be monotonic (increasing or decreasing).
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    check_len(x.len(), y.len())?;
    if x.len() < 2 {
        return Err(VoteError::UndefinedMetric(format!(
            "at least 2 points are needed to compute an area, got {}",
            x.len()
        )));
    }

    let increasing = x.windows(2).all(|w| w[0] <= w[1]);
    let decreasing = x.windows(2).all(|w| w[0] >= w[1]);
    if !(increasing || decreasing) {
        return Err(VoteError::UndefinedMetric(
            "x is neither increasing nor decreasing".to_string()
        ));
    }

    let area = x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum::<f64>();

    Ok(if decreasing && !increasing { -area } else { area })
}


/// Computes the area under the ROC curve of a binary problem.
/// The positive class is `1`.
pub fn roc_auc_score(y_true: &[usize], y_score: &[f64]) -> Result<f64> {
    if let Some(y) = y_true.iter().find(|&&y| y > 1) {
        return Err(VoteError::UndefinedMetric(format!(
            "ROC AUC expects binary labels 0/1, got label {y}"
        )));
    }
    let curve = roc_curve(y_true, y_score, 1)?;
    auc(&curve.fpr, &curve.tpr)
}


/// Returns the fraction of `y_pred` that equals `y_true`.
pub fn accuracy_score<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> Result<f64> {
    check_len(y_true.len(), y_pred.len())?;
    if y_true.is_empty() {
        return Err(VoteError::UndefinedMetric(
            "accuracy of an empty prediction".to_string()
        ));
    }

    let n_correct = y_true.iter()
        .zip(y_pred)
        .filter(|(y, p)| y == p)
        .count();
    Ok(n_correct as f64 / y_true.len() as f64)
}


fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(VoteError::ShapeMismatch {
            what: "number of scores",
            expected,
            got,
        });
    }
    Ok(())
}
