//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data

use crate::Sample;
use crate::error::{Result, VoteError};


/// Check whether the training sample is valid or not.
#[inline(always)]
pub(crate) fn check_sample(sample: &Sample, target: &[usize]) -> Result<()>
{
    let (n_sample, n_feature) = sample.shape();

    // `data` and `target` must have the same length.
    sample.check_target_len(target.len())?;


    // `data` must have an example.
    if n_sample == 0 {
        return Err(VoteError::Configuration(
            "the training sample is empty".to_string()
        ));
    }


    // `data` must have a feature.
    if n_feature == 0 {
        return Err(VoteError::Configuration(
            "the training sample has no feature".to_string()
        ));
    }
    Ok(())
}


/// Check that `sample` has `n_feature` columns.
#[inline(always)]
pub(crate) fn check_n_feature(sample: &Sample, n_feature: usize)
    -> Result<()>
{
    let got = sample.shape().1;
    if got != n_feature {
        return Err(VoteError::ShapeMismatch {
            what: "number of features",
            expected: n_feature,
            got,
        });
    }
    Ok(())
}


/// Check the voting weights:
/// one finite, non-negative weight per classifier with a positive sum.
#[inline(always)]
pub(crate) fn check_weights(weights: &[f64], n_classifier: usize)
    -> Result<()>
{
    if weights.len() != n_classifier {
        return Err(VoteError::Configuration(format!(
            "got {} weights for {n_classifier} classifiers",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(VoteError::Configuration(
            "weights must be finite and non-negative".to_string()
        ));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(VoteError::Configuration(
            "weights must have a positive sum".to_string()
        ));
    }
    Ok(())
}


/// Returns the number of classes `K` of encoded labels `0..K`.
#[inline(always)]
pub(crate) fn n_classes(target: &[usize]) -> usize {
    target.iter()
        .copied()
        .max()
        .map_or(0, |k| k + 1)
}
