//! This file provides some common numeric functions.


/// Returns the index of the maximal value.
/// Ties are broken by the lowest index.
/// Returns `0` for an empty slice.
#[inline(always)]
pub fn argmax(items: &[f64]) -> usize {
    let mut best = 0_usize;
    for (k, &x) in items.iter().enumerate().skip(1) {
        if x > items[best] { best = k; }
    }
    best
}


/// Returns the mean and the population standard deviation.
/// Returns `(0.0, 0.0)` for an empty slice.
#[inline(always)]
pub fn mean_and_std(items: &[f64]) -> (f64, f64) {
    if items.is_empty() { return (0.0, 0.0); }
    let n = items.len() as f64;
    let mean = items.iter().sum::<f64>() / n;
    let var = items.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}


/// Compute the inner-product of the given two slices.
#[inline(always)]
pub(crate) fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Normalize `items` so that they sum to `1`.
/// A slice with zero mass is left untouched.
#[inline(always)]
pub(crate) fn normalize(items: &mut [f64]) {
    let z = items.iter()
        .map(|it| it.abs())
        .sum::<f64>();

    if z == 0.0 { return; }

    items.iter_mut()
        .for_each(|item| { *item /= z; });
}


/// Compute the entropy (in bits) of the given distribution.
#[inline(always)]
pub(crate) fn entropy(dist: &[f64]) -> f64 {
    - dist.iter()
        .copied()
        .map(|d| if d == 0.0 { 0.0 } else { d * d.log2() })
        .sum::<f64>()
}


/// Compute the Gini index of the given distribution.
#[inline(always)]
pub(crate) fn gini(dist: &[f64]) -> f64 {
    1.0 - dist.iter()
        .map(|d| d * d)
        .sum::<f64>()
}


/// Numerically stable softmax, in place.
#[inline(always)]
pub(crate) fn softmax(scores: &mut [f64]) {
    let max = scores.iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    scores.iter_mut()
        .for_each(|s| { *s = (*s - max).exp(); });
    normalize(scores);
}


/// The logistic sigmoid function.
#[inline(always)]
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), 1);
        assert_eq!(argmax(&[]), 0);
    }


    #[test]
    fn population_std() {
        let (mean, std) = mean_and_std(&[1.0, 3.0]);
        assert_eq!(mean, 2.0);
        assert_eq!(std, 1.0);
    }


    #[test]
    fn softmax_sums_to_one() {
        let mut s = vec![1000.0, 1000.0, 999.0];
        softmax(&mut s);
        assert!((s.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((s[0] - s[1]).abs() < 1e-12);
    }
}
