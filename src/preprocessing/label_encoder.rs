use serde::{Serialize, Deserialize};

use std::fmt;
use std::collections::BTreeSet;

use crate::error::{Result, VoteError};


/// Maps raw labels to the codes `0, 1, ..., K-1` and back.
///
/// The classes are the distinct labels seen by [`LabelEncoder::fit`],
/// sorted in ascending order, so the encoding is deterministic.
/// # Example
/// ```
/// use minivotes::preprocessing::LabelEncoder;
///
/// let y = ["virginica", "versicolor", "virginica"];
/// let encoder = LabelEncoder::fit(&y);
/// assert_eq!(encoder.classes(), ["versicolor", "virginica"]);
/// assert_eq!(encoder.transform(&y).unwrap(), [1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}


impl<L> LabelEncoder<L>
    where L: Ord + Clone + fmt::Debug,
{
    /// Learns the classes from `target`.
    pub fn fit(target: &[L]) -> Self {
        let classes = target.iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        Self { classes }
    }


    /// Learns the classes from `target` and returns the encoded labels.
    pub fn fit_transform(target: &[L]) -> Result<(Self, Vec<usize>)> {
        let encoder = Self::fit(target);
        let codes = encoder.transform(target)?;
        Ok((encoder, codes))
    }


    /// Returns the sorted classes.
    pub fn classes(&self) -> &[L] {
        &self.classes[..]
    }


    /// Returns the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }


    fn code_of(&self, label: &L) -> Option<usize> {
        self.classes.binary_search(label).ok()
    }


    /// Encodes `target`.
    /// Fails if a label was not seen by `fit`.
    pub fn transform(&self, target: &[L]) -> Result<Vec<usize>> {
        target.iter()
            .map(|y| {
                self.code_of(y)
                    .ok_or_else(|| VoteError::UnknownLabel(format!("{y:?}")))
            })
            .collect()
    }


    /// Decodes label codes back to the original labels.
    /// Fails if a code is not smaller than `self.n_classes()`.
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<L>> {
        codes.iter()
            .map(|&k| {
                self.classes.get(k)
                    .cloned()
                    .ok_or_else(|| VoteError::UnknownLabel(
                        format!("code {k} (only {} classes)", self.n_classes())
                    ))
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_are_rejected() {
        let encoder = LabelEncoder::fit(&[3, 1, 3]);
        assert_eq!(encoder.classes(), [1, 3]);
        assert!(encoder.transform(&[2]).is_err());
        assert!(encoder.inverse_transform(&[2]).is_err());
        assert_eq!(encoder.inverse_transform(&[1, 0]).unwrap(), [3, 1]);
    }
}
