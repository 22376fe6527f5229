//! Defines the splitting criteria of the decision tree.

use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;

use crate::common::utils;
use crate::error::VoteError;


/// Splitting criteria for growing decision tree.
/// * `Criterion::Entropy` minimizes entropic impurity.
/// * `Criterion::Gini` minimizes Gini impurity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    /// Binary entropy function.
    Entropy,
    /// Gini index.
    Gini,
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entropy => "entropy",
            Self::Gini => "gini",
        };

        write!(f, "{name}")
    }
}


impl FromStr for Criterion {
    type Err = VoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entropy" => Ok(Self::Entropy),
            "gini" => Ok(Self::Gini),
            _ => Err(VoteError::ParameterType {
                key: "criterion".to_string(),
                expected: "`entropy` or `gini`",
                got: s.to_string(),
            }),
        }
    }
}


impl Criterion {
    /// Returns the impurity of a node with the given class counts.
    #[inline]
    pub(super) fn impurity(&self, counts: &[usize]) -> f64 {
        let total = counts.iter().sum::<usize>() as f64;
        if total == 0.0 { return 0.0; }

        let dist = counts.iter()
            .map(|&c| c as f64 / total)
            .collect::<Vec<_>>();

        match self {
            Self::Entropy => utils::entropy(&dist),
            Self::Gini => utils::gini(&dist),
        }
    }


    /// Returns the weighted impurity of a split into two children.
    #[inline]
    pub(super) fn split_impurity(&self, left: &[usize], right: &[usize])
        -> f64
    {
        let n_left = left.iter().sum::<usize>() as f64;
        let n_right = right.iter().sum::<usize>() as f64;
        let total = n_left + n_right;

        (n_left * self.impurity(left) + n_right * self.impurity(right))
            / total
    }
}
