use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;

use crate::error::VoteError;


/// How the base classifiers of an ensemble are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    /// Hard voting.
    /// Each classifier adds its weight to the label it predicts.
    #[default]
    ClassLabel,
    /// Soft voting.
    /// The class probabilities of the classifiers are averaged
    /// with their weights.
    Probability,
}


impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ClassLabel => "classlabel",
            Self::Probability => "probability",
        };
        write!(f, "{name}")
    }
}


impl FromStr for Vote {
    type Err = VoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "classlabel" => Ok(Self::ClassLabel),
            "probability" => Ok(Self::Probability),
            _ => Err(VoteError::ParameterType {
                key: "vote".to_string(),
                expected: "`classlabel` or `probability`",
                got: s.to_string(),
            }),
        }
    }
}
