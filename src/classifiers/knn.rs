//! Defines the k-nearest-neighbors classifier.
use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;

use crate::{Classifier, Sample};
use crate::common::{checker, utils};
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};


/// Distance between two examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Minkowski distance with power `p`.
    Minkowski,
    /// Euclidean distance (Minkowski with `p = 2`).
    Euclidean,
    /// Manhattan distance (Minkowski with `p = 1`).
    Manhattan,
}


impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Minkowski => "minkowski",
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        };
        write!(f, "{name}")
    }
}


impl FromStr for Metric {
    type Err = VoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "minkowski" => Ok(Self::Minkowski),
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            _ => Err(VoteError::ParameterType {
                key: "metric".to_string(),
                expected: "`minkowski`, `euclidean`, or `manhattan`",
                got: s.to_string(),
            }),
        }
    }
}


/// How the votes of the neighbors are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborWeights {
    /// Every neighbor has one vote.
    Uniform,
    /// A neighbor votes with the inverse of its distance.
    Distance,
}


impl fmt::Display for NeighborWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uniform => "uniform",
            Self::Distance => "distance",
        };
        write!(f, "{name}")
    }
}


impl FromStr for NeighborWeights {
    type Err = VoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "distance" => Ok(Self::Distance),
            _ => Err(VoteError::ParameterType {
                key: "weights".to_string(),
                expected: "`uniform` or `distance`",
                got: s.to_string(),
            }),
        }
    }
}


/// The k-nearest-neighbors classifier.
/// `fit` memorizes the training examples;
/// a new example is labeled by the (weighted) votes of
/// its `n_neighbors` closest training examples.
/// Neighbors at equal distance are taken in training order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNeighborsClassifier {
    n_neighbors: usize,
    p: f64,
    metric: Metric,
    weights: NeighborWeights,

    train: Option<Vec<Vec<f64>>>,
    target: Vec<usize>,
    n_class: usize,
}


impl KNeighborsClassifier {
    /// Construct a new instance of `KNeighborsClassifier`
    /// with 5 neighbors, Minkowski metric with `p = 2`, uniform votes.
    pub fn new() -> Self {
        Self {
            n_neighbors: 5,
            p: 2.0,
            metric: Metric::Minkowski,
            weights: NeighborWeights::Uniform,
            train: None,
            target: Vec::new(),
            n_class: 0,
        }
    }


    /// Set the number of neighbors.
    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.n_neighbors = k;
        self
    }


    /// Set the power of the Minkowski metric.
    pub fn p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }


    /// Set the metric.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }


    /// Set the weighting of votes.
    pub fn weights(mut self, weights: NeighborWeights) -> Self {
        self.weights = weights;
        self
    }


    #[inline]
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        let p = match self.metric {
            Metric::Minkowski => self.p,
            Metric::Euclidean => 2.0,
            Metric::Manhattan => 1.0,
        };
        x.iter()
            .zip(y)
            .map(|(a, b)| (a - b).abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    }


    /// Returns the normalized votes of the neighbors of `x`.
    fn votes(&self, train: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        let mut dists = train.iter()
            .map(|t| self.distance(t, x))
            .enumerate()
            .collect::<Vec<_>>();
        // stable sort keeps training order among equal distances.
        dists.sort_by(|a, b| a.1.total_cmp(&b.1));
        let neighbors = &dists[..self.n_neighbors];

        let mut votes = vec![0.0; self.n_class];
        match self.weights {
            NeighborWeights::Uniform => {
                for &(i, _) in neighbors {
                    votes[self.target[i]] += 1.0;
                }
            },
            NeighborWeights::Distance => {
                let exact = neighbors.iter()
                    .any(|&(_, d)| d == 0.0);
                for &(i, d) in neighbors {
                    let w = if exact {
                        if d == 0.0 { 1.0 } else { 0.0 }
                    } else {
                        1.0 / d
                    };
                    votes[self.target[i]] += w;
                }
            },
        }
        utils::normalize(&mut votes);
        votes
    }


    fn train(&self) -> Result<&[Vec<f64>]> {
        self.train.as_deref()
            .ok_or_else(|| VoteError::not_fitted(self.name()))
    }
}


impl Default for KNeighborsClassifier {
    fn default() -> Self {
        Self::new()
    }
}


impl Classifier for KNeighborsClassifier {
    fn name(&self) -> &str {
        "KNeighborsClassifier"
    }


    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()> {
        checker::check_sample(sample, target)?;
        if self.n_neighbors == 0 {
            return Err(VoteError::Configuration(
                "n_neighbors must be positive".to_string()
            ));
        }
        if self.n_neighbors > target.len() {
            return Err(VoteError::Configuration(format!(
                "n_neighbors = {} exceeds the {} training examples",
                self.n_neighbors, target.len()
            )));
        }
        if self.p.is_nan() || self.p < 1.0 {
            return Err(VoteError::Configuration(format!(
                "p must be at least 1, got {}", self.p
            )));
        }

        self.train = Some(sample.rows());
        self.target = target.to_vec();
        self.n_class = checker::n_classes(target);
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> Result<Vec<usize>> {
        let proba = self.predict_proba(sample)?;
        let labels = proba.iter()
            .map(|p| utils::argmax(p))
            .collect();
        Ok(labels)
    }


    fn supports_proba(&self) -> bool {
        true
    }


    fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        let train = self.train()?;
        let n_feature = train.first().map_or(0, |row| row.len());
        checker::check_n_feature(sample, n_feature)?;

        let proba = sample.rows()
            .into_iter()
            .map(|x| self.votes(train, &x))
            .collect();
        Ok(proba)
    }


    fn params(&self, _deep: bool) -> Params {
        let mut params = Params::new();
        params.insert("n_neighbors".into(), self.n_neighbors.into());
        params.insert("p".into(), self.p.into());
        params.insert("metric".into(), self.metric.to_string().into());
        params.insert("weights".into(), self.weights.to_string().into());
        params
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        match key {
            "n_neighbors" => { self.n_neighbors = value.as_usize(key)?; },
            "p" => { self.p = value.as_f64(key)?; },
            "metric" => { self.metric = value.as_str(key)?.parse()?; },
            "weights" => { self.weights = value.as_str(key)?.parse()?; },
            _ => {
                return Err(VoteError::invalid_parameter(self.name(), key));
            },
        }
        Ok(())
    }


    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }


    fn is_fitted(&self) -> bool {
        self.train.is_some()
    }
}
