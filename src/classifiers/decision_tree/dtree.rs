//! Defines the decision tree classifier.
use serde::{Serialize, Deserialize};

use std::fmt;
use std::path::Path;
use std::fs::File;
use std::io::prelude::*;

use crate::{Classifier, Sample};
use crate::common::checker;
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};

use super::criterion::Criterion;
use super::node::*;


/// The Decision Tree algorithm (CART).
///
/// Every node is split by the threshold that minimizes the
/// weighted impurity of its children.
/// Thresholds are the midpoints between consecutive distinct values
/// of a feature, and the first best rule (in feature/threshold order)
/// wins ties, so training is deterministic.
/// Each leaf keeps the class frequencies of its training examples,
/// which `predict_proba` returns.
///
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let tree = DecisionTreeClassifier::new()
///     .max_depth(Some(1))
///     .criterion(Criterion::Entropy);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    criterion: Criterion,
    max_depth: Option<usize>,
    min_samples_split: usize,

    root: Option<Node>,
    n_class: usize,
    n_feature: usize,
}


impl DecisionTreeClassifier {
    /// Construct a new instance of [`DecisionTreeClassifier`].
    /// By default, the parameters are set as follows;
    /// ```text
    /// criterion: Criterion::Gini,
    /// max_depth: None (unlimited),
    /// min_samples_split: 2,
    /// ```
    pub fn new() -> Self {
        Self {
            criterion: Criterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            root: None,
            n_class: 0,
            n_feature: 0,
        }
    }


    /// Specify the maximal depth of the tree.
    /// `None` grows the tree until the leaves are pure.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }


    /// Set the node splitting rule.
    #[inline]
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }


    /// Set the minimal number of examples required to split a node.
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }


    /// Returns the depth of the fitted tree.
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }


    fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(VoteError::Configuration(
                "max_depth must be positive".to_string()
            ));
        }
        if self.min_samples_split < 2 {
            return Err(VoteError::Configuration(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        Ok(())
    }


    fn root(&self) -> Result<&Node> {
        self.root.as_ref()
            .ok_or_else(|| VoteError::not_fitted(self.name()))
    }


    /// Grows the subtree for the examples in `indices`.
    fn grow(
        &self,
        sample: &Sample,
        target: &[usize],
        indices: Vec<usize>,
        depth: usize,
    ) -> Node
    {
        let counts = class_counts(target, &indices, self.n_class);

        let reached_depth = self.max_depth.is_some_and(|d| depth >= d);
        let too_small = indices.len() < self.min_samples_split;
        let is_pure = self.criterion.impurity(&counts) <= 0.0;

        if !(reached_depth || too_small || is_pure) {
            if let Some(rule) = self.best_split(sample, target, &indices) {
                let (left, right) = indices.into_iter()
                    .partition::<Vec<_>, _>(|&i| {
                        rule.split(sample, i) == LR::Left
                    });
                let left = self.grow(sample, target, left, depth + 1);
                let right = self.grow(sample, target, right, depth + 1);
                return Node::Branch(BranchNode {
                    rule,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
        }

        Node::Leaf(LeafNode::from_counts(&counts))
    }


    /// Returns the rule that minimizes the weighted impurity
    /// of the children, or `None` if no feature separates `indices`.
    fn best_split(&self, sample: &Sample, target: &[usize], indices: &[usize])
        -> Option<Splitter>
    {
        let mut best: Option<(f64, Splitter)> = None;

        for (j, feature) in sample.features().iter().enumerate() {
            let mut sorted = indices.to_vec();
            sorted.sort_by(|&a, &b| feature[a].total_cmp(&feature[b]));

            let mut left = vec![0_usize; self.n_class];
            let mut right = class_counts(target, &sorted, self.n_class);

            for p in 1..sorted.len() {
                let moved = sorted[p - 1];
                left[target[moved]] += 1;
                right[target[moved]] -= 1;

                let (lo, hi) = (feature[moved], feature[sorted[p]]);
                if lo >= hi { continue; }

                let score = self.criterion.split_impurity(&left, &right);
                if best.as_ref().map_or(true, |(s, _)| score < *s) {
                    let mid = 0.5 * (lo + hi);
                    let threshold = if mid < hi { mid } else { lo };
                    let rule = Splitter {
                        feature: j,
                        name: feature.name().to_string(),
                        threshold,
                    };
                    best = Some((score, rule));
                }
            }
        }
        best.map(|(_, rule)| rule)
    }


    /// Write the current decision tree to dot file.
    #[inline]
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let root = self.root()?;
        let mut f = File::create(path)?;
        f.write_all(b"graph DecisionTree {\n")?;

        let info = root.to_dot_info(0).0;
        for row in info {
            f.write_all(row.as_bytes())?;
        }

        f.write_all(b"}\n")?;

        Ok(())
    }
}


impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}


fn class_counts(target: &[usize], indices: &[usize], n_class: usize)
    -> Vec<usize>
{
    let mut counts = vec![0_usize; n_class];
    for &i in indices {
        counts[target[i]] += 1;
    }
    counts
}


impl Classifier for DecisionTreeClassifier {
    fn name(&self) -> &str {
        "DecisionTreeClassifier"
    }


    /// This method grows the tree greedily from the root,
    /// then stores the class frequencies at each leaf.
    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()> {
        self.validate()?;
        checker::check_sample(sample, target)?;

        self.n_class = checker::n_classes(target);
        self.n_feature = sample.shape().1;

        let indices = (0..target.len()).collect::<Vec<_>>();
        let root = self.grow(sample, target, indices, 0);
        self.root = Some(root);
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> Result<Vec<usize>> {
        let root = self.root()?;
        checker::check_n_feature(sample, self.n_feature)?;

        let n_sample = sample.shape().0;
        let labels = (0..n_sample)
            .map(|row| root.leaf(sample, row).label)
            .collect();
        Ok(labels)
    }


    fn supports_proba(&self) -> bool {
        true
    }


    fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        let root = self.root()?;
        checker::check_n_feature(sample, self.n_feature)?;

        let n_sample = sample.shape().0;
        let proba = (0..n_sample)
            .map(|row| root.leaf(sample, row).proba.clone())
            .collect();
        Ok(proba)
    }


    fn params(&self, _deep: bool) -> Params {
        let mut params = Params::new();
        params.insert("criterion".into(), self.criterion.to_string().into());
        params.insert("max_depth".into(), self.max_depth.into());
        params.insert("min_samples_split".into(), self.min_samples_split.into());
        params
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        match key {
            "criterion" => {
                self.criterion = value.as_str(key)?.parse()?;
            },
            "max_depth" => {
                let depth = value.as_optional_usize(key)?;
                if depth == Some(0) {
                    return Err(value.type_error(key, "a positive integer or None"));
                }
                self.max_depth = depth;
            },
            "min_samples_split" => {
                let n = value.as_usize(key)?;
                if n < 2 {
                    return Err(value.type_error(key, "an integer >= 2"));
                }
                self.min_samples_split = n;
            },
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
        self.root.is_some()
    }
}


impl fmt::Display for DecisionTreeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self.max_depth
            .map_or("Unlimited".to_string(), |d| d.to_string());
        write!(
            f,
            "\
            ----------\n\
            # Decision Tree Classifier\n\n\
            - Max depth: {depth}\n\
            - Splitting criterion: {}\n\
            - Min. samples to split: {}\n\
            ----------\
            ",
            self.criterion,
            self.min_samples_split,
        )
    }
}
