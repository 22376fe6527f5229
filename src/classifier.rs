//! The capability interface shared by every estimator in this crate.
//!
//! A classifier is trained on a [`Sample`] and a vector of
//! integer-encoded labels `0, 1, ..., K-1`.
//! Estimators that combine other estimators (e.g., [`Pipeline`] or
//! [`MajorityVoteClassifier`]) depend only on these traits,
//! never on the concrete type of their children.
//!
//! [`Pipeline`]: crate::classifiers::Pipeline
//! [`MajorityVoteClassifier`]: crate::ensemble::MajorityVoteClassifier
use std::fmt;

use crate::Sample;
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};


/// A trait that defines the behavior of a classifier.
pub trait Classifier: fmt::Debug + Send + Sync {
    /// The type name of this classifier, e.g., `LogisticRegression`.
    fn name(&self) -> &str;


    /// Trains this classifier on `sample` and the encoded `target`.
    /// Calling `fit` again replaces the previous fitted state.
    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()>;


    /// Predicts the label code of each row of `sample`.
    fn predict(&self, sample: &Sample) -> Result<Vec<usize>>;


    /// Returns `true` if this classifier can produce
    /// per-class probabilities.
    fn supports_proba(&self) -> bool {
        false
    }


    /// Predicts the class probabilities of each row of `sample`.
    /// The `k`-th column corresponds to the label code `k`.
    fn predict_proba(&self, _sample: &Sample) -> Result<Vec<Vec<f64>>> {
        Err(VoteError::UnsupportedOperation {
            estimator: self.name().to_string(),
            operation: "predict_proba",
        })
    }


    /// Returns the hyperparameters of this classifier.
    /// If `deep` is `true`, the parameters of nested estimators
    /// are included under `{child}__{param}` keys.
    fn params(&self, deep: bool) -> Params;


    /// Sets a single hyperparameter.
    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()>;


    /// Sets several hyperparameters at once, in key order.
    fn set_params(&mut self, params: &Params) -> Result<()> {
        params.iter()
            .try_for_each(|(key, value)| self.set_param(key, value))
    }


    /// Returns a boxed copy of this classifier.
    fn boxed_clone(&self) -> Box<dyn Classifier>;


    /// Returns `true` if `fit` has been called successfully.
    fn is_fitted(&self) -> bool;
}


impl Clone for Box<dyn Classifier> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}


/// A trait that defines the behavior of a preprocessing step
/// used in a [`Pipeline`](crate::classifiers::Pipeline).
pub trait Transformer: fmt::Debug + Send + Sync {
    /// The type name of this transformer, e.g., `StandardScaler`.
    fn name(&self) -> &str;


    /// Learns the transformation from `sample`.
    fn fit(&mut self, sample: &Sample) -> Result<()>;


    /// Applies the learned transformation.
    fn transform(&self, sample: &Sample) -> Result<Sample>;


    /// Learns the transformation and applies it to `sample`.
    fn fit_transform(&mut self, sample: &Sample) -> Result<Sample> {
        self.fit(sample)?;
        self.transform(sample)
    }


    /// Returns the hyperparameters of this transformer.
    fn params(&self) -> Params;


    /// Sets a single hyperparameter.
    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()>;


    /// Returns a boxed copy of this transformer.
    fn boxed_clone(&self) -> Box<dyn Transformer>;
}


impl Clone for Box<dyn Transformer> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}


/// Renders a classifier as `Name(key=value, ...)`.
pub(crate) fn describe_classifier(clf: &dyn Classifier) -> ParamValue {
    ParamValue::Estimator(crate::params::describe(clf.name(), &clf.params(false)))
}
