//! Defines the majority-vote ensemble.
use log::debug;

use std::fmt;

use crate::{Classifier, Sample};
use crate::classifier::describe_classifier;
use crate::common::{checker, utils};
use crate::error::{Result, VoteError};
use crate::params::{self, Params, ParamValue};
use crate::preprocessing::LabelEncoder;

use super::vote::Vote;


/// A meta-classifier that combines base classifiers by (weighted) voting.
///
/// With [`Vote::ClassLabel`], every base classifier adds its weight
/// to the label it predicts and the label with the largest total wins.
/// With [`Vote::Probability`], the class probabilities of the
/// base classifiers are averaged with their weights and
/// the most probable class wins.
/// In both modes, ties go to the class that comes first
/// in the sorted label domain.
///
/// The classifiers given at construction are kept as prototypes.
/// `fit` trains a fresh copy of each prototype,
/// so the caller's classifiers are never modified.
///
/// The labels `L` are arbitrary ordered values;
/// they are encoded to `0..K` before reaching the base classifiers.
///
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let (sample, species) = load_iris().unwrap();
///
/// let mut ensemble: MajorityVoteClassifier<String> = MajorityVoteBuilder::new()
///     .classifier(DecisionTreeClassifier::new().max_depth(Some(1)))
///     .classifier(KNeighborsClassifier::new().n_neighbors(1))
///     .classifier(LogisticRegression::new())
///     .vote(Vote::Probability)
///     .build()
///     .unwrap();
///
/// ensemble.fit(&sample, &species).unwrap();
/// let predictions = ensemble.predict(&sample).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MajorityVoteClassifier<L = usize> {
    classifiers: Vec<Box<dyn Classifier>>,
    names: Vec<String>,
    vote: Vote,
    weights: Option<Vec<f64>>,

    encoder: Option<LabelEncoder<L>>,
    fitted: Vec<Box<dyn Classifier>>,
}


/// A builder of [`MajorityVoteClassifier`].
#[derive(Debug, Default)]
pub struct MajorityVoteBuilder {
    classifiers: Vec<Box<dyn Classifier>>,
    vote: Vote,
    weights: Option<Vec<f64>>,
}


impl MajorityVoteBuilder {
    /// Construct a new instance of `MajorityVoteBuilder`
    /// with no classifier, label voting, and uniform weights.
    pub fn new() -> Self {
        Self::default()
    }


    /// Append a base classifier.
    pub fn classifier<C>(mut self, clf: C) -> Self
        where C: Classifier + 'static
    {
        self.classifiers.push(Box::new(clf));
        self
    }


    /// Append a boxed base classifier.
    pub fn boxed(mut self, clf: Box<dyn Classifier>) -> Self {
        self.classifiers.push(clf);
        self
    }


    /// Set the voting rule.
    pub fn vote(mut self, vote: Vote) -> Self {
        self.vote = vote;
        self
    }


    /// Set one weight per base classifier.
    pub fn weights<W: Into<Vec<f64>>>(mut self, weights: W) -> Self {
        self.weights = Some(weights.into());
        self
    }


    /// Build the ensemble.
    /// See [`MajorityVoteClassifier::new`] for the failure cases.
    pub fn build<L>(self) -> Result<MajorityVoteClassifier<L>>
        where L: Ord + Clone + fmt::Debug,
    {
        MajorityVoteClassifier::new(self.classifiers, self.vote, self.weights)
    }
}


impl<L> MajorityVoteClassifier<L>
    where L: Ord + Clone + fmt::Debug,
{
    /// Construct a new ensemble.
    ///
    /// Fails with [`VoteError::Configuration`] if
    /// - `classifiers` is empty,
    /// - `weights` does not have one finite, non-negative weight
    ///   per classifier with a positive sum, or
    /// - `vote` is [`Vote::Probability`] and a classifier
    ///   cannot predict probabilities.
    pub fn new(
        classifiers: Vec<Box<dyn Classifier>>,
        vote: Vote,
        weights: Option<Vec<f64>>,
    ) -> Result<Self>
    {
        let type_names = classifiers.iter()
            .map(|clf| clf.name())
            .collect::<Vec<_>>();
        let names = params::name_estimators(&type_names);

        let ensemble = Self {
            classifiers,
            names,
            vote,
            weights,
            encoder: None,
            fitted: Vec::new(),
        };
        ensemble.validate()?;
        Ok(ensemble)
    }


    fn validate(&self) -> Result<()> {
        if self.classifiers.is_empty() {
            return Err(VoteError::Configuration(
                "an ensemble needs at least one classifier".to_string()
            ));
        }

        if let Some(weights) = self.weights.as_ref() {
            checker::check_weights(weights, self.classifiers.len())?;
        }

        if self.vote == Vote::Probability {
            let position = self.classifiers.iter()
                .position(|clf| !clf.supports_proba());
            if let Some(i) = position {
                return Err(VoteError::Configuration(format!(
                    "probability voting needs `predict_proba`, \
                     but {} does not support it",
                    self.names[i]
                )));
            }
        }
        Ok(())
    }


    /// Returns the voting rule.
    pub fn vote(&self) -> Vote {
        self.vote
    }


    /// Returns the generated names of the base classifiers.
    pub fn names(&self) -> &[String] {
        &self.names[..]
    }


    /// Returns the (unfitted) prototypes given at construction.
    pub fn classifiers(&self) -> &[Box<dyn Classifier>] {
        &self.classifiers[..]
    }


    /// Returns the base classifiers trained by the last `fit`.
    pub fn fitted_classifiers(&self) -> &[Box<dyn Classifier>] {
        &self.fitted[..]
    }


    /// Returns the label domain learned by `fit`, in code order.
    pub fn classes(&self) -> Result<&[L]> {
        Ok(self.encoder()?.classes())
    }


    fn encoder(&self) -> Result<&LabelEncoder<L>> {
        self.encoder.as_ref()
            .ok_or_else(|| VoteError::not_fitted("MajorityVoteClassifier"))
    }


    fn weights_or_uniform(&self) -> Vec<f64> {
        self.weights.clone()
            .unwrap_or_else(|| vec![1.0; self.classifiers.len()])
    }


    /// Trains a copy of every base classifier on `sample` and `target`.
    ///
    /// `target` must have one label per row and at least two
    /// distinct labels.
    /// If a base classifier fails, the error carries its position
    /// and the ensemble keeps its previous state.
    pub fn fit(&mut self, sample: &Sample, target: &[L]) -> Result<&mut Self> {
        sample.check_target_len(target.len())?;

        let (encoder, codes) = LabelEncoder::fit_transform(target)?;
        if encoder.n_classes() < 2 {
            return Err(VoteError::Configuration(format!(
                "the target needs at least 2 distinct labels, got {}",
                encoder.n_classes()
            )));
        }

        let mut fitted = Vec::with_capacity(self.classifiers.len());
        let iter = self.classifiers.iter().zip(&self.names).enumerate();
        for (position, (prototype, name)) in iter {
            debug!(
                "fitting base classifier #{position} ({name}) on {} examples",
                codes.len()
            );
            let mut clf = prototype.boxed_clone();
            clf.fit(sample, &codes)
                .map_err(|e| VoteError::BaseClassifier {
                    position,
                    name: name.clone(),
                    source: Box::new(e),
                })?;
            fitted.push(clf);
        }

        self.encoder = Some(encoder);
        self.fitted = fitted;
        Ok(self)
    }


    /// Predicts a label for each row of `sample`.
    pub fn predict(&self, sample: &Sample) -> Result<Vec<L>> {
        let codes = self.predict_codes(sample)?;
        self.encoder()?.inverse_transform(&codes)
    }


    /// Returns the weighted average of the class probabilities of
    /// the base classifiers.
    /// The `k`-th column corresponds to `self.classes()[k]`.
    ///
    /// Only available with [`Vote::Probability`].
    pub fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        if self.vote != Vote::Probability {
            return Err(VoteError::UnsupportedOperation {
                estimator: "MajorityVoteClassifier".to_string(),
                operation: "predict_proba",
            });
        }
        let n_class = self.encoder()?.n_classes();
        self.average_proba(sample, n_class)
    }


    fn predict_codes(&self, sample: &Sample) -> Result<Vec<usize>> {
        let n_class = self.encoder()?.n_classes();

        let scores = match self.vote {
            Vote::Probability => self.average_proba(sample, n_class)?,
            Vote::ClassLabel => self.weighted_counts(sample, n_class)?,
        };

        let codes = scores.iter()
            .map(|row| utils::argmax(row))
            .collect();
        Ok(codes)
    }


    /// Returns the weighted number of votes for every class.
    fn weighted_counts(&self, sample: &Sample, n_class: usize)
        -> Result<Vec<Vec<f64>>>
    {
        let n_sample = sample.shape().0;
        let mut counts = vec![vec![0.0; n_class]; n_sample];

        let weights = self.weights_or_uniform();
        for (clf, w) in self.fitted.iter().zip(weights) {
            let labels = clf.predict(sample)?;
            if labels.len() != n_sample {
                return Err(VoteError::ShapeMismatch {
                    what: "number of predictions",
                    expected: n_sample,
                    got: labels.len(),
                });
            }

            for (count, k) in counts.iter_mut().zip(labels) {
                let slot = count.get_mut(k)
                    .ok_or_else(|| VoteError::UnknownLabel(format!(
                        "code {k} predicted by {}", clf.name()
                    )))?;
                *slot += w;
            }
        }
        Ok(counts)
    }


    fn average_proba(&self, sample: &Sample, n_class: usize)
        -> Result<Vec<Vec<f64>>>
    {
        let n_sample = sample.shape().0;
        let mut average = vec![vec![0.0; n_class]; n_sample];

        let weights = self.weights_or_uniform();
        let total = weights.iter().sum::<f64>();
        for (clf, w) in self.fitted.iter().zip(weights) {
            let proba = clf.predict_proba(sample)?;
            if proba.len() != n_sample {
                return Err(VoteError::ShapeMismatch {
                    what: "number of probability rows",
                    expected: n_sample,
                    got: proba.len(),
                });
            }

            for (acc, row) in average.iter_mut().zip(proba) {
                if row.len() != n_class {
                    return Err(VoteError::ShapeMismatch {
                        what: "number of probability columns",
                        expected: n_class,
                        got: row.len(),
                    });
                }
                acc.iter_mut()
                    .zip(row)
                    .for_each(|(a, p)| { *a += w * p; });
            }
        }

        average.iter_mut()
            .flatten()
            .for_each(|a| { *a /= total; });
        Ok(average)
    }


    /// Returns the parameters of this ensemble.
    ///
    /// The shallow parameters are `classifiers`, `vote`, and `weights`.
    /// If `deep` is `true`, each base classifier is also listed under
    /// its generated name, followed by its own parameters
    /// under `{name}__{param}` keys.
    pub fn get_params(&self, deep: bool) -> Params {
        let mut out = Params::new();

        let classifiers = self.classifiers.iter()
            .map(|clf| describe_classifier(clf.as_ref()))
            .collect::<Vec<_>>();
        out.insert("classifiers".into(), ParamValue::List(classifiers));
        out.insert("vote".into(), self.vote.to_string().into());
        let weights = self.weights.as_ref()
            .map(|ws| ParamValue::List(ws.iter().map(|&w| w.into()).collect()))
            .unwrap_or(ParamValue::Null);
        out.insert("weights".into(), weights);

        if !deep { return out; }

        for (name, clf) in self.names.iter().zip(&self.classifiers) {
            out.insert(name.clone(), describe_classifier(clf.as_ref()));
            params::extend_prefixed(&mut out, name, clf.params(true));
        }
        out
    }


    /// Sets several parameters, in key order.
    /// Nested keys `{name}__{param}` reach the base classifier `name`.
    /// `vote` may be replaced here; the new mode is checked like
    /// at construction.
    /// Any accepted change discards the fitted state,
    /// and a rejected one leaves the ensemble as it was.
    pub fn set_params(&mut self, params: &Params) -> Result<()> {
        params.iter()
            .try_for_each(|(key, value)| self.update_param(key, value))
    }


    fn update_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        match key {
            "vote" => {
                let vote = value.as_str(key)?.parse()?;
                let old = std::mem::replace(&mut self.vote, vote);
                if let Err(e) = self.validate() {
                    self.vote = old;
                    return Err(e);
                }
            },
            "weights" => {
                let weights = match value {
                    ParamValue::Null => None,
                    _ => Some(value.as_f64_list(key)?),
                };
                let old = std::mem::replace(&mut self.weights, weights);
                if let Err(e) = self.validate() {
                    self.weights = old;
                    return Err(e);
                }
            },
            "classifiers" => {
                return Err(VoteError::Configuration(
                    "base classifiers cannot be replaced by `set_params`, \
                     build a new ensemble instead".to_string()
                ));
            },
            _ => {
                let (name, rest) = params::split_nested(key)
                    .ok_or_else(|| VoteError::invalid_parameter(
                        "MajorityVoteClassifier", key
                    ))?;
                let position = self.names.iter()
                    .position(|n| n == name)
                    .ok_or_else(|| VoteError::invalid_parameter(
                        "MajorityVoteClassifier", key
                    ))?;
                let old = self.classifiers[position].boxed_clone();
                let updated = self.classifiers[position]
                    .set_param(rest, value)
                    .and_then(|_| self.validate());
                if let Err(e) = updated {
                    self.classifiers[position] = old;
                    return Err(e);
                }
            },
        }

        self.encoder = None;
        self.fitted.clear();
        Ok(())
    }
}


impl Classifier for MajorityVoteClassifier<usize> {
    fn name(&self) -> &str {
        "MajorityVoteClassifier"
    }


    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()> {
        MajorityVoteClassifier::fit(self, sample, target)?;
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> Result<Vec<usize>> {
        MajorityVoteClassifier::predict(self, sample)
    }


    fn supports_proba(&self) -> bool {
        self.vote == Vote::Probability
    }


    /// The columns are indexed by label value,
    /// so labels absent from the training target get a zero column.
    fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        let proba = MajorityVoteClassifier::predict_proba(self, sample)?;
        let classes = self.classes()?;
        let width = classes.last().map_or(0, |&k| k + 1);

        let proba = proba.into_iter()
            .map(|row| {
                let mut out = vec![0.0; width];
                for (&k, p) in classes.iter().zip(row) {
                    out[k] = p;
                }
                out
            })
            .collect();
        Ok(proba)
    }


    fn params(&self, deep: bool) -> Params {
        self.get_params(deep)
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        self.update_param(key, value)
    }


    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }


    fn is_fitted(&self) -> bool {
        self.encoder.is_some()
    }
}
