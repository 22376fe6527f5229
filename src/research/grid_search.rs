//! Exhaustive search over a grid of hyperparameters.
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use std::collections::BTreeMap;

use crate::{Classifier, Sample};
use crate::common::utils;
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};

use super::cross_validation::{score_folds, Scoring, StratifiedKFold};


/// Candidate values of each parameter.
/// Keys follow the parameter contract, e.g., `pipeline-1__clf__C`.
pub type ParamGrid = BTreeMap<String, Vec<ParamValue>>;


/// Expands `grid` to every combination of its values.
///
/// Keys are iterated in sorted order and the last key varies fastest.
/// An empty grid yields one empty combination.
pub fn parameter_grid(grid: &ParamGrid) -> Vec<Params> {
    grid.iter()
        .fold(vec![Params::new()], |combos, (key, values)| {
            combos.into_iter()
                .flat_map(move |combo| {
                    values.iter().map(move |value| {
                        let mut next = combo.clone();
                        next.insert(key.clone(), value.clone());
                        next
                    })
                })
                .collect()
        })
}


/// The scores of every candidate of a grid search.
/// The `i`-th entry of each field belongs to the `i`-th candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvResults {
    /// The parameters of each candidate.
    pub params: Vec<Params>,
    /// The mean of the fold scores.
    pub mean_test_score: Vec<f64>,
    /// The (population) standard deviation of the fold scores.
    pub std_test_score: Vec<f64>,
    /// The score on each fold.
    pub split_test_scores: Vec<Vec<f64>>,
    /// `1` for the best mean score; equal means share a rank.
    pub rank_test_score: Vec<usize>,
}


impl CvResults {
    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.params.len()
    }


    /// Returns `true` if no candidate was evaluated.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }


    /// Serializes the results as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}


/// Exhaustive grid search with cross validation.
///
/// Every candidate is evaluated on the same folds,
/// in parallel over the candidates.
/// The best candidate is the first one with the highest mean score.
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let (sample, species) = load_iris().unwrap();
/// let (_, y) = LabelEncoder::fit_transform(&species).unwrap();
///
/// let mut grid = ParamGrid::new();
/// grid.insert("max_depth".into(), vec![1_usize.into(), 2_usize.into()]);
///
/// let mut search = GridSearchCV::new(DecisionTreeClassifier::new(), grid)
///     .cv(StratifiedKFold::new(5))
///     .scoring(Scoring::Accuracy);
/// search.fit(&sample, &y).unwrap();
/// println!("{:?}", search.best_params().unwrap());
/// ```
#[derive(Debug)]
pub struct GridSearchCV {
    estimator: Box<dyn Classifier>,
    grid: ParamGrid,
    cv: StratifiedKFold,
    scoring: Scoring,
    refit: bool,

    results: Option<CvResults>,
    best_index: Option<usize>,
    best_estimator: Option<Box<dyn Classifier>>,
}


impl GridSearchCV {
    /// Construct a new instance of `GridSearchCV`.
    /// By default, 5 unshuffled folds, accuracy, and refitting.
    pub fn new<C>(estimator: C, grid: ParamGrid) -> Self
        where C: Classifier + 'static
    {
        Self::from_boxed(Box::new(estimator), grid)
    }


    /// Construct a new instance of `GridSearchCV`
    /// from a boxed estimator.
    pub fn from_boxed(estimator: Box<dyn Classifier>, grid: ParamGrid) -> Self {
        Self {
            estimator,
            grid,
            cv: StratifiedKFold::new(5),
            scoring: Scoring::Accuracy,
            refit: true,
            results: None,
            best_index: None,
            best_estimator: None,
        }
    }


    /// Set the cross validation splitter.
    pub fn cv(mut self, cv: StratifiedKFold) -> Self {
        self.cv = cv;
        self
    }


    /// Set the score to maximize.
    pub fn scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }


    /// If `true`, the best candidate is trained on the whole sample
    /// after the search. Default is `true`.
    pub fn refit(mut self, flag: bool) -> Self {
        self.refit = flag;
        self
    }


    /// Evaluates every candidate of the grid.
    pub fn fit(&mut self, sample: &Sample, target: &[usize])
        -> Result<&CvResults>
    {
        if let Some((key, _)) = self.grid.iter().find(|(_, vs)| vs.is_empty()) {
            return Err(VoteError::Configuration(format!(
                "the grid has no value for `{key}`"
            )));
        }
        sample.check_target_len(target.len())?;

        let candidates = parameter_grid(&self.grid);
        let folds = self.cv.split(target)?;

        let estimator = &self.estimator;
        let scoring = self.scoring;
        let split_test_scores = candidates.par_iter()
            .map(|params| {
                let mut clf = estimator.boxed_clone();
                clf.set_params(params)?;
                let scores = score_folds(
                    clf.as_ref(), sample, target, &folds, scoring
                )?;
                let (mean, std) = utils::mean_and_std(&scores);
                info!("{mean:.3} (+/- {std:.3}) for {params:?}");
                Ok(scores)
            })
            .collect::<Result<Vec<_>>>()?;

        let (mean_test_score, std_test_score) = split_test_scores.iter()
            .map(|scores| utils::mean_and_std(scores))
            .unzip::<_, _, Vec<_>, Vec<_>>();

        let rank_test_score = mean_test_score.iter()
            .map(|m| 1 + mean_test_score.iter().filter(|&o| o > m).count())
            .collect::<Vec<_>>();
        let best_index = utils::argmax(&mean_test_score);

        self.best_estimator = None;
        if self.refit {
            let mut best = self.estimator.boxed_clone();
            best.set_params(&candidates[best_index])?;
            best.fit(sample, target)?;
            self.best_estimator = Some(best);
        }

        self.best_index = Some(best_index);
        let results = self.results.insert(CvResults {
            params: candidates,
            mean_test_score,
            std_test_score,
            split_test_scores,
            rank_test_score,
        });
        Ok(results)
    }


    /// Returns the results of the last search.
    pub fn results(&self) -> Result<&CvResults> {
        self.results.as_ref()
            .ok_or_else(|| VoteError::not_fitted("GridSearchCV"))
    }


    /// Returns the position of the best candidate.
    pub fn best_index(&self) -> Result<usize> {
        self.best_index
            .ok_or_else(|| VoteError::not_fitted("GridSearchCV"))
    }


    /// Returns the parameters of the best candidate.
    pub fn best_params(&self) -> Result<&Params> {
        let i = self.best_index()?;
        Ok(&self.results()?.params[i])
    }


    /// Returns the mean score of the best candidate.
    pub fn best_score(&self) -> Result<f64> {
        let i = self.best_index()?;
        Ok(self.results()?.mean_test_score[i])
    }


    /// Returns the best candidate trained on the whole sample.
    /// Fails if the search has not run or `refit` is disabled.
    pub fn best_estimator(&self) -> Result<&dyn Classifier> {
        self.best_estimator.as_deref()
            .ok_or_else(|| VoteError::not_fitted("GridSearchCV (refit)"))
    }
}
