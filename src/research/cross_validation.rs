use rand::prelude::*;
use colored::Colorize;
use log::warn;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;
use std::collections::BTreeMap;

use crate::{Classifier, Sample};
use crate::error::{Result, VoteError};
use super::metrics::{accuracy_score, roc_auc_score};

const WIDTH: usize = 9;


/// A pair of row indices `(train, test)` for one fold.
pub type Fold = (Vec<usize>, Vec<usize>);


/// A struct that generates stratified
/// pairs of training/test indices for cross validation.
///
/// Each class is dealt to the folds in a round-robin manner,
/// so every fold keeps (almost) the class proportions
/// of the whole target and every row is in exactly one test fold.
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let (sample, species) = load_iris().unwrap();
/// let (_, y) = LabelEncoder::fit_transform(&species).unwrap();
///
/// let cv = StratifiedKFold::new(10)
///     .shuffle(1)
///     .verbose(true);
/// let tree = DecisionTreeClassifier::new().max_depth(Some(2));
/// let scores = cross_val_score(&tree, &sample, &y, &cv, Scoring::Accuracy)
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_folds: usize,
    seed: Option<u64>,
    verbose: bool,
}


impl StratifiedKFold {
    /// Construct a new instance of `StratifiedKFold`
    /// with `n_folds` folds and no shuffling.
    #[inline]
    pub fn new(n_folds: usize) -> Self {
        Self { n_folds, seed: None, verbose: false, }
    }


    /// Shuffle the rows of each class with the given seed
    /// before dealing them to the folds.
    /// By default, `StratifiedKFold` does not shuffle.
    #[inline]
    pub fn shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `StratifiedKFold` prints the size of each fold.
    /// Default value is `false`.
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Returns the number of folds.
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }


    /// Returns the train/test indices of every fold.
    /// Both parts are sorted in ascending order.
    pub fn split<T: Ord>(&self, target: &[T]) -> Result<Vec<Fold>> {
        let n_sample = target.len();
        if self.n_folds < 2 {
            return Err(VoteError::Configuration(format!(
                "cross validation needs at least 2 folds, got {}",
                self.n_folds
            )));
        }
        if self.n_folds > n_sample {
            return Err(VoteError::Configuration(format!(
                "cannot make {} folds from {n_sample} examples",
                self.n_folds
            )));
        }

        let mut classes: BTreeMap<&T, Vec<usize>> = BTreeMap::new();
        for (i, y) in target.iter().enumerate() {
            classes.entry(y).or_default().push(i);
        }

        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let mut tests = vec![Vec::new(); self.n_folds];
        let mut next = 0_usize;
        for (k, mut rows) in classes.into_values().enumerate() {
            if rows.len() < self.n_folds {
                warn!(
                    "class #{k} has only {} members, fewer than {} folds",
                    rows.len(), self.n_folds
                );
            }
            if let Some(rng) = rng.as_mut() {
                rows.shuffle(rng);
            }
            for i in rows {
                tests[next % self.n_folds].push(i);
                next += 1;
            }
        }

        let folds = tests.into_iter()
            .enumerate()
            .map(|(f, mut test)| {
                test.sort_unstable();
                let mut in_test = vec![false; n_sample];
                test.iter().for_each(|&i| { in_test[i] = true; });
                let train = (0..n_sample)
                    .filter(|&i| !in_test[i])
                    .collect::<Vec<_>>();

                if self.verbose {
                    println!(
                        "{}    {}    {}",
                        format!("  [{: >3}'th fold]", f + 1).bold().red(),
                        format!("[TRAIN {:>WIDTH$}]", train.len()).bold().green(),
                        format!("[TEST {:>WIDTH$}]", test.len()).bold().yellow(),
                    );
                }
                (train, test)
            })
            .collect();
        Ok(folds)
    }
}


/// The score computed on each test fold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scoring {
    /// Area under the ROC curve of a binary problem.
    /// Uses the probability of the class `1` when the classifier
    /// supports `predict_proba`, and the hard predictions otherwise.
    RocAuc,
    /// Fraction of correct predictions.
    #[default]
    Accuracy,
}


impl Scoring {
    /// Scores the fitted classifier `clf` on `sample` and `target`.
    pub fn score(&self, clf: &dyn Classifier, sample: &Sample, target: &[usize])
        -> Result<f64>
    {
        match self {
            Self::RocAuc => {
                let scores = if clf.supports_proba() {
                    clf.predict_proba(sample)?
                        .into_iter()
                        .map(|row| row.get(1).copied().unwrap_or(0.0))
                        .collect::<Vec<_>>()
                } else {
                    clf.predict(sample)?
                        .into_iter()
                        .map(|y| y as f64)
                        .collect::<Vec<_>>()
                };
                roc_auc_score(target, &scores)
            },
            Self::Accuracy => {
                let predictions = clf.predict(sample)?;
                accuracy_score(target, &predictions)
            },
        }
    }
}


impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RocAuc => "roc_auc",
            Self::Accuracy => "accuracy",
        };
        write!(f, "{name}")
    }
}


impl FromStr for Scoring {
    type Err = VoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "roc_auc" => Ok(Self::RocAuc),
            "accuracy" => Ok(Self::Accuracy),
            _ => Err(VoteError::ParameterType {
                key: "scoring".to_string(),
                expected: "`roc_auc` or `accuracy`",
                got: s.to_string(),
            }),
        }
    }
}


/// Evaluates `clf` by cross validation.
///
/// For each fold, a fresh copy of `clf` is trained on the train part
/// and scored on the test part.
/// `clf` itself is not modified.
/// Returns one score per fold.
pub fn cross_val_score(
    clf: &dyn Classifier,
    sample: &Sample,
    target: &[usize],
    cv: &StratifiedKFold,
    scoring: Scoring,
) -> Result<Vec<f64>>
{
    sample.check_target_len(target.len())?;
    let folds = cv.split(target)?;
    score_folds(clf, sample, target, &folds, scoring)
}


/// Scores a fresh copy of `clf` on each of the given folds.
pub(crate) fn score_folds(
    clf: &dyn Classifier,
    sample: &Sample,
    target: &[usize],
    folds: &[Fold],
    scoring: Scoring,
) -> Result<Vec<f64>>
{
    let pick = |ix: &[usize]| -> Vec<usize> {
        ix.iter().map(|&i| target[i]).collect()
    };

    folds.iter()
        .map(|(train_ix, test_ix)| {
            let train = sample.subset(train_ix);
            let test = sample.subset(test_ix);

            let mut model = clf.boxed_clone();
            model.fit(&train, &pick(train_ix))?;
            scoring.score(model.as_ref(), &test, &pick(test_ix))
        })
        .collect()
}
