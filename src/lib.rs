#![warn(missing_docs)]

//!
//! A crate that provides majority-vote ensembles of small classifiers.
//!
//! A [`MajorityVoteClassifier`](ensemble::MajorityVoteClassifier)
//! trains a copy of each base classifier and combines their outputs
//! in one of two ways.
//!
//! - Label voting
//!     Each base classifier votes for the label it predicts,
//!     with its weight.
//!     The label with the largest total weight wins.
//!
//!
//! - Probability voting
//!     The class probabilities of the base classifiers are averaged
//!     with their weights.
//!     The most probable class wins.
//!
//! This crate also provides the base classifiers
//! (logistic regression, decision trees, k-nearest neighbors, pipelines),
//! and the tools to evaluate them
//! (stratified cross validation, ROC AUC, grid search, plots).
//!
//! ```no_run
//! use minivotes::prelude::*;
//!
//! let (sample, species) = load_iris().unwrap();
//! let (_, y) = LabelEncoder::fit_transform(&species).unwrap();
//!
//! let pipe = Pipeline::builder()
//!     .transformer("sc", StandardScaler::new())
//!     .classifier("clf", LogisticRegression::new())
//!     .build()
//!     .unwrap();
//! let mut ensemble: MajorityVoteClassifier = MajorityVoteBuilder::new()
//!     .classifier(pipe)
//!     .classifier(DecisionTreeClassifier::new().max_depth(Some(2)))
//!     .classifier(KNeighborsClassifier::new())
//!     .build()
//!     .unwrap();
//!
//! let cv = StratifiedKFold::new(5).shuffle(1);
//! let scores = cross_val_score(&ensemble, &sample, &y, &cv, Scoring::Accuracy)
//!     .unwrap();
//!
//! ensemble.fit(&sample, &y).unwrap();
//! let predictions = ensemble.predict(&sample).unwrap();
//! ```

pub mod error;
pub mod params;
pub mod classifier;
pub mod common;
pub mod sample;
pub mod datasets;
pub mod preprocessing;
pub mod classifiers;
pub mod ensemble;
pub mod research;
pub mod prelude;


pub use error::{VoteError, Result};
pub use sample::{Sample, Feature, SampleReader};
pub use classifier::{Classifier, Transformer};
pub use ensemble::{MajorityVoteClassifier, Vote};
