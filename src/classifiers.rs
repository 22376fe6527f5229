//! The base classifiers that an ensemble can combine.

/// Defines the decision tree classifier.
pub mod decision_tree;
/// Defines the k-nearest-neighbors classifier.
pub mod knn;
/// Defines the logistic regression classifier.
pub mod logistic_regression;
/// Defines the pipeline of transformers and a final classifier.
pub mod pipeline;


pub use decision_tree::{Criterion, DecisionTreeClassifier};
pub use knn::{KNeighborsClassifier, Metric, NeighborWeights};
pub use logistic_regression::{LogisticRegression, Penalty};
pub use pipeline::{Pipeline, PipelineBuilder};
