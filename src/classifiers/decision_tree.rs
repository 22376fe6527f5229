/// Defines the decision tree classifier.
pub mod dtree;

/// Defines the inner representations of `DecisionTreeClassifier`.
mod node;
mod criterion;


pub use dtree::DecisionTreeClassifier;
pub use criterion::Criterion;
