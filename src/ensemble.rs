//! Ensembles that combine the outputs of several base classifiers.

/// Defines the voting rule.
pub mod vote;
/// Defines the majority-vote classifier.
pub mod majority_vote;


pub use vote::Vote;
pub use majority_vote::{MajorityVoteClassifier, MajorityVoteBuilder};
