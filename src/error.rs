//! Defines the error type shared by every estimator in this crate.
use polars::prelude::PolarsError;


/// Errors produced by estimators, data readers, and evaluation tools.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// Returned when an estimator receives invalid constructor arguments.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Returned when a prediction is requested before `fit`.
    #[error("{estimator} is not fitted yet, call `fit` first")]
    NotFitted {
        /// Name of the estimator.
        estimator: String,
    },

    /// Returned when an estimator cannot perform the requested operation.
    #[error("{estimator} does not support `{operation}`")]
    UnsupportedOperation {
        /// Name of the estimator.
        estimator: String,
        /// Name of the operation.
        operation: &'static str,
    },

    /// Returned when a base classifier of an ensemble fails to fit.
    #[error("base classifier #{position} ({name}) failed to fit")]
    BaseClassifier {
        /// Position of the classifier in the ensemble.
        position: usize,
        /// Generated name of the classifier.
        name: String,
        /// The failure reported by the base classifier.
        #[source]
        source: Box<VoteError>,
    },

    /// Returned when a parameter key does not exist.
    #[error("{estimator} has no parameter `{key}`")]
    InvalidParameter {
        /// Name of the estimator.
        estimator: String,
        /// The unknown key.
        key: String,
    },

    /// Returned when a parameter value has the wrong type or range.
    #[error("parameter `{key}` expects {expected}, got {got}")]
    ParameterType {
        /// The parameter key.
        key: String,
        /// Description of the accepted values.
        expected: &'static str,
        /// The rejected value.
        got: String,
    },

    /// Returned when two inputs do not agree on a dimension.
    #[error("{what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// What was compared.
        what: &'static str,
        /// The expected size.
        expected: usize,
        /// The actual size.
        got: usize,
    },

    /// Returned when a label (or label code) is outside the fitted domain.
    #[error("unknown label {0}")]
    UnknownLabel(String),

    /// Returned when a metric cannot be computed for the given input.
    #[error("metric is undefined: {0}")]
    UndefinedMetric(String),

    /// Returned when a data file cannot be parsed.
    #[error("failed to parse line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Human-readable description.
        reason: String,
    },

    /// Returned when drawing a plot fails.
    #[error("failed to draw plot: {0}")]
    Plot(String),

    /// I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure reported by `polars`.
    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// Failure reported by `serde_json`.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}


/// Result alias used across this crate.
pub type Result<T> = std::result::Result<T, VoteError>;


impl VoteError {
    pub(crate) fn not_fitted<S: ToString>(estimator: S) -> Self {
        Self::NotFitted { estimator: estimator.to_string() }
    }


    pub(crate) fn invalid_parameter<S, K>(estimator: S, key: K) -> Self
        where S: ToString,
              K: ToString,
    {
        Self::InvalidParameter {
            estimator: estimator.to_string(),
            key: key.to_string(),
        }
    }
}
