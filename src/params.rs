//! Defines the string-keyed parameter contract of estimators.
//!
//! Every estimator reports its hyperparameters as a [`Params`] map
//! and accepts updates through `set_param`.
//! Composite estimators (pipelines, ensembles) expose the parameters
//! of their children under `{child-name}__{param-name}` keys,
//! so that a grid search can address nested parameters.
use serde::Serialize;

use std::fmt;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, VoteError};


/// Separator between a child name and its parameter name.
pub const NESTED_SEPARATOR: &str = "__";


/// Parameters of an estimator, ordered by key.
pub type Params = BTreeMap<String, ParamValue>;


/// A value of a hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string (e.g., a criterion name).
    Str(String),
    /// A list of values.
    List(Vec<ParamValue>),
    /// A nested estimator, rendered as `Name(key=value, ...)`.
    Estimator(String),
    /// The absence of a value (e.g., unlimited depth).
    Null,
}


impl ParamValue {
    /// Reads this value as `f64`. Integers are widened.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            Self::Float(x) => Ok(*x),
            Self::Int(i) => Ok(*i as f64),
            _ => Err(self.type_error(key, "a number")),
        }
    }


    /// Reads this value as a non-negative integer.
    pub fn as_usize(&self, key: &str) -> Result<usize> {
        match self {
            Self::Int(i) if *i >= 0 => Ok(*i as usize),
            _ => Err(self.type_error(key, "a non-negative integer")),
        }
    }


    /// Reads this value as an optional non-negative integer,
    /// where `Null` stands for `None`.
    pub fn as_optional_usize(&self, key: &str) -> Result<Option<usize>> {
        match self {
            Self::Null => Ok(None),
            _ => self.as_usize(key).map(Some),
        }
    }


    /// Reads this value as a string slice.
    pub fn as_str(&self, key: &str) -> Result<&str> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(self.type_error(key, "a string")),
        }
    }


    /// Reads this value as a boolean.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(self.type_error(key, "a boolean")),
        }
    }


    /// Reads this value as a list of `f64`.
    pub fn as_f64_list(&self, key: &str) -> Result<Vec<f64>> {
        match self {
            Self::List(items) => items.iter()
                .map(|item| item.as_f64(key))
                .collect(),
            _ => Err(self.type_error(key, "a list of numbers")),
        }
    }


    pub(crate) fn type_error(&self, key: &str, expected: &'static str)
        -> VoteError
    {
        VoteError::ParameterType {
            key: key.to_string(),
            expected,
            got: self.to_string(),
        }
    }
}


impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::List(items) => {
                let line = items.iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{line}]")
            },
            Self::Estimator(repr) => write!(f, "{repr}"),
            Self::Null => write!(f, "None"),
        }
    }
}


impl From<bool> for ParamValue {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self { Self::Int(i) }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self { Self::Int(i as i64) }
}

impl From<usize> for ParamValue {
    fn from(i: usize) -> Self { Self::Int(i as i64) }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self { Self::Float(x) }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self { Self::Str(s.to_string()) }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}


/// Renders an estimator as `Name(key=value, ...)`
/// from its shallow parameters.
pub fn describe(name: &str, params: &Params) -> String {
    let args = params.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{name}({args})")
}


/// Generates a name for each estimator from its type name.
///
/// Names are lowercased type names.
/// A name that occurs more than once is suffixed with
/// `-1`, `-2`, ... in list order, so the result has no duplicates.
/// ```
/// use minivotes::params::name_estimators;
///
/// let names = name_estimators(&["Pipeline", "DecisionTreeClassifier", "Pipeline"]);
/// assert_eq!(names, ["pipeline-1", "decisiontreeclassifier", "pipeline-2"]);
/// ```
pub fn name_estimators<S: AsRef<str>>(type_names: &[S]) -> Vec<String> {
    let names = type_names.iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect::<Vec<_>>();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.iter() {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    names.iter()
        .map(|name| {
            if counts[name.as_str()] == 1 { return name.clone(); }
            let k = seen.entry(name.as_str()).or_insert(0);
            *k += 1;
            format!("{name}-{k}")
        })
        .collect()
}


/// Splits `child__rest` into `("child", "rest")`.
/// Returns `None` if `key` is not nested.
pub fn split_nested(key: &str) -> Option<(&str, &str)> {
    key.split_once(NESTED_SEPARATOR)
}


/// Inserts `params` into `out` with every key prefixed by `prefix__`.
pub(crate) fn extend_prefixed(out: &mut Params, prefix: &str, params: Params) {
    for (key, value) in params {
        out.insert(format!("{prefix}{NESTED_SEPARATOR}{key}"), value);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_are_not_suffixed() {
        let names = name_estimators(&["LogisticRegression", "KNeighborsClassifier"]);
        assert_eq!(names, ["logisticregression", "kneighborsclassifier"]);
    }


    #[test]
    fn duplicated_names_get_incrementing_suffix() {
        let names = name_estimators(&["Pipeline", "Pipeline", "Pipeline"]);
        assert_eq!(names, ["pipeline-1", "pipeline-2", "pipeline-3"]);
    }


    #[test]
    fn nested_keys_split_at_the_first_separator() {
        assert_eq!(split_nested("pipeline-1__clf__C"), Some(("pipeline-1", "clf__C")));
        assert_eq!(split_nested("vote"), None);
    }


    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(ParamValue::Int(3).as_f64("C").unwrap(), 3.0);
        assert!(ParamValue::Str("x".into()).as_f64("C").is_err());
        assert!(ParamValue::Int(-1).as_usize("max_depth").is_err());
    }
}
