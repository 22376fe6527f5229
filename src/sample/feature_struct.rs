use serde::{Serialize, Deserialize};

use std::ops::Index;
use std::slice::Iter;

const BUF_SIZE: usize = 256;


/// Dense representation of a feature (a column of the feature matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name
    pub name: String,
    /// Feature values.
    pub values: Vec<f64>,
}


impl Feature {
    /// Construct an empty feature with `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::with_capacity(BUF_SIZE),
        }
    }


    /// Construct a feature from its values.
    pub fn from_values<T: ToString>(name: T, values: Vec<f64>) -> Self {
        Self { name: name.to_string(), values, }
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    pub(super) fn replace_name<S>(&mut self, name: S) -> String
        where S: ToString,
    {
        let name = name.to_string();
        std::mem::replace(&mut self.name, name)
    }


    /// Returns an iterator over feature values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }


    /// Append an example to this feature.
    pub fn append(&mut self, x: f64) {
        self.values.push(x);
    }


    /// Returns the number of items in `self.values`.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if `self.len()` is equals to `0`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    /// Returns the minimum and maximum value of this feature.
    /// Returns `None` for an empty feature.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() { return None; }
        let init = (f64::INFINITY, f64::NEG_INFINITY);
        let range = self.values.iter()
            .fold(init, |(lo, hi), &x| (lo.min(x), hi.max(x)));
        Some(range)
    }


    /// Mean and population variance of the feature.
    pub(crate) fn mean_and_variance(&self) -> (f64, f64) {
        let n = self.values.len() as f64;
        if n == 0.0 { return (0.0, 0.0); }
        let mean = self.values.iter().sum::<f64>() / n;
        let var = self.values.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, var)
    }


    /// Returns a new feature that keeps the rows in `indices`.
    pub(crate) fn gather(&self, indices: &[usize]) -> Self {
        let values = indices.iter()
            .map(|&i| self.values[i])
            .collect();
        Self { name: self.name.clone(), values, }
    }
}


impl Index<usize> for Feature {
    type Output = f64;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}
