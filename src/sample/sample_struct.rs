use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::collections::HashMap;
use std::ops::Index;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::error::{Result, VoteError};
use super::feature_struct::*;


/// Struct `Sample` holds a batch of examples in a dense,
/// column-oriented format.
/// The target labels are kept outside of `Sample`,
/// so that estimators can be trained on any label domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    name_to_index: HashMap<String, usize>,
    features: Vec<Feature>,
    n_sample: usize,
    n_feature: usize,
}


impl Sample {
    /// Construct a new `Sample` from the given columns.
    /// All columns must have the same length.
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        let n_sample = features.first()
            .map(|feat| feat.len())
            .unwrap_or(0);

        if let Some(feat) = features.iter().find(|f| f.len() != n_sample) {
            return Err(VoteError::ShapeMismatch {
                what: "number of values in a feature column",
                expected: n_sample,
                got: feat.len(),
            });
        }

        let n_feature = features.len();
        let name_to_index = index_by_name(&features);
        let sample = Self {
            name_to_index, features, n_sample, n_feature,
        };
        Ok(sample)
    }


    /// Construct a new `Sample` from row vectors.
    /// The features are named `Feat. [1]`, `Feat. [2]`, ...
    pub fn from_rows<T: AsRef<[f64]>>(rows: &[T]) -> Result<Self> {
        let n_feature = rows.first()
            .map(|row| row.as_ref().len())
            .unwrap_or(0);

        let mut features = (1..=n_feature).map(|i| {
                let name = format!("Feat. [{i}]");
                Feature::new(name)
            })
            .collect::<Vec<_>>();

        for row in rows {
            let row = row.as_ref();
            if row.len() != n_feature {
                return Err(VoteError::ShapeMismatch {
                    what: "number of values in a row",
                    expected: n_feature,
                    got: row.len(),
                });
            }
            features.iter_mut()
                .zip(row)
                .for_each(|(feat, &x)| feat.append(x));
        }

        let mut sample = Self::new(features)?;
        sample.n_sample = rows.len();
        Ok(sample)
    }


    /// Convert `polars::DataFrame` into `Sample`.
    /// Every column is cast to `f64`; null values are rejected.
    /// This method takes the ownership for the given `data`.
    pub fn from_dataframe(data: DataFrame) -> Result<Self> {
        let features = data.get_columns()
            .par_iter()
            .map(|series| {
                let name = series.name().to_string();
                let series = series.cast(&DataType::Float64)?;
                let values = series.f64()?
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| VoteError::Configuration(
                        format!("column `{name}` contains null values")
                    ))?;
                Ok(Feature::from_values(name, values))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(features)
    }


    /// Read a CSV format file to `Sample` type.
    /// Every column is treated as a feature.
    pub fn from_csv<P>(file: P, has_header: bool) -> Result<Self>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        let (sample, _) = read_csv(BufReader::new(file), has_header, None)?;
        Ok(sample)
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Returns the feature named `name`, if any.
    pub fn feature<S: AsRef<str>>(&self, name: S) -> Option<&Feature> {
        self.name_to_index.get(name.as_ref())
            .map(|&k| &self.features[k])
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Returns the value at `(row, col)`.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.features[col][row]
    }


    /// Returns the `idx`-th instance as a row vector.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>()
    }


    /// Returns all instances as row vectors.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_sample).map(|i| self.row(i))
            .collect()
    }


    /// Returns a new `Sample` that keeps the rows in `indices`,
    /// in the given order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        let features = self.features.iter()
            .map(|feat| feat.gather(indices))
            .collect::<Vec<_>>();
        Self {
            name_to_index: self.name_to_index.clone(),
            features,
            n_sample: indices.len(),
            n_feature: self.n_feature,
        }
    }


    /// Returns a new `Sample` that keeps the columns in `columns`,
    /// in the given order.
    pub fn select(&self, columns: &[usize]) -> Result<Self> {
        let features = columns.iter()
            .map(|&c| {
                self.features.get(c)
                    .cloned()
                    .ok_or(VoteError::ShapeMismatch {
                        what: "column index out of range",
                        expected: self.n_feature,
                        got: c,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut sample = Self::new(features)?;
        sample.n_sample = self.n_sample;
        Ok(sample)
    }


    /// Set the feature (column) names and returns the old ones.
    pub fn replace_names<S, T>(&mut self, names: T) -> Result<Vec<String>>
        where S: ToString,
              T: AsRef<[S]>,
    {
        let names = names.as_ref();

        let n_names = names.len();
        if self.n_feature != n_names {
            return Err(VoteError::ShapeMismatch {
                what: "number of feature names",
                expected: self.n_feature,
                got: n_names,
            });
        }

        let old_names = names.iter()
            .zip(&mut self.features[..])
            .map(|(name, feature)| feature.replace_name(name.to_string()))
            .collect();

        self.name_to_index = index_by_name(&self.features);
        Ok(old_names)
    }


    /// Check that `n` target values can be paired with this sample.
    pub(crate) fn check_target_len(&self, n: usize) -> Result<()> {
        if self.n_sample != n {
            return Err(VoteError::ShapeMismatch {
                what: "number of target values",
                expected: self.n_sample,
                got: n,
            });
        }
        Ok(())
    }
}


fn index_by_name(features: &[Feature]) -> HashMap<String, usize> {
    features.iter()
        .enumerate()
        .map(|(i, f)| (f.name().to_string(), i))
        .collect::<HashMap<_, _>>()
}


/// Reads CSV lines into a `Sample`.
/// If `target` is given, the column of that name is split off
/// and returned as raw strings.
pub(crate) fn read_csv<R: BufRead>(
    reader: R,
    has_header: bool,
    target: Option<&str>,
) -> Result<(Sample, Option<Vec<String>>)>
{
    let mut lines = reader.lines().enumerate();

    let mut names: Option<Vec<String>> = None;
    if has_header {
        if let Some((_, line)) = lines.next() {
            let header = line?.split(',')
                .map(|name| name.trim().to_string())
                .collect::<Vec<_>>();
            names = Some(header);
        }
    }

    let target_pos = match (target, &names) {
        (Some(column), Some(names)) => {
            let pos = names.iter()
                .position(|name| name == column)
                .ok_or_else(|| VoteError::Configuration(
                    format!("the target column `{column}` does not exist")
                ))?;
            Some(pos)
        },
        (Some(_), None) => {
            return Err(VoteError::Configuration(
                "a target column requires a header row".to_string()
            ));
        },
        (None, _) => None,
    };

    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut labels = Vec::new();
    let mut width = names.as_ref().map(|names| names.len());

    for (i, line) in lines {
        let line = line?;
        let lineno = i + 1;
        if line.trim().is_empty() { continue; }

        let words = line.split(',')
            .map(str::trim)
            .collect::<Vec<_>>();

        let n_words = *width.get_or_insert(words.len());
        if words.len() != n_words {
            return Err(VoteError::Parse {
                line: lineno,
                reason: format!(
                    "expected {n_words} fields, got {}", words.len()
                ),
            });
        }
        if columns.is_empty() {
            let n_feature = n_words - usize::from(target_pos.is_some());
            columns = vec![Vec::new(); n_feature];
        }

        let mut col = 0;
        for (j, word) in words.into_iter().enumerate() {
            if Some(j) == target_pos {
                labels.push(word.to_string());
                continue;
            }
            let x = word.parse::<f64>()
                .map_err(|e| VoteError::Parse {
                    line: lineno,
                    reason: format!("`{word}` is not a number ({e})"),
                })?;
            columns[col].push(x);
            col += 1;
        }
    }

    let names = match names {
        Some(names) => names.into_iter()
            .enumerate()
            .filter(|(j, _)| Some(*j) != target_pos)
            .map(|(_, name)| name)
            .collect::<Vec<_>>(),
        None => (1..=columns.len()).map(|k| format!("Feat. [{k}]"))
            .collect(),
    };

    let features = names.into_iter()
        .zip(columns)
        .map(|(name, values)| Feature::from_values(name, values))
        .collect::<Vec<_>>();

    let sample = Sample::new(features)?;
    let labels = target_pos.map(|_| labels);
    Ok((sample, labels))
}


impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;


    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = self.name_to_index[name];
        &self.features[k]
    }
}
