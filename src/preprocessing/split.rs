use rand::prelude::*;

use std::collections::BTreeMap;

use crate::Sample;
use crate::error::{Result, VoteError};


/// A struct that splits a labeled sample into train/test parts.
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let (sample, labels) = load_iris().unwrap();
/// let (train, test, y_train, y_test) = TrainTestSplit::new(&sample, &labels)
///     .test_size(0.5)
///     .seed(1)
///     .stratify(true)
///     .split()
///     .unwrap();
/// ```
pub struct TrainTestSplit<'a, T> {
    sample: &'a Sample,
    target: &'a [T],
    test_size: f64,
    seed: u64,
    stratify: bool,
}


impl<'a, T> TrainTestSplit<'a, T>
    where T: Clone + Ord,
{
    /// Construct a new instance of `TrainTestSplit`.
    /// By default, 25% of the examples go to the test part,
    /// the seed is `1234`, and the split is not stratified.
    pub fn new(sample: &'a Sample, target: &'a [T]) -> Self {
        Self {
            sample,
            target,
            test_size: 0.25,
            seed: 1234,
            stratify: false,
        }
    }


    /// Set the fraction of the test part, in `(0, 1)`.
    pub fn test_size(mut self, ratio: f64) -> Self {
        self.test_size = ratio;
        self
    }


    /// Set the seed of the randomness for shuffling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// If `true`, each class is split separately
    /// so that both parts keep the class proportions.
    pub fn stratify(mut self, flag: bool) -> Self {
        self.stratify = flag;
        self
    }


    /// Returns the row indices of the train and the test part.
    pub fn indices(&self) -> Result<(Vec<usize>, Vec<usize>)> {
        if !(0.0 < self.test_size && self.test_size < 1.0) {
            return Err(VoteError::Configuration(format!(
                "test_size should be in (0, 1), got {}", self.test_size
            )));
        }
        self.sample.check_target_len(self.target.len())?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let n_sample = self.target.len();

        let groups = if self.stratify {
            let mut groups: BTreeMap<&T, Vec<usize>> = BTreeMap::new();
            for (i, y) in self.target.iter().enumerate() {
                groups.entry(y).or_default().push(i);
            }
            groups.into_values().collect::<Vec<_>>()
        } else {
            vec![(0..n_sample).collect::<Vec<_>>()]
        };

        let mut train = Vec::with_capacity(n_sample);
        let mut test = Vec::with_capacity(n_sample);
        for mut group in groups {
            group.shuffle(&mut rng);
            let n_test = if self.stratify {
                (self.test_size * group.len() as f64).round() as usize
            } else {
                (self.test_size * group.len() as f64).ceil() as usize
            };
            let n_test = n_test.min(group.len());
            test.extend_from_slice(&group[..n_test]);
            train.extend_from_slice(&group[n_test..]);
        }

        if train.is_empty() || test.is_empty() {
            return Err(VoteError::Configuration(format!(
                "test_size = {} leaves an empty part for {n_sample} examples",
                self.test_size
            )));
        }

        train.sort_unstable();
        test.sort_unstable();
        Ok((train, test))
    }


    /// Splits the sample and the target.
    /// Returns `(train, test, train_target, test_target)`.
    pub fn split(&self) -> Result<(Sample, Sample, Vec<T>, Vec<T>)> {
        let (train_ix, test_ix) = self.indices()?;

        let pick = |ix: &[usize]| -> Vec<T> {
            ix.iter().map(|&i| self.target[i].clone()).collect()
        };

        let train = self.sample.subset(&train_ix);
        let test = self.sample.subset(&test_ix);
        Ok((train, test, pick(&train_ix), pick(&test_ix)))
    }
}
