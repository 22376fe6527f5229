use serde::{Serialize, Deserialize};

use crate::{Sample, Feature, Transformer};
use crate::common::checker;
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};


/// Standardizes each feature to zero mean and unit variance.
///
/// The variance is the population variance of the training sample.
/// A feature with zero variance is only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
    state: Option<ScalerState>,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerState {
    means: Vec<f64>,
    scales: Vec<f64>,
}


impl StandardScaler {
    /// Construct a new instance of `StandardScaler`
    /// that centers and scales.
    pub fn new() -> Self {
        Self { with_mean: true, with_std: true, state: None, }
    }


    /// Set whether to subtract the mean. Default is `true`.
    pub fn with_mean(mut self, flag: bool) -> Self {
        self.with_mean = flag;
        self
    }


    /// Set whether to divide by the standard deviation.
    /// Default is `true`.
    pub fn with_std(mut self, flag: bool) -> Self {
        self.with_std = flag;
        self
    }


    /// Returns the learned means, if fitted.
    pub fn means(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| &s.means[..])
    }


    /// Returns the learned scales, if fitted.
    pub fn scales(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| &s.scales[..])
    }
}


impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}


impl Transformer for StandardScaler {
    fn name(&self) -> &str {
        "StandardScaler"
    }


    fn fit(&mut self, sample: &Sample) -> Result<()> {
        let (means, scales) = sample.features()
            .iter()
            .map(|feat| {
                let (mean, var) = feat.mean_and_variance();
                let std = var.sqrt();
                let scale = if std > 0.0 { std } else { 1.0 };
                (mean, scale)
            })
            .unzip();
        self.state = Some(ScalerState { means, scales });
        Ok(())
    }


    fn transform(&self, sample: &Sample) -> Result<Sample> {
        let state = self.state.as_ref()
            .ok_or_else(|| VoteError::not_fitted(self.name()))?;
        checker::check_n_feature(sample, state.means.len())?;

        let features = sample.features()
            .iter()
            .zip(state.means.iter().zip(&state.scales))
            .map(|(feat, (&mean, &scale))| {
                let mean = if self.with_mean { mean } else { 0.0 };
                let scale = if self.with_std { scale } else { 1.0 };
                let values = feat.iter()
                    .map(|x| (x - mean) / scale)
                    .collect();
                Feature::from_values(feat.name(), values)
            })
            .collect::<Vec<_>>();
        Sample::new(features)
    }


    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("with_mean".into(), self.with_mean.into());
        params.insert("with_std".into(), self.with_std.into());
        params
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        match key {
            "with_mean" => { self.with_mean = value.as_bool(key)?; },
            "with_std" => { self.with_std = value.as_bool(key)?; },
            _ => { return Err(VoteError::invalid_parameter(self.name(), key)); },
        }
        Ok(())
    }


    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}
