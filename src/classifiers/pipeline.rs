//! Defines a chain of preprocessing steps followed by a classifier.
use crate::{Classifier, Transformer, Sample};
use crate::error::{Result, VoteError};
use crate::params::{self, Params, ParamValue};


/// A sequence of named [`Transformer`]s followed by a named [`Classifier`].
///
/// `fit` fits every transformer on the output of the previous one,
/// then fits the classifier on the transformed sample.
/// `predict` and `predict_proba` apply the fitted transformers
/// before delegating to the classifier.
///
/// # Example
/// ```no_run
/// use minivotes::prelude::*;
///
/// let pipe = Pipeline::builder()
///     .transformer("sc", StandardScaler::new())
///     .classifier("clf", LogisticRegression::new().c(0.001))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    transformers: Vec<(String, Box<dyn Transformer>)>,
    classifier: (String, Box<dyn Classifier>),
    fitted: bool,
}


/// A builder of [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    transformers: Vec<(String, Box<dyn Transformer>)>,
    classifier: Option<(String, Box<dyn Classifier>)>,
}


impl PipelineBuilder {
    /// Append a preprocessing step.
    pub fn transformer<S, T>(mut self, name: S, step: T) -> Self
        where S: ToString,
              T: Transformer + 'static,
    {
        self.transformers.push((name.to_string(), Box::new(step)));
        self
    }


    /// Set the final classifier.
    pub fn classifier<S, C>(mut self, name: S, clf: C) -> Self
        where S: ToString,
              C: Classifier + 'static,
    {
        self.classifier = Some((name.to_string(), Box::new(clf)));
        self
    }


    /// Build the pipeline.
    /// Fails if no classifier is given or if two steps share a name.
    pub fn build(self) -> Result<Pipeline> {
        let classifier = self.classifier
            .ok_or_else(|| VoteError::Configuration(
                "a pipeline needs a final classifier".to_string()
            ))?;

        let mut names = self.transformers.iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(classifier.0.as_str()))
            .collect::<Vec<_>>();
        if names.iter().any(|name| name.contains(params::NESTED_SEPARATOR)) {
            return Err(VoteError::Configuration(format!(
                "step names must not contain `{}`", params::NESTED_SEPARATOR
            )));
        }
        let n_steps = names.len();
        names.sort_unstable();
        names.dedup();
        if names.len() != n_steps {
            return Err(VoteError::Configuration(
                "pipeline step names must be unique".to_string()
            ));
        }

        Ok(Pipeline {
            transformers: self.transformers,
            classifier,
            fitted: false,
        })
    }
}


impl Pipeline {
    /// Returns a builder of `Pipeline`.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }


    /// Returns the names of the steps in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.transformers.iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(self.classifier.0.as_str()))
            .collect()
    }


    /// Returns the final classifier.
    pub fn final_classifier(&self) -> &dyn Classifier {
        self.classifier.1.as_ref()
    }


    fn transform(&self, sample: &Sample) -> Result<Sample> {
        if !self.fitted {
            return Err(VoteError::not_fitted(self.name()));
        }
        let mut current = sample.clone();
        for (_, step) in self.transformers.iter() {
            current = step.transform(&current)?;
        }
        Ok(current)
    }
}


impl Classifier for Pipeline {
    fn name(&self) -> &str {
        "Pipeline"
    }


    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()> {
        self.fitted = false;
        sample.check_target_len(target.len())?;

        let mut current = sample.clone();
        for (_, step) in self.transformers.iter_mut() {
            current = step.fit_transform(&current)?;
        }
        self.classifier.1.fit(&current, target)?;
        self.fitted = true;
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> Result<Vec<usize>> {
        let sample = self.transform(sample)?;
        self.classifier.1.predict(&sample)
    }


    fn supports_proba(&self) -> bool {
        self.classifier.1.supports_proba()
    }


    fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        if !self.supports_proba() {
            return Err(VoteError::UnsupportedOperation {
                estimator: self.name().to_string(),
                operation: "predict_proba",
            });
        }
        let sample = self.transform(sample)?;
        self.classifier.1.predict_proba(&sample)
    }


    fn params(&self, deep: bool) -> Params {
        let mut out = Params::new();

        let steps = self.transformers.iter()
            .map(|(name, step)| {
                let repr = params::describe(step.name(), &step.params());
                ParamValue::List(vec![name.as_str().into(), ParamValue::Estimator(repr)])
            })
            .chain(std::iter::once({
                let (name, clf) = &self.classifier;
                ParamValue::List(vec![
                    name.as_str().into(),
                    crate::classifier::describe_classifier(clf.as_ref()),
                ])
            }))
            .collect::<Vec<_>>();
        out.insert("steps".into(), ParamValue::List(steps));

        if !deep { return out; }

        for (name, step) in self.transformers.iter() {
            let repr = params::describe(step.name(), &step.params());
            out.insert(name.clone(), ParamValue::Estimator(repr));
            params::extend_prefixed(&mut out, name, step.params());
        }
        let (name, clf) = &self.classifier;
        out.insert(name.clone(), crate::classifier::describe_classifier(clf.as_ref()));
        params::extend_prefixed(&mut out, name, clf.params(true));
        out
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        let Some((step, rest)) = params::split_nested(key) else {
            return Err(VoteError::invalid_parameter(self.name(), key));
        };

        if let Some((_, t)) = self.transformers.iter_mut()
            .find(|(name, _)| name.as_str() == step)
        {
            t.set_param(rest, value)?;
        } else if self.classifier.0 == step {
            self.classifier.1.set_param(rest, value)?;
        } else {
            return Err(VoteError::invalid_parameter("Pipeline", key));
        }
        self.fitted = false;
        Ok(())
    }


    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }


    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
