//! Defines the logistic regression classifier.
use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;

use crate::{Classifier, Sample};
use crate::common::{checker, utils};
use crate::error::{Result, VoteError};
use crate::params::{Params, ParamValue};


const DEFAULT_MAX_ITER: usize = 1_000;
const DEFAULT_TOLERANCE: f64 = 1e-4;


/// Regularization term of the logistic regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Penalty {
    /// `0.5 * ||w||^2`.
    L2,
    /// No regularization.
    None,
}


impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::L2 => "l2",
            Self::None => "none",
        };
        write!(f, "{name}")
    }
}


impl FromStr for Penalty {
    type Err = VoteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "l2" => Ok(Self::L2),
            "none" => Ok(Self::None),
            _ => Err(VoteError::ParameterType {
                key: "penalty".to_string(),
                expected: "`l2` or `none`",
                got: s.to_string(),
            }),
        }
    }
}


/// The logistic regression classifier.
///
/// Minimizes
/// ```text
/// 0.5 * ||w||^2 + C * sum_i logloss(x_i, y_i)
/// ```
/// by full-batch gradient descent with step size `1 / L`,
/// where `L` bounds the curvature of the objective.
/// The intercept is not regularized.
/// Binary problems use a single sigmoid model;
/// problems with more classes use the multinomial (softmax) model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    c: f64,
    penalty: Penalty,
    max_iter: usize,
    tol: f64,
    fit_intercept: bool,

    coef: Option<Vec<Vec<f64>>>,
    intercept: Vec<f64>,
    n_class: usize,
}


impl LogisticRegression {
    /// Construct a new instance of `LogisticRegression`
    /// with `C = 1.0`, L2 penalty, and an intercept.
    pub fn new() -> Self {
        Self {
            c: 1.0,
            penalty: Penalty::L2,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOLERANCE,
            fit_intercept: true,
            coef: None,
            intercept: Vec::new(),
            n_class: 0,
        }
    }


    /// Set the inverse regularization strength `C > 0`.
    pub fn c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }


    /// Set the penalty.
    pub fn penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }


    /// Set the maximal number of gradient steps.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }


    /// Set the tolerance on the largest gradient entry.
    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }


    /// Set whether to fit an intercept.
    pub fn fit_intercept(mut self, flag: bool) -> Self {
        self.fit_intercept = flag;
        self
    }


    /// Returns the fitted coefficients, one row per model.
    /// Binary problems have a single row (for the class `1`).
    pub fn coef(&self) -> Option<&[Vec<f64>]> {
        self.coef.as_deref()
    }


    /// Returns the fitted intercepts.
    pub fn intercept(&self) -> &[f64] {
        &self.intercept[..]
    }


    fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(VoteError::Configuration(format!(
                "C must be positive and finite, got {}", self.c
            )));
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(VoteError::Configuration(format!(
                "tol must be non-negative, got {}", self.tol
            )));
        }
        Ok(())
    }


    /// Returns the probabilities of every class for the row `x`.
    fn proba_row(&self, coef: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        let scores = coef.iter()
            .zip(&self.intercept)
            .map(|(w, b)| utils::inner_product(w, x) + b)
            .collect::<Vec<_>>();

        if self.n_class == 2 {
            let p = utils::sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            let mut scores = scores;
            utils::softmax(&mut scores);
            scores
        }
    }


    fn coef_or_err(&self) -> Result<&[Vec<f64>]> {
        self.coef.as_deref()
            .ok_or_else(|| VoteError::not_fitted(self.name()))
    }
}


impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}


impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }


    fn fit(&mut self, sample: &Sample, target: &[usize]) -> Result<()> {
        self.validate()?;
        checker::check_sample(sample, target)?;

        let rows = sample.rows();
        let n_feature = sample.shape().1;
        // A single class still gets a (degenerate) binary model.
        self.n_class = checker::n_classes(target).max(2);
        let n_model = if self.n_class == 2 { 1 } else { self.n_class };

        let reg = match self.penalty {
            Penalty::L2 => 1.0,
            Penalty::None => 0.0,
        };
        let intercept_flag = if self.fit_intercept { 1.0 } else { 0.0 };

        // Curvature bound of the objective.
        let curvature = if n_model == 1 { 0.25 } else { 0.5 };
        let lipschitz = reg + self.c * curvature * rows.iter()
            .map(|x| utils::inner_product(x, x) + intercept_flag)
            .sum::<f64>();
        let step = 1.0 / lipschitz.max(f64::EPSILON);

        let mut coef = vec![vec![0.0; n_feature]; n_model];
        self.intercept = vec![0.0; n_model];

        for _ in 0..self.max_iter {
            let mut grad_w = coef.iter()
                .map(|w| w.iter().map(|wj| reg * wj).collect::<Vec<_>>())
                .collect::<Vec<_>>();
            let mut grad_b = vec![0.0; n_model];

            for (x, &y) in rows.iter().zip(target) {
                let p = self.proba_row(&coef, x);
                for m in 0..n_model {
                    // binary model `0` scores the class `1`.
                    let k = if n_model == 1 { 1 } else { m };
                    let indicator = if y == k { 1.0 } else { 0.0 };
                    let residual = self.c * (p[k] - indicator);
                    grad_w[m].iter_mut()
                        .zip(x)
                        .for_each(|(g, xj)| { *g += residual * xj; });
                    grad_b[m] += residual;
                }
            }
            if !self.fit_intercept { grad_b.fill(0.0); }

            let max_grad = grad_w.iter()
                .flatten()
                .chain(&grad_b)
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));
            if max_grad <= self.tol { break; }

            for m in 0..n_model {
                coef[m].iter_mut()
                    .zip(&grad_w[m])
                    .for_each(|(w, g)| { *w -= step * g; });
                self.intercept[m] -= step * grad_b[m];
            }
        }

        self.coef = Some(coef);
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> Result<Vec<usize>> {
        let proba = self.predict_proba(sample)?;
        let labels = proba.iter()
            .map(|p| utils::argmax(p))
            .collect();
        Ok(labels)
    }


    fn supports_proba(&self) -> bool {
        true
    }


    fn predict_proba(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        let coef = self.coef_or_err()?;
        let n_feature = coef.first().map_or(0, |w| w.len());
        checker::check_n_feature(sample, n_feature)?;

        let proba = sample.rows()
            .iter()
            .map(|x| self.proba_row(coef, x))
            .collect();
        Ok(proba)
    }


    fn params(&self, _deep: bool) -> Params {
        let mut params = Params::new();
        params.insert("C".into(), self.c.into());
        params.insert("penalty".into(), self.penalty.to_string().into());
        params.insert("max_iter".into(), self.max_iter.into());
        params.insert("tol".into(), self.tol.into());
        params.insert("fit_intercept".into(), self.fit_intercept.into());
        params
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> Result<()> {
        match key {
            "C" => {
                let c = value.as_f64(key)?;
                if !(c.is_finite() && c > 0.0) {
                    return Err(value.type_error(key, "a positive number"));
                }
                self.c = c;
            },
            "penalty" => { self.penalty = value.as_str(key)?.parse()?; },
            "max_iter" => { self.max_iter = value.as_usize(key)?; },
            "tol" => { self.tol = value.as_f64(key)?; },
            "fit_intercept" => { self.fit_intercept = value.as_bool(key)?; },
            _ => {
                return Err(VoteError::invalid_parameter(self.name(), key));
            },
        }
        Ok(())
    }


    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }


    fn is_fitted(&self) -> bool {
        self.coef.is_some()
    }
}
