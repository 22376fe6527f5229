//! This directory provides the tools to evaluate classifiers.
//! - Metrics (ROC curve, AUC, accuracy)
//! - Stratified cross validation
//! - Grid search over hyperparameters
//! - Plots of ROC curves and decision regions

/// Defines evaluation metrics.
pub mod metrics;

/// Provides stratified k-fold cross validation.
pub mod cross_validation;

/// Provides an exhaustive search over parameter grids.
pub mod grid_search;

/// Provides some plots as SVG files.
pub mod plot;


pub use metrics::{
    RocCurve,
    roc_curve,
    auc,
    roc_auc_score,
    accuracy_score,
};

pub use cross_validation::{
    Fold,
    Scoring,
    StratifiedKFold,
    cross_val_score,
};

pub use grid_search::{
    CvResults,
    GridSearchCV,
    ParamGrid,
    parameter_grid,
};

pub use plot::{
    plot_roc_curves,
    plot_decision_regions,
};
