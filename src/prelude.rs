//! Exports the ensemble, the base classifiers, and the evaluation tools.
//!
pub use crate::ensemble::{
    // Ensemble ---------------------------------
    MajorityVoteClassifier,
    MajorityVoteBuilder,
    Vote,
};


pub use crate::classifiers::{
    // Base classifiers -------------------------
    LogisticRegression,
    Penalty,

    DecisionTreeClassifier,
    Criterion,

    KNeighborsClassifier,
    Metric,
    NeighborWeights,

    Pipeline,
};


pub use crate::classifier::{
    Classifier,
    Transformer,
};


pub use crate::preprocessing::{
    LabelEncoder,
    StandardScaler,
    TrainTestSplit,
};


pub use crate::research::{
    // Evaluation -------------------------------
    StratifiedKFold,
    Scoring,
    cross_val_score,

    GridSearchCV,
    ParamGrid,

    roc_curve,
    auc,
    roc_auc_score,
    accuracy_score,
};


pub use crate::params::{
    Params,
    ParamValue,
};


pub use crate::sample::{
    Sample,
    SampleReader,
};


pub use crate::datasets::load_iris;
pub use crate::error::VoteError;
