//! Preprocessing tools applied before (or around) classification.

/// Defines `LabelEncoder`.
pub mod label_encoder;
/// Defines `StandardScaler`.
pub mod standard_scaler;
/// Defines the train/test splitter.
pub mod split;


pub use label_encoder::LabelEncoder;
pub use standard_scaler::StandardScaler;
pub use split::TrainTestSplit;
