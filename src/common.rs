//! Defines some common functions used in this library.

/// Defines some useful functions such as `argmax` or `mean_and_std`.
pub mod utils;

/// Defines some checker functions.
pub(crate) mod checker;
