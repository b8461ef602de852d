//! Quantitative feature derivation from live ticks and bounded history.

mod features;
mod history;

pub use features::{extract_features, FeatureSet, LONG_WINDOW, SHORT_WINDOW};
pub use history::{HistoryBuffer, DEFAULT_CAPACITY};
