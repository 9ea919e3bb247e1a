pub mod access_history;
pub mod evictor;

pub use access_history::{AccessHistory, PREDICTION_WINDOW_SECS};
pub use evictor::{AccessPrediction, PredictiveEvictor};
