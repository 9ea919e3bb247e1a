pub mod concentration;
pub mod controller;
pub mod entropy_window;
pub mod metrics;
pub mod usage;

pub use concentration::ConcentrationTracker;
pub use controller::DiversityController;
pub use entropy_window::SelectionEntropyWindow;
pub use metrics::{DiversityHealth, DiversityMetrics};
pub use usage::RandomizerUsage;
