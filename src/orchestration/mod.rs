pub mod jobs;
pub mod orchestrator;

pub use jobs::{resolution_files, score_files, utilization_files, ReportFormat};
pub use orchestrator::PeriodicRunner;
