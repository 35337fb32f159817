// insights-core/src/domain/project/mod.rs

pub mod configuration;
pub use configuration::{AnalysisSettings, ProjectConfig};
