pub mod alerts;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod project;
pub mod quality;
pub mod roles;
pub mod templates;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
