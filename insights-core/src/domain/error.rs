// insights-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Dataset '{0}' has no rows or no columns")]
    #[diagnostic(
        code(insights::domain::empty_dataset),
        help("Check that the file has a header row and at least one data row.")
    )]
    EmptyDataset(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(code(insights::domain::schema))]
    SchemaError(String),

    #[error("Invalid pattern '{name}': {reason}")]
    #[diagnostic(
        code(insights::domain::pattern),
        help("Patterns use Rust regex syntax (https://docs.rs/regex).")
    )]
    InvalidPattern { name: String, reason: String },

    #[error("Alert '{id}' cannot go from {from} to {to}")]
    #[diagnostic(
        code(insights::domain::alert_transition),
        help("Only active or acknowledged alerts can be resolved or dismissed.")
    )]
    InvalidAlertTransition { id: String, from: String, to: String },

    #[error("Alert '{0}' not found")]
    #[diagnostic(code(insights::domain::alert_not_found))]
    AlertNotFound(String),

    #[error("Alert id '{id}' is ambiguous: {candidates}")]
    #[diagnostic(
        code(insights::domain::alert_ambiguous),
        help("Type more characters of the id.")
    )]
    AmbiguousAlertId { id: String, candidates: String },

    #[error("Invalid rule '{rule}': {reason}")]
    #[diagnostic(code(insights::domain::rule))]
    InvalidRule { rule: String, reason: String },
}
