// insights-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    // --- ERREURS DU DOMAINE (Schéma, Règles, Alertes) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, DuckDB) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for InsightsError {
    fn from(err: std::io::Error) -> Self {
        InsightsError::Infrastructure(InfrastructureError::Io(err))
    }
}

// =============================================================================
//  ERROR CATALOGUE
// =============================================================================

/// Coarse family an error belongs to. Drives the guidance shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    File,
    Data,
    Integration,
    Sync,
    Storage,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    Retry,
    Refresh,
    Reconnect,
    Settings,
    Support,
    Dismiss,
}

impl RecoveryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Refresh => "refresh",
            Self::Reconnect => "reconnect",
            Self::Settings => "settings",
            Self::Support => "support",
            Self::Dismiss => "dismiss",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorGuidance {
    pub title: &'static str,
    pub message: &'static str,
    pub actions: &'static [RecoveryAction],
}

impl ErrorCategory {
    pub fn guidance(&self) -> ErrorGuidance {
        use RecoveryAction::*;
        match self {
            Self::Network => ErrorGuidance {
                title: "Connection problem",
                message: "The data source could not be reached. Check your connection and try again.",
                actions: &[Retry, Dismiss],
            },
            Self::Auth => ErrorGuidance {
                title: "Authentication required",
                message: "Your credentials were rejected or have expired.",
                actions: &[Reconnect, Settings],
            },
            Self::File => ErrorGuidance {
                title: "File could not be read",
                message: "The file is missing, unreadable, or in a format that is not supported.",
                actions: &[Retry, Dismiss],
            },
            Self::Data => ErrorGuidance {
                title: "Data problem",
                message: "The data does not have the expected shape. Review the columns and values.",
                actions: &[Refresh, Dismiss],
            },
            Self::Integration => ErrorGuidance {
                title: "Integration failure",
                message: "The analysis engine rejected the input.",
                actions: &[Retry, Support],
            },
            Self::Sync => ErrorGuidance {
                title: "Out of sync",
                message: "Local state no longer matches the source. Refresh to reload it.",
                actions: &[Refresh, Retry],
            },
            Self::Storage => ErrorGuidance {
                title: "Storage problem",
                message: "Saved state could not be read or written.",
                actions: &[Settings, Support],
            },
            Self::Api => ErrorGuidance {
                title: "Unexpected error",
                message: "Something went wrong while processing the request.",
                actions: &[Retry, Support],
            },
        }
    }
}

impl DomainError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDataset(_) | Self::SchemaError(_) => ErrorCategory::Data,
            Self::InvalidPattern { .. } | Self::InvalidRule { .. } => ErrorCategory::Api,
            Self::InvalidAlertTransition { .. }
            | Self::AlertNotFound(_)
            | Self::AmbiguousAlertId { .. } => ErrorCategory::Sync,
        }
    }
}

impl InfrastructureError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Database(DatabaseError::DuckDB(_)) => ErrorCategory::Integration,
            Self::Io(_) | Self::UnsupportedFormat(_) | Self::ConfigNotFound(_) => {
                ErrorCategory::File
            }
            Self::YamlError(_) | Self::ConfigError(_) | Self::TemplateError(_) => {
                ErrorCategory::Api
            }
            Self::JsonError(_) => ErrorCategory::Storage,
        }
    }
}

impl InsightsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Infrastructure(e) => e.category(),
            Self::InternalError(_) => ErrorCategory::Api,
            Self::UnsafePath(_) => ErrorCategory::File,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_map_to_file_guidance() {
        let err: InsightsError = std::io::Error::other("boom").into();
        assert_eq!(err.category(), ErrorCategory::File);
        assert!(err.category().guidance().actions.contains(&RecoveryAction::Retry));
    }

    #[test]
    fn test_alert_errors_are_sync_problems() {
        let err = InsightsError::from(DomainError::AlertNotFound("a-1".into()));
        assert_eq!(err.category(), ErrorCategory::Sync);
        assert_eq!(err.to_string(), "Alert 'a-1' not found");
    }

    #[test]
    fn test_every_category_offers_an_action() {
        let all = [
            ErrorCategory::Network,
            ErrorCategory::Auth,
            ErrorCategory::File,
            ErrorCategory::Data,
            ErrorCategory::Integration,
            ErrorCategory::Sync,
            ErrorCategory::Storage,
            ErrorCategory::Api,
        ];
        for category in all {
            assert!(!category.guidance().actions.is_empty(), "{:?}", category);
        }
    }
}
