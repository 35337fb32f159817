// insights-core/src/domain/alerts/mod.rs

pub mod alert;
pub mod anomaly;
pub mod rule;
pub mod state;

pub use alert::{Alert, AlertSeverity, AlertStatus, AlertType, NewAlert};
pub use anomaly::{AnomalyOutcome, AnomalyWatch, MetricState};
pub use rule::{AlertRule, Condition, RuleOutcome};
pub use state::{AlertState, AlertSummary, RuleState};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use crate::domain::error::DomainError;

/// Ten years.
pub const MAX_RETENTION_DAYS: u32 = 10 * 365;

/// Contents of `alerts.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(default)]
pub struct AlertsConfig {
    #[validate(nested)]
    pub rules: Vec<AlertRule>,
    #[validate(nested)]
    pub anomalies: Vec<AnomalyWatch>,
    /// Closed alerts older than this are pruned.
    #[validate(range(max = MAX_RETENTION_DAYS))]
    pub retention_days: u32,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            anomalies: Vec::new(),
            retention_days: 30,
        }
    }
}

impl AlertsConfig {
    /// Rule ids key the persisted state, so they must be unique.
    pub fn check_unique_ids(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(DomainError::InvalidRule {
                    rule: rule.id.clone(),
                    reason: "duplicate rule id".to_string(),
                });
            }
        }
        Ok(())
    }
}
