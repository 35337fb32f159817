// insights-core/src/domain/alerts/state.rs

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::alerts::alert::{Alert, AlertSeverity, AlertStatus};
use crate::domain::alerts::anomaly::MetricState;
use crate::domain::error::DomainError;

/// Memory of a rule between two evaluations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,
}

/// Everything alerting persists between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlertState {
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleState>,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricState>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AlertSummary {
    pub total: usize,
    pub active: usize,
    pub acknowledged: usize,
    pub resolved: usize,
    pub dismissed: usize,
    pub critical_open: usize,
}

impl AlertState {
    /// Full id, or a prefix that only one alert starts with.
    pub fn find_mut(&mut self, id: &str) -> Result<&mut Alert, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::AlertNotFound(id.to_string()));
        }

        let index = match self.alerts.iter().position(|a| a.id == id) {
            Some(exact) => exact,
            None => {
                let matches: Vec<usize> = self
                    .alerts
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.id.starts_with(id))
                    .map(|(i, _)| i)
                    .collect();
                match matches.as_slice() {
                    [] => return Err(DomainError::AlertNotFound(id.to_string())),
                    [only] => *only,
                    _ => {
                        return Err(DomainError::AmbiguousAlertId {
                            id: id.to_string(),
                            candidates: matches
                                .iter()
                                .map(|&i| self.alerts[i].id.clone())
                                .collect::<Vec<_>>()
                                .join(", "),
                        });
                    }
                }
            }
        };
        Ok(&mut self.alerts[index])
    }

    pub fn with_status(&self, status: Option<AlertStatus>) -> impl Iterator<Item = &Alert> {
        self.alerts
            .iter()
            .filter(move |a| status.is_none_or(|s| a.status == s))
    }

    /// Drops closed alerts whose closing time is older than `retention_days`.
    /// Returns how many were removed.
    pub fn prune(&mut self, retention_days: u32, now: DateTime<Utc>) -> usize {
        // Hors des bornes de chrono : on garde tout
        let Some(cutoff) = TimeDelta::try_days(i64::from(retention_days))
            .and_then(|retention| now.checked_sub_signed(retention))
        else {
            return 0;
        };
        let before = self.alerts.len();
        self.alerts.retain(|a| {
            a.status.is_open() || a.resolved_at.is_none_or(|closed| closed >= cutoff)
        });
        before - self.alerts.len()
    }

    pub fn summary(&self) -> AlertSummary {
        let mut summary = AlertSummary {
            total: self.alerts.len(),
            ..Default::default()
        };
        for alert in &self.alerts {
            match alert.status {
                AlertStatus::Active => summary.active += 1,
                AlertStatus::Acknowledged => summary.acknowledged += 1,
                AlertStatus::Resolved => summary.resolved += 1,
                AlertStatus::Dismissed => summary.dismissed += 1,
            }
            if alert.status.is_open() && alert.severity == AlertSeverity::Critical {
                summary.critical_open += 1;
            }
        }
        summary
    }
}
