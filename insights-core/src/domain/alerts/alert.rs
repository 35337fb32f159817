// insights-core/src/domain/alerts/alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Threshold,
    Change,
    Anomaly,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Change => "change",
            Self::Anomaly => "anomaly",
        }
    }
}

// Declaration order matters: Info < Warning < Critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    #[default]
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Acknowledged)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "acknowledged" | "ack" => Ok(Self::Acknowledged),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(DomainError::SchemaError(format!(
                "Unknown alert status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    /// `None` for anomaly alerts, which come from a watch rather than a rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub title: String,
    pub message: String,
    pub metric: String,
    pub observed_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// Set when the alert is closed, by resolution or dismissal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub rule_id: Option<String>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub metric: String,
    pub observed_value: f64,
    pub threshold: Option<f64>,
}

impl Alert {
    pub fn raise(new: NewAlert, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rule_id: new.rule_id,
            alert_type: new.alert_type,
            severity: new.severity,
            status: AlertStatus::Active,
            title: new.title,
            message: new.message,
            metric: new.metric,
            observed_value: new.observed_value,
            threshold: new.threshold,
            created_at: now,
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    pub fn acknowledge(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(AlertStatus::Acknowledged, &[AlertStatus::Active])?;
        self.acknowledged_at = Some(now);
        Ok(())
    }

    pub fn resolve(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(
            AlertStatus::Resolved,
            &[AlertStatus::Active, AlertStatus::Acknowledged],
        )?;
        self.resolved_at = Some(now);
        Ok(())
    }

    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(
            AlertStatus::Dismissed,
            &[AlertStatus::Active, AlertStatus::Acknowledged],
        )?;
        self.resolved_at = Some(now);
        Ok(())
    }

    fn transition(&mut self, to: AlertStatus, allowed_from: &[AlertStatus]) -> Result<(), DomainError> {
        if !allowed_from.contains(&self.status) {
            return Err(DomainError::InvalidAlertTransition {
                id: self.id.clone(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}
