// insights-core/src/domain/alerts/rule.rs

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::domain::alerts::alert::{AlertSeverity, AlertType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[serde(alias = "gt")]
    Above,
    #[serde(alias = "lt")]
    Below,
    #[serde(alias = "eq")]
    Equals,
    #[serde(alias = "neq")]
    NotEquals,
    #[serde(alias = "change_up")]
    IncreasedBy,
    #[serde(alias = "change_down")]
    DecreasedBy,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::IncreasedBy => "increased_by",
            Self::DecreasedBy => "decreased_by",
        }
    }

    /// Change conditions compare against the previous observation.
    pub fn needs_baseline(&self) -> bool {
        matches!(self, Self::IncreasedBy | Self::DecreasedBy)
    }

    pub fn alert_type(&self) -> AlertType {
        if self.needs_baseline() {
            AlertType::Change
        } else {
            AlertType::Threshold
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Above => ">",
            Self::Below => "<",
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::IncreasedBy => "+%",
            Self::DecreasedBy => "-%",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AlertRule {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub metric: String,
    pub condition: Condition,
    #[validate(custom(function = "finite"))]
    pub threshold: f64,
    #[serde(default = "default_cooldown")]
    #[validate(range(max = MAX_COOLDOWN_MINUTES))]
    pub cooldown_minutes: u64,
    #[serde(default)]
    pub severity: AlertSeverity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Template for the alert body; a generic sentence is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Ten years.
pub const MAX_COOLDOWN_MINUTES: u64 = 10 * 365 * 24 * 60;

fn default_cooldown() -> u64 {
    60
}
fn default_enabled() -> bool {
    true
}

fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleOutcome {
    Disabled,
    CoolingDown { remaining_minutes: i64 },
    /// Change condition with no usable previous value (missing or zero).
    MissingBaseline,
    NotTriggered,
    Triggered {
        value: f64,
        /// Percentage change for change conditions.
        change_pct: Option<f64>,
    },
}

impl RuleOutcome {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

impl AlertRule {
    pub fn check(
        &self,
        current: f64,
        previous: Option<f64>,
        last_triggered: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RuleOutcome {
        if !self.enabled {
            return RuleOutcome::Disabled;
        }

        if let Some(last) = last_triggered {
            // Trop grand pour chrono : la règle reste muette
            let Some(cooldown) = i64::try_from(self.cooldown_minutes)
                .ok()
                .and_then(TimeDelta::try_minutes)
            else {
                return RuleOutcome::CoolingDown {
                    remaining_minutes: i64::MAX,
                };
            };
            let elapsed = now - last;
            if elapsed < cooldown {
                return RuleOutcome::CoolingDown {
                    remaining_minutes: (cooldown - elapsed).num_minutes(),
                };
            }
        }

        let change_pct = match (self.condition.needs_baseline(), previous) {
            (false, _) => None,
            (true, Some(prev)) if prev != 0.0 && prev.is_finite() => {
                Some((current - prev) / prev.abs() * 100.0)
            }
            (true, _) => return RuleOutcome::MissingBaseline,
        };

        let fired = match self.condition {
            Condition::Above => current > self.threshold,
            Condition::Below => current < self.threshold,
            Condition::Equals => (current - self.threshold).abs() < f64::EPSILON,
            Condition::NotEquals => (current - self.threshold).abs() >= f64::EPSILON,
            Condition::IncreasedBy => change_pct.is_some_and(|p| p >= self.threshold),
            Condition::DecreasedBy => change_pct.is_some_and(|p| -p >= self.threshold),
        };

        if fired {
            RuleOutcome::Triggered {
                value: current,
                change_pct,
            }
        } else {
            RuleOutcome::NotTriggered
        }
    }

    /// `kpi.arpu > 5` style one-liner for listings.
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.metric, self.condition.symbol(), self.threshold)
    }
}
