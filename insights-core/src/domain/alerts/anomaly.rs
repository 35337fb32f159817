// insights-core/src/domain/alerts/anomaly.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::alerts::alert::AlertSeverity;

/// Running mean/variance of one metric across analyses (Welford).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MetricState {
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    pub count: u64,
}

impl MetricState {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Folds a new observation in.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.variance = 0.0;
            return;
        }
        let old_mean = self.mean;
        let n = self.count as f64;
        self.mean += (value - old_mean) / n;
        // M2_new = M2_old + (x - old_mean) * (x - new_mean)
        let prev_m2 = self.variance * (n - 1.0);
        let m2 = prev_m2 + (value - old_mean) * (value - self.mean);
        self.variance = m2 / n;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnomalyOutcome {
    /// Fewer than two observations so far.
    NotEnoughHistory,
    Normal { z_score: f64 },
    Anomalous {
        z_score: f64,
        mean: f64,
        std_dev: f64,
    },
}

/// Z-score watch on a metric of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AnomalyWatch {
    #[validate(length(min = 1))]
    pub metric: String,
    #[serde(default = "default_z_threshold")]
    #[validate(range(exclusive_min = 0.0))]
    pub z_threshold: f64,
    #[serde(default)]
    pub severity: AlertSeverity,
}

fn default_z_threshold() -> f64 {
    3.0
}

impl AnomalyWatch {
    /// Checks `value` against the history, then folds it in unless it is anomalous
    /// so that a spike does not drag the baseline along.
    pub fn observe(&self, value: f64, state: &mut MetricState) -> AnomalyOutcome {
        if state.count < 2 {
            state.update(value);
            return AnomalyOutcome::NotEnoughHistory;
        }

        let std_dev = state.std_dev();
        let z_score = if std_dev > 1e-9 {
            ((value - state.mean) / std_dev).abs()
        } else {
            0.0
        };

        if z_score > self.z_threshold {
            return AnomalyOutcome::Anomalous {
                z_score,
                mean: state.mean,
                std_dev,
            };
        }

        state.update(value);
        AnomalyOutcome::Normal { z_score }
    }
}
