// insights-core/src/infrastructure/state.rs

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::domain::alerts::AlertState;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{load_json_or_default, save_json};

pub const STATE_FILE: &str = "alert_state.json";

/// Alert state persisted as `<target>/alert_state.json`.
pub struct AlertStateStore {
    path: PathBuf,
}

impl AlertStateStore {
    pub fn new(target_dir: &Path) -> Self {
        Self {
            path: target_dir.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<AlertState, InfrastructureError> {
        let state: AlertState = load_json_or_default(&self.path)?;
        debug!(alerts = state.alerts.len(), "Alert state loaded");
        Ok(state)
    }

    pub fn save(&self, state: &AlertState) -> Result<(), InfrastructureError> {
        save_json(&self.path, state)
    }
}
