// insights-core/src/application/alerting.rs

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument, warn};

use crate::application::ports::MessageRenderer;
use crate::domain::alerts::{
    Alert, AlertRule, AlertState, AlertSummary, AlertType, AlertsConfig, AnomalyOutcome,
    AnomalyWatch, NewAlert, RuleOutcome,
};
use crate::domain::metrics::MetricSnapshot;
use crate::error::InsightsError;
use crate::infrastructure::state::AlertStateStore;

const DEFAULT_MESSAGE: &str = "{{ metric }} is {{ value | num }} \
(rule: {{ condition }} {{ threshold | num }})\
{% if change is defined %}, change {{ change | pct }}{% endif %}";

const ANOMALY_MESSAGE: &str = "{{ metric }} is {{ value | num }}, \
{{ z_score | round(1) }} standard deviations from its usual {{ mean | num }}";

pub struct AlertEngine<'r> {
    renderer: &'r dyn MessageRenderer,
}

impl<'r> AlertEngine<'r> {
    pub fn new(renderer: &'r dyn MessageRenderer) -> Self {
        Self { renderer }
    }

    /// Runs every rule and anomaly watch against `snapshot`. New alerts are
    /// appended to `state` and also returned.
    #[instrument(skip_all, fields(rules = config.rules.len(), watches = config.anomalies.len()))]
    pub fn evaluate(
        &self,
        config: &AlertsConfig,
        snapshot: &MetricSnapshot,
        state: &mut AlertState,
        now: DateTime<Utc>,
    ) -> Result<Vec<Alert>, InsightsError> {
        let mut raised = Vec::new();

        for rule in &config.rules {
            let Some(current) = snapshot.get(&rule.metric) else {
                warn!(rule = %rule.id, metric = %rule.metric, "Metric not in snapshot, rule skipped");
                continue;
            };

            let memory = state.rules.entry(rule.id.clone()).or_default();
            let outcome = rule.check(current, memory.last_value, memory.last_triggered, now);
            debug!(rule = %rule.id, ?outcome, "Rule evaluated");

            match outcome {
                RuleOutcome::Disabled => continue,
                RuleOutcome::Triggered { value, change_pct } => {
                    let message = self.rule_message(rule, value, change_pct)?;
                    memory.last_triggered = Some(now);
                    raised.push(Alert::raise(
                        NewAlert {
                            rule_id: Some(rule.id.clone()),
                            alert_type: rule.condition.alert_type(),
                            severity: rule.severity,
                            title: rule.name.clone(),
                            message,
                            metric: rule.metric.clone(),
                            observed_value: value,
                            threshold: Some(rule.threshold),
                        },
                        now,
                    ));
                }
                RuleOutcome::CoolingDown { .. }
                | RuleOutcome::MissingBaseline
                | RuleOutcome::NotTriggered => {}
            }
            memory.last_value = Some(current);
        }

        for watch in &config.anomalies {
            let Some(value) = snapshot.get(&watch.metric) else {
                warn!(metric = %watch.metric, "Metric not in snapshot, anomaly watch skipped");
                continue;
            };
            let history = state.metrics.entry(watch.metric.clone()).or_default();
            if let AnomalyOutcome::Anomalous {
                z_score,
                mean,
                std_dev,
            } = watch.observe(value, history)
            {
                raised.push(self.anomaly_alert(watch, value, z_score, mean, std_dev, now)?);
            }
        }

        if !raised.is_empty() {
            info!(count = raised.len(), "🔔 Alerts raised");
        }
        state.alerts.extend(raised.iter().cloned());
        Ok(raised)
    }

    fn rule_message(
        &self,
        rule: &AlertRule,
        value: f64,
        change_pct: Option<f64>,
    ) -> Result<String, InsightsError> {
        let mut ctx = Map::new();
        ctx.insert("rule".into(), json!(rule.id));
        ctx.insert("name".into(), json!(rule.name));
        ctx.insert("metric".into(), json!(rule.metric));
        ctx.insert("value".into(), json!(value));
        ctx.insert("threshold".into(), json!(rule.threshold));
        ctx.insert("condition".into(), json!(rule.condition.as_str()));
        ctx.insert("severity".into(), json!(rule.severity.as_str()));
        if let Some(change) = change_pct {
            ctx.insert("change".into(), json!(change));
        }

        let template = rule.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
        self.renderer.render(template, &Value::Object(ctx))
    }

    fn anomaly_alert(
        &self,
        watch: &AnomalyWatch,
        value: f64,
        z_score: f64,
        mean: f64,
        std_dev: f64,
        now: DateTime<Utc>,
    ) -> Result<Alert, InsightsError> {
        let ctx = json!({
            "metric": watch.metric,
            "value": value,
            "z_score": z_score,
            "mean": mean,
            "std_dev": std_dev,
        });
        Ok(Alert::raise(
            NewAlert {
                rule_id: None,
                alert_type: AlertType::Anomaly,
                severity: watch.severity,
                title: format!("Anomaly on {}", watch.metric),
                message: self.renderer.render(ANOMALY_MESSAGE, &ctx)?,
                metric: watch.metric.clone(),
                observed_value: value,
                threshold: Some(watch.z_threshold),
            },
            now,
        ))
    }

    pub fn acknowledge(
        state: &mut AlertState,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Alert, InsightsError> {
        let alert = state.find_mut(id)?;
        alert.acknowledge(now)?;
        Ok(alert.clone())
    }

    pub fn resolve(
        state: &mut AlertState,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Alert, InsightsError> {
        let alert = state.find_mut(id)?;
        alert.resolve(now)?;
        Ok(alert.clone())
    }

    pub fn dismiss(
        state: &mut AlertState,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Alert, InsightsError> {
        let alert = state.find_mut(id)?;
        alert.dismiss(now)?;
        Ok(alert.clone())
    }

    pub fn prune(state: &mut AlertState, retention_days: u32, now: DateTime<Utc>) -> usize {
        let removed = state.prune(retention_days, now);
        if removed > 0 {
            info!(removed, retention_days, "Pruned closed alerts");
        }
        removed
    }

    pub fn summary(state: &AlertState) -> AlertSummary {
        state.summary()
    }
}

/// Load state, evaluate, prune and save back in one go.
pub fn check_alerts(
    store: &AlertStateStore,
    config: &AlertsConfig,
    snapshot: &MetricSnapshot,
    renderer: &dyn MessageRenderer,
    now: DateTime<Utc>,
) -> Result<Vec<Alert>, InsightsError> {
    let mut state = store.load()?;
    let raised = AlertEngine::new(renderer).evaluate(config, snapshot, &mut state, now)?;
    AlertEngine::prune(&mut state, config.retention_days, now);
    store.save(&state)?;
    Ok(raised)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::alerts::{AlertSeverity, AlertStatus, Condition};
    use crate::infrastructure::jinja::JinjaRenderer;
    use anyhow::Result;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn snapshot(pairs: &[(&str, f64)]) -> MetricSnapshot {
        let mut s = MetricSnapshot::new();
        for (k, v) in pairs {
            s.insert(*k, *v);
        }
        s
    }

    fn rule(id: &str, metric: &str, condition: Condition, threshold: f64) -> AlertRule {
        AlertRule {
            id: id.to_string(),
            name: format!("Rule {id}"),
            metric: metric.to_string(),
            condition,
            threshold,
            cooldown_minutes: 60,
            severity: AlertSeverity::Critical,
            enabled: true,
            message: None,
        }
    }

    #[test]
    fn test_threshold_rule_raises_and_cools_down() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let engine = AlertEngine::new(&renderer);
        let config = AlertsConfig {
            rules: vec![rule("low_q", "quality_score", Condition::Below, 80.0)],
            ..Default::default()
        };
        let mut state = AlertState::default();

        let raised = engine.evaluate(&config, &snapshot(&[("quality_score", 62.0)]), &mut state, t0())?;
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].alert_type, AlertType::Threshold);
        assert_eq!(raised[0].status, AlertStatus::Active);
        assert_eq!(raised[0].message, "quality_score is 62 (rule: below 80)");
        assert_eq!(state.rules["low_q"].last_triggered, Some(t0()));

        let again = engine.evaluate(
            &config,
            &snapshot(&[("quality_score", 60.0)]),
            &mut state,
            t0() + Duration::minutes(30),
        )?;
        assert!(again.is_empty());
        assert_eq!(state.rules["low_q"].last_value, Some(60.0));

        let later = engine.evaluate(
            &config,
            &snapshot(&[("quality_score", 60.0)]),
            &mut state,
            t0() + Duration::minutes(61),
        )?;
        assert_eq!(later.len(), 1);
        assert_eq!(state.alerts.len(), 2);
        Ok(())
    }

    #[test]
    fn test_change_rule_uses_previous_run() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let engine = AlertEngine::new(&renderer);
        let mut drop = rule("rev_drop", "kpi.total_revenue", Condition::DecreasedBy, 25.0);
        drop.message = Some("{{ name }}: {{ change | pct }}".to_string());
        let config = AlertsConfig {
            rules: vec![drop],
            ..Default::default()
        };
        let mut state = AlertState::default();

        let first = engine.evaluate(&config, &snapshot(&[("kpi.total_revenue", 200.0)]), &mut state, t0())?;
        assert!(first.is_empty(), "no baseline on the first run");

        let second = engine.evaluate(
            &config,
            &snapshot(&[("kpi.total_revenue", 100.0)]),
            &mut state,
            t0() + Duration::days(1),
        )?;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].alert_type, AlertType::Change);
        assert_eq!(second[0].message, "Rule rev_drop: -50.0%");
        Ok(())
    }

    #[test]
    fn test_missing_metric_and_disabled_rule_are_skipped() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let mut off = rule("off", "row_count", Condition::Above, 0.0);
        off.enabled = false;
        let config = AlertsConfig {
            rules: vec![rule("ghost", "kpi.nope", Condition::Above, 0.0), off],
            ..Default::default()
        };
        let mut state = AlertState::default();
        let raised = AlertEngine::new(&renderer).evaluate(
            &config,
            &snapshot(&[("row_count", 10.0)]),
            &mut state,
            t0(),
        )?;
        assert!(raised.is_empty());
        assert!(state.rules.get("ghost").is_none());
        assert_eq!(state.rules["off"].last_value, None);
        Ok(())
    }

    #[test]
    fn test_anomaly_watch_raises_after_history() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let engine = AlertEngine::new(&renderer);
        let config = AlertsConfig {
            anomalies: vec![AnomalyWatch {
                metric: "kpi.events".to_string(),
                z_threshold: 3.0,
                severity: AlertSeverity::Warning,
            }],
            ..Default::default()
        };
        let mut state = AlertState::default();
        for (i, v) in [100.0, 104.0, 98.0, 101.0, 97.0].into_iter().enumerate() {
            let raised = engine.evaluate(
                &config,
                &snapshot(&[("kpi.events", v)]),
                &mut state,
                t0() + Duration::days(i as i64),
            )?;
            assert!(raised.is_empty());
        }

        let raised = engine.evaluate(&config, &snapshot(&[("kpi.events", 400.0)]), &mut state, t0())?;
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].alert_type, AlertType::Anomaly);
        assert!(raised[0].rule_id.is_none());
        assert!(raised[0].message.starts_with("kpi.events is 400, "));
        assert_eq!(state.metrics["kpi.events"].count, 5);
        Ok(())
    }

    #[test]
    fn test_lifecycle_helpers() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let config = AlertsConfig {
            rules: vec![rule("r", "row_count", Condition::Above, 1.0)],
            ..Default::default()
        };
        let mut state = AlertState::default();
        let raised = AlertEngine::new(&renderer).evaluate(
            &config,
            &snapshot(&[("row_count", 10.0)]),
            &mut state,
            t0(),
        )?;
        let id = raised[0].id.clone();

        let acked = AlertEngine::acknowledge(&mut state, &id, t0())?;
        assert_eq!(acked.status, AlertStatus::Acknowledged);
        let resolved = AlertEngine::resolve(&mut state, &id, t0())?;
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert!(AlertEngine::dismiss(&mut state, &id, t0()).is_err());

        assert_eq!(AlertEngine::summary(&state).resolved, 1);
        assert_eq!(AlertEngine::prune(&mut state, 30, t0() + Duration::days(31)), 1);
        assert!(state.alerts.is_empty());
        Ok(())
    }

    #[test]
    fn test_check_alerts_persists_state() -> Result<()> {
        let dir = tempdir()?;
        let store = AlertStateStore::new(dir.path());
        let renderer = JinjaRenderer::new();
        let config = AlertsConfig {
            rules: vec![rule("r", "row_count", Condition::Above, 1.0)],
            ..Default::default()
        };

        let raised = check_alerts(&store, &config, &snapshot(&[("row_count", 5.0)]), &renderer, t0())?;
        assert_eq!(raised.len(), 1);

        let saved = store.load()?;
        assert_eq!(saved.alerts.len(), 1);
        assert_eq!(saved.rules["r"].last_value, Some(5.0));
        Ok(())
    }
}
