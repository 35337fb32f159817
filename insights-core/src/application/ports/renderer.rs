use crate::error::InsightsError;

/// Renders alert message templates against a JSON context.
pub trait MessageRenderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, InsightsError>;
}
