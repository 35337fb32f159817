// insights-core/src/infrastructure/jinja.rs

// Alert messages are small Jinja templates:
//   "{{ metric }} is {{ value | num }} ({{ change | pct }})"

use minijinja::{Environment, UndefinedBehavior};

use crate::application::ports::MessageRenderer;
use crate::error::InsightsError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Une faute de frappe dans un message doit échouer, pas afficher du vide
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // 1234.5 -> "1234.50", 3.0 -> "3"
        env.add_filter("num", |value: f64| -> String { format_number(value) });

        // 12.345 -> "+12.3%"
        env.add_filter("pct", |value: f64| -> String { format!("{:+.1}%", value) });

        Self { env }
    }

    /// Parses `template` without rendering it, so bad rules fail at load time.
    pub fn check(template: &str) -> Result<(), InfrastructureError> {
        let env = Environment::new();
        env.template_from_str(template)?;
        Ok(())
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MessageRenderer for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, InsightsError> {
        self.env
            .render_str(template, context)
            .map_err(|e| InsightsError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
