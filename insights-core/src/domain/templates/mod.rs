// insights-core/src/domain/templates/mod.rs

pub mod builtin;

pub use builtin::builtin_templates;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use validator::Validate;

use crate::domain::profile::{ColumnStatistics, DataType};
use crate::domain::roles::{RoleAssignment, SemanticType, normalize_column_name};

const REQUIRED_WEIGHT: f64 = 2.0;
const OPTIONAL_WEIGHT: f64 = 1.0;
const HINT_BONUS: f64 = 0.05;

/// Expected shape of an export produced by a given engine or SDK.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct EngineTemplate {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub fields: Vec<TemplateField>,
    /// Column names the engine emits verbatim.
    #[serde(default)]
    pub column_hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateField {
    pub semantic: SemanticType,
    #[serde(default)]
    pub required: bool,
}

fn default_engine() -> String {
    "Custom".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateMatch {
    pub template_id: String,
    pub name: String,
    pub engine: String,
    pub confidence: f64,
    /// Semantic field -> dataset column that fills it.
    pub mapping: BTreeMap<SemanticType, String>,
    pub missing_required: Vec<SemanticType>,
    pub hint_hits: usize,
}

impl TemplateMatch {
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

pub struct TemplateMatcher {
    templates: Vec<EngineTemplate>,
}

impl TemplateMatcher {
    /// Built-in catalogue with `custom` layered on top; a custom id replaces the built-in one.
    pub fn new(custom: &[EngineTemplate]) -> Self {
        let mut templates = builtin_templates();
        for template in custom {
            match templates.iter_mut().find(|t| t.id == template.id) {
                Some(existing) => *existing = template.clone(),
                None => templates.push(template.clone()),
            }
        }
        Self { templates }
    }

    pub fn templates(&self) -> &[EngineTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&EngineTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn rank(
        &self,
        assignments: &[RoleAssignment],
        columns: &[ColumnStatistics],
    ) -> Vec<TemplateMatch> {
        // Colonnes vides : elles ne remplissent aucun champ
        let empty: HashSet<&str> = columns
            .iter()
            .filter(|c| c.data_type == DataType::Unknown)
            .map(|c| c.name.as_str())
            .collect();

        let mut best_column: BTreeMap<SemanticType, &RoleAssignment> = BTreeMap::new();
        for assignment in assignments {
            let Some(semantic) = assignment.semantic else {
                continue;
            };
            if empty.contains(assignment.column.as_str()) {
                continue;
            }
            best_column
                .entry(semantic)
                .and_modify(|current| {
                    if assignment.confidence > current.confidence {
                        *current = assignment;
                    }
                })
                .or_insert(assignment);
        }

        let normalized: HashSet<String> = columns
            .iter()
            .map(|c| normalize_column_name(&c.name))
            .collect();

        let mut ranked: Vec<TemplateMatch> = self
            .templates
            .iter()
            .map(|t| score_template(t, &best_column, &normalized))
            .collect();

        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.template_id.cmp(&b.template_id))
        });
        ranked
    }

    /// First ranked template with every required field present and enough confidence.
    pub fn best_match(ranked: &[TemplateMatch], min_confidence: f64) -> Option<&TemplateMatch> {
        ranked
            .iter()
            .find(|m| m.is_complete() && m.confidence >= min_confidence)
    }
}

fn score_template(
    template: &EngineTemplate,
    best_column: &BTreeMap<SemanticType, &RoleAssignment>,
    normalized_columns: &HashSet<String>,
) -> TemplateMatch {
    let mut total = 0.0;
    let mut matched = 0.0;
    let mut mapping = BTreeMap::new();
    let mut missing_required = Vec::new();

    for field in &template.fields {
        let weight = if field.required {
            REQUIRED_WEIGHT
        } else {
            OPTIONAL_WEIGHT
        };
        total += weight;
        match best_column.get(&field.semantic) {
            Some(assignment) => {
                matched += weight;
                mapping.insert(field.semantic, assignment.column.clone());
            }
            None if field.required => missing_required.push(field.semantic),
            None => {}
        }
    }

    let hint_hits = template
        .column_hints
        .iter()
        .map(|h| normalize_column_name(h))
        .collect::<HashSet<_>>()
        .intersection(normalized_columns)
        .count();

    let base = if total > 0.0 { matched / total } else { 0.0 };
    let confidence = (base + HINT_BONUS * hint_hits as f64).min(1.0);

    TemplateMatch {
        template_id: template.id.clone(),
        name: template.name.clone(),
        engine: template.engine.clone(),
        confidence: (confidence * 100.0).round() / 100.0,
        mapping,
        missing_required,
        hint_hits,
    }
}
