// insights-core/src/domain/roles/inference.rs

use regex::Regex;

use crate::domain::error::DomainError;
use crate::domain::profile::{ColumnStatistics, DataType};
use crate::domain::roles::{ColumnRole, RoleAssignment, SemanticType};

const CONFIDENCE_TYPED_MATCH: f64 = 0.9;
const CONFIDENCE_NAME_ONLY: f64 = 0.6;
const CONFIDENCE_STATISTICS: f64 = 0.5;
const CONFIDENCE_UNKNOWN: f64 = 0.2;

/// Ordered: the first pattern that matches the normalised name wins.
const NAME_PATTERNS: [(SemanticType, &str); 16] = [
    (SemanticType::SessionId, r"^(session|sess)_?(id|uuid|key)?$"),
    (
        SemanticType::UserId,
        r"^(user|player|account|customer|member)_?(id|uuid|key)?$|^(uid|userid|playerid)$",
    ),
    (
        SemanticType::EventTimestamp,
        r"(^|_)(timestamp|ts|time|datetime|date|day)$|_at$|^(ts|timestamp|date|time)_",
    ),
    (
        SemanticType::EventName,
        r"^(event|event_name|event_type|action|action_name|category|event_category)$",
    ),
    (SemanticType::Currency, r"^(currency|currency_code|iso_currency)$"),
    (
        SemanticType::Revenue,
        r"(revenue|price|amount|spend|iap|ltv|arpu|arppu|income|cost)",
    ),
    (
        SemanticType::Level,
        r"(^|_)(level|stage|wave|chapter|world)(_?(id|number|num|index))?$",
    ),
    (SemanticType::Score, r"(score|points|xp|experience|rating|stars)"),
    (
        SemanticType::Duration,
        r"(duration|playtime|play_time|length|seconds|secs|minutes|mins)|_(ms|sec)$",
    ),
    (SemanticType::Quantity, r"(^|_)(count|quantity|qty|num|total)(_|$)"),
    (
        SemanticType::ItemId,
        r"^(item|product|sku|offer|bundle)(_?(id|name|code))?$",
    ),
    (SemanticType::Country, r"(country|region|geo|locale|city|market)"),
    (SemanticType::Platform, r"^(platform|os|os_name|store|channel)$|_platform$"),
    (SemanticType::Device, r"^(device|device_model|device_type|model|hardware)$"),
    (
        SemanticType::AppVersion,
        r"^(version|build|app_version|client_version|build_version|sdk_version)$",
    ),
    (SemanticType::GenericId, r"(^|_)(id|uuid|guid|key)$"),
];

/// `time` on its own (`session_time`, `time_spent`), as opposed to `timestamp`.
const BARE_TIME: &str = r"(^|_)time(_|$)";

/// Unix seconds for 2001-09-09; smaller numbers are not epoch timestamps.
const EPOCH_FLOOR: f64 = 1e9;

struct CompiledRolePattern {
    semantic: SemanticType,
    regex: Regex,
}

/// Assigns a role (identifier, timestamp, metric, dimension) to each profiled column.
pub struct RoleInference {
    patterns: Vec<CompiledRolePattern>,
    bare_time: Regex,
}

impl RoleInference {
    pub fn new() -> Result<Self, DomainError> {
        let mut patterns = Vec::with_capacity(NAME_PATTERNS.len());
        for (semantic, pattern) in NAME_PATTERNS {
            let regex = Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
                name: semantic.as_str().to_string(),
                reason: e.to_string(),
            })?;
            patterns.push(CompiledRolePattern { semantic, regex });
        }
        let bare_time = Regex::new(BARE_TIME).map_err(|e| DomainError::InvalidPattern {
            name: "bare_time".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            patterns,
            bare_time,
        })
    }

    pub fn semantic_for(&self, column_name: &str) -> Option<SemanticType> {
        let normalized = normalize_column_name(column_name);
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(&normalized))
            .map(|p| p.semantic)
    }

    pub fn infer(&self, columns: &[ColumnStatistics]) -> Vec<RoleAssignment> {
        columns.iter().map(|c| self.infer_column(c)).collect()
    }

    pub fn infer_column(&self, stats: &ColumnStatistics) -> RoleAssignment {
        if self.is_elapsed_time(stats) {
            return RoleAssignment {
                column: stats.name.clone(),
                role: SemanticType::Duration.role(),
                semantic: Some(SemanticType::Duration),
                confidence: CONFIDENCE_TYPED_MATCH,
                reason: "name mentions time and values are too small for epoch timestamps"
                    .to_string(),
            };
        }

        if let Some(semantic) = self.semantic_for(&stats.name) {
            let typed = semantic.accepts(stats.data_type);
            return RoleAssignment {
                column: stats.name.clone(),
                role: semantic.role(),
                semantic: Some(semantic),
                confidence: if typed {
                    CONFIDENCE_TYPED_MATCH
                } else {
                    CONFIDENCE_NAME_ONLY
                },
                reason: if typed {
                    format!("name looks like {} and values are {}", semantic, stats.data_type)
                } else {
                    format!(
                        "name looks like {} but values are {}",
                        semantic, stats.data_type
                    )
                },
            };
        }

        let (role, confidence, reason) = fallback_role(stats);
        RoleAssignment {
            column: stats.name.clone(),
            role,
            semantic: None,
            confidence,
            reason,
        }
    }
}

impl RoleInference {
    // `time_spent = 300` is a duration, `event_time = 1709287200` is not
    fn is_elapsed_time(&self, stats: &ColumnStatistics) -> bool {
        stats.data_type == DataType::Number
            && self.semantic_for(&stats.name) == Some(SemanticType::EventTimestamp)
            && self.bare_time.is_match(&normalize_column_name(&stats.name))
            && stats.numeric.as_ref().is_some_and(|n| n.min < EPOCH_FLOOR)
    }
}

fn fallback_role(stats: &ColumnStatistics) -> (ColumnRole, f64, String) {
    match stats.data_type {
        DataType::Date => (
            ColumnRole::Timestamp,
            CONFIDENCE_STATISTICS,
            "values are dates".to_string(),
        ),
        DataType::Email => (
            ColumnRole::Identifier,
            CONFIDENCE_STATISTICS,
            "values are email addresses".to_string(),
        ),
        DataType::Number => (
            ColumnRole::Metric,
            CONFIDENCE_STATISTICS,
            "values are numeric".to_string(),
        ),
        DataType::String
            if stats.non_null_count() >= 10 && stats.unique_percentage >= 95.0 =>
        {
            (
                ColumnRole::Identifier,
                CONFIDENCE_STATISTICS,
                format!("{:.0}% of values are unique", stats.unique_percentage),
            )
        }
        DataType::String | DataType::Boolean | DataType::Url => (
            ColumnRole::Dimension,
            CONFIDENCE_STATISTICS,
            format!("{} values with {} distinct", stats.data_type, stats.unique_count),
        ),
        DataType::Unknown => (
            ColumnRole::Dimension,
            CONFIDENCE_UNKNOWN,
            "no values to inspect".to_string(),
        ),
    }
}

/// `eventTimestamp`, `Event Timestamp` and `event-timestamp` all become `event_timestamp`.
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for ch in name.trim().chars() {
        if matches!(ch, ' ' | '-' | '.' | '/' | '_') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            if ch.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
                && !out.ends_with('_')
            {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        }
        prev = Some(ch);
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures;
    use crate::domain::profile::ColumnAnalyzer;
    use crate::domain::project::AnalysisSettings;
    use anyhow::Result;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("eventTimestamp"), "event_timestamp");
        assert_eq!(normalize_column_name("sessionID"), "session_id");
        assert_eq!(normalize_column_name("Event Name"), "event_name");
        assert_eq!(normalize_column_name("  user-id "), "user_id");
        assert_eq!(normalize_column_name("ARPU"), "arpu");
        assert_eq!(normalize_column_name("level2Score"), "level2_score");
    }

    #[test]
    fn test_semantic_name_matching() -> Result<()> {
        let inference = RoleInference::new()?;
        let cases = [
            ("userId", SemanticType::UserId),
            ("player_id", SemanticType::UserId),
            ("sessionID", SemanticType::SessionId),
            ("eventTimestamp", SemanticType::EventTimestamp),
            ("created_at", SemanticType::EventTimestamp),
            ("arrival_ts", SemanticType::EventTimestamp),
            ("eventName", SemanticType::EventName),
            ("revenue_usd", SemanticType::Revenue),
            ("currency", SemanticType::Currency),
            ("level_number", SemanticType::Level),
            ("highScore", SemanticType::Score),
            ("session_length", SemanticType::Duration),
            ("item_count", SemanticType::Quantity),
            ("sku", SemanticType::ItemId),
            ("country_code", SemanticType::Country),
            ("platform", SemanticType::Platform),
            ("device_model", SemanticType::Device),
            ("clientVersion", SemanticType::AppVersion),
            ("transaction_id", SemanticType::GenericId),
        ];
        for (name, expected) in cases {
            assert_eq!(inference.semantic_for(name), Some(expected), "{}", name);
        }
        assert_eq!(inference.semantic_for("notes"), None);
        Ok(())
    }

    #[test]
    fn test_roles_on_game_export() -> Result<()> {
        let ds = fixtures::game_events();
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(&ds);
        let roles = RoleInference::new()?.infer(&columns);

        let by_name = |n: &str| roles.iter().find(|r| r.column == n).cloned();
        let user = by_name("userId").ok_or_else(|| anyhow::anyhow!("userId missing"))?;
        assert_eq!(user.role, ColumnRole::Identifier);
        assert_eq!(user.confidence, 0.9);

        let ts = by_name("eventTimestamp").ok_or_else(|| anyhow::anyhow!("ts missing"))?;
        assert_eq!(ts.role, ColumnRole::Timestamp);

        let revenue = by_name("revenue").ok_or_else(|| anyhow::anyhow!("revenue missing"))?;
        assert_eq!(revenue.role, ColumnRole::Metric);
        assert_eq!(revenue.semantic, Some(SemanticType::Revenue));

        let platform = by_name("platform").ok_or_else(|| anyhow::anyhow!("platform missing"))?;
        assert_eq!(platform.role, ColumnRole::Dimension);
        Ok(())
    }

    #[test]
    fn test_name_match_with_wrong_type_lowers_confidence() -> Result<()> {
        let ds = fixtures::from_columns("t", &[("revenue", &["free", "paid", "free"])]);
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(&ds);
        let role = RoleInference::new()?.infer_column(&columns[0]);
        assert_eq!(role.role, ColumnRole::Metric);
        assert_eq!(role.confidence, 0.6);
        Ok(())
    }

    #[test]
    fn test_numeric_time_columns_are_durations() -> Result<()> {
        let ds = fixtures::from_columns(
            "t",
            &[
                ("time_spent", &["120", "300", "45"]),
                ("sessionTime", &["60", "90"]),
                ("event_time", &["1709287200", "1709290800"]),
                ("login_time", &["2024-03-01", "2024-03-02"]),
                ("timestamp", &["12", "13"]),
            ],
        );
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(&ds);
        let roles = RoleInference::new()?.infer(&columns);
        let semantic_of = |n: &str| roles.iter().find(|r| r.column == n).and_then(|r| r.semantic);

        assert_eq!(semantic_of("time_spent"), Some(SemanticType::Duration));
        assert_eq!(semantic_of("sessionTime"), Some(SemanticType::Duration));
        assert_eq!(semantic_of("event_time"), Some(SemanticType::EventTimestamp));
        assert_eq!(semantic_of("login_time"), Some(SemanticType::EventTimestamp));
        assert_eq!(semantic_of("timestamp"), Some(SemanticType::EventTimestamp));

        let spent = roles.iter().find(|r| r.column == "time_spent").map(|r| r.role);
        assert_eq!(spent, Some(ColumnRole::Metric));
        Ok(())
    }

    #[test]
    fn test_statistics_fallback() -> Result<()> {
        let unique: Vec<String> = (0..12).map(|i| format!("tok-{i}")).collect();
        let unique_refs: Vec<&str> = unique.iter().map(String::as_str).collect();
        let ds = fixtures::from_columns(
            "t",
            &[
                ("when", &["2024-01-01", "2024-01-02"]),
                ("contact", &["a@b.io", "c@d.io"]),
                ("mystery", &["3", "4"]),
                ("flag", &["yes", "no"]),
                ("token", unique_refs.as_slice()),
                ("blank", &["", ""]),
            ],
        );
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(&ds);
        let roles = RoleInference::new()?.infer(&columns);
        let role_of = |n: &str| roles.iter().find(|r| r.column == n).map(|r| r.role);

        assert_eq!(role_of("when"), Some(ColumnRole::Timestamp));
        assert_eq!(role_of("contact"), Some(ColumnRole::Identifier));
        assert_eq!(role_of("mystery"), Some(ColumnRole::Metric));
        assert_eq!(role_of("flag"), Some(ColumnRole::Dimension));
        assert_eq!(role_of("token"), Some(ColumnRole::Identifier));
        assert_eq!(role_of("blank"), Some(ColumnRole::Dimension));
        Ok(())
    }
}
