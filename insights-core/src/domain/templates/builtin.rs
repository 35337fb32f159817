// insights-core/src/domain/templates/builtin.rs

use crate::domain::roles::SemanticType::{self, *};
use crate::domain::templates::{EngineTemplate, TemplateField};

struct Builtin {
    id: &'static str,
    name: &'static str,
    engine: &'static str,
    description: &'static str,
    required: &'static [SemanticType],
    optional: &'static [SemanticType],
    hints: &'static [&'static str],
}

const CATALOGUE: [Builtin; 6] = [
    Builtin {
        id: "unity_analytics",
        name: "Unity Analytics",
        engine: "Unity",
        description: "Raw event export from Unity Gaming Services analytics",
        required: &[UserId, EventName, EventTimestamp],
        optional: &[SessionId, Platform, AppVersion, Country, Device],
        hints: &[
            "userId",
            "sessionID",
            "eventName",
            "eventTimestamp",
            "platform",
            "clientVersion",
            "userCountry",
            "deviceModel",
        ],
    },
    Builtin {
        id: "unreal_insights",
        name: "Unreal Engine Analytics",
        engine: "Unreal",
        description: "Events recorded through the Unreal analytics provider interface",
        required: &[UserId, EventName, EventTimestamp],
        optional: &[SessionId, Level, Duration, Platform],
        hints: &["PlayerId", "SessionId", "EventName", "Timestamp", "MapName", "BuildVersion"],
    },
    Builtin {
        id: "godot_events",
        name: "Godot Event Log",
        engine: "Godot",
        description: "Custom gameplay events logged from a Godot project",
        required: &[EventName, EventTimestamp],
        optional: &[UserId, Level, Score, Duration],
        hints: &["event", "time", "player", "scene", "score"],
    },
    Builtin {
        id: "gameanalytics",
        name: "GameAnalytics",
        engine: "GameAnalytics",
        description: "Raw data export from the GameAnalytics SDK",
        required: &[UserId, SessionId, EventName],
        optional: &[
            EventTimestamp,
            Platform,
            Country,
            Device,
            AppVersion,
            Revenue,
            Currency,
        ],
        hints: &[
            "user_id",
            "session_id",
            "category",
            "event_id",
            "platform",
            "country_code",
            "device",
            "build",
            "amount",
            "currency",
        ],
    },
    Builtin {
        id: "monetization",
        name: "Monetization",
        engine: "Generic",
        description: "In-app purchases and store transactions",
        required: &[UserId, Revenue],
        optional: &[Currency, ItemId, Quantity, EventTimestamp, Country],
        hints: &["transaction_id", "price", "currency", "product_id", "quantity"],
    },
    Builtin {
        id: "progression",
        name: "Progression",
        engine: "Generic",
        description: "Level starts, completions and failures",
        required: &[UserId, Level],
        optional: &[Score, Duration, EventTimestamp, SessionId],
        hints: &["level", "score", "stars", "attempts", "status"],
    },
];

pub fn builtin_templates() -> Vec<EngineTemplate> {
    CATALOGUE
        .iter()
        .map(|builtin| {
            let fields = builtin
                .required
                .iter()
                .map(|s| TemplateField {
                    semantic: *s,
                    required: true,
                })
                .chain(builtin.optional.iter().map(|s| TemplateField {
                    semantic: *s,
                    required: false,
                }))
                .collect();
            EngineTemplate {
                id: builtin.id.to_string(),
                name: builtin.name.to_string(),
                engine: builtin.engine.to_string(),
                description: builtin.description.to_string(),
                fields,
                column_hints: builtin.hints.iter().map(|h| h.to_string()).collect(),
            }
        })
        .collect()
}
