// insights-core/src/domain/roles/mod.rs

pub mod inference;

pub use inference::{RoleInference, normalize_column_name};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::profile::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Identifier,
    Timestamp,
    Metric,
    Dimension,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Timestamp => "timestamp",
            Self::Metric => "metric",
            Self::Dimension => "dimension",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a column means in a game analytics export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    UserId,
    SessionId,
    EventName,
    EventTimestamp,
    Revenue,
    Currency,
    Level,
    Score,
    Duration,
    Quantity,
    ItemId,
    Country,
    Platform,
    Device,
    AppVersion,
    GenericId,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::SessionId => "session_id",
            Self::EventName => "event_name",
            Self::EventTimestamp => "event_timestamp",
            Self::Revenue => "revenue",
            Self::Currency => "currency",
            Self::Level => "level",
            Self::Score => "score",
            Self::Duration => "duration",
            Self::Quantity => "quantity",
            Self::ItemId => "item_id",
            Self::Country => "country",
            Self::Platform => "platform",
            Self::Device => "device",
            Self::AppVersion => "app_version",
            Self::GenericId => "generic_id",
        }
    }

    pub fn role(&self) -> ColumnRole {
        match self {
            Self::UserId | Self::SessionId | Self::ItemId | Self::GenericId => {
                ColumnRole::Identifier
            }
            Self::EventTimestamp => ColumnRole::Timestamp,
            Self::Revenue | Self::Score | Self::Duration | Self::Quantity => ColumnRole::Metric,
            Self::EventName
            | Self::Currency
            | Self::Level
            | Self::Country
            | Self::Platform
            | Self::Device
            | Self::AppVersion => ColumnRole::Dimension,
        }
    }

    /// Data types a column of this meaning is expected to have.
    pub fn accepts(&self, data_type: DataType) -> bool {
        use DataType as T;
        match self {
            Self::UserId => matches!(data_type, T::String | T::Number | T::Email),
            Self::SessionId | Self::ItemId | Self::GenericId => {
                matches!(data_type, T::String | T::Number)
            }
            Self::EventTimestamp => matches!(data_type, T::Date | T::Number),
            Self::Revenue | Self::Score | Self::Duration | Self::Quantity => data_type == T::Number,
            Self::Level | Self::AppVersion => matches!(data_type, T::String | T::Number),
            Self::EventName | Self::Currency | Self::Country | Self::Platform | Self::Device => {
                data_type == T::String
            }
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleAssignment {
    pub column: String,
    pub role: ColumnRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticType>,
    pub confidence: f64,
    pub reason: String,
}
