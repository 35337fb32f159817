// insights-core/src/domain/profile/detector.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::domain::error::DomainError;
use crate::domain::profile::types::DataType;

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Classifies single cell values. Regexes are compiled once, at construction.
pub struct TypeDetector {
    email: Regex,
    url: Regex,
    date_shape: Regex,
}

fn compile(name: &str, pattern: &str) -> Result<Regex, DomainError> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl TypeDetector {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            email: compile("email", r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")?,
            url: compile("url", r"(?i)^(https?://|www\.)\S+$")?,
            // Cheap shape check before handing over to chrono
            date_shape: compile(
                "date",
                r"^(\d{4}[-/]\d{1,2}[-/]\d{1,2}([Tt ]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?([Zz]|[+-]\d{2}(:?\d{2})?)?)?|\d{1,2}[/.]\d{1,2}[/.]\d{4})$",
            )?,
        })
    }

    /// Type of a single, already trimmed, non-null value.
    pub fn classify(&self, value: &str) -> DataType {
        if Self::is_boolean(value) {
            DataType::Boolean
        } else if Self::parse_number(value).is_some() {
            DataType::Number
        } else if self.email.is_match(value) {
            DataType::Email
        } else if self.url.is_match(value) {
            DataType::Url
        } else if self.is_date(value) {
            DataType::Date
        } else {
            DataType::String
        }
    }

    pub fn is_boolean(value: &str) -> bool {
        ["true", "false", "yes", "no"]
            .iter()
            .any(|b| value.eq_ignore_ascii_case(b))
    }

    pub fn parse_number(value: &str) -> Option<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    pub fn is_date(&self, value: &str) -> bool {
        if !self.date_shape.is_match(value) {
            return false;
        }
        if DateTime::parse_from_rfc3339(value).is_ok()
            || DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%z").is_ok()
            || DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%#z").is_ok()
        {
            return true;
        }
        DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(value, f).is_ok())
            || DATE_FORMATS
                .iter()
                .any(|f| NaiveDate::parse_from_str(value, f).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_classify_scalars() -> Result<()> {
        let d = TypeDetector::new()?;
        assert_eq!(d.classify("TRUE"), DataType::Boolean);
        assert_eq!(d.classify("no"), DataType::Boolean);
        assert_eq!(d.classify("42"), DataType::Number);
        assert_eq!(d.classify("-3.5e2"), DataType::Number);
        assert_eq!(d.classify("player@studio.io"), DataType::Email);
        assert_eq!(d.classify("https://store.example.com/item/1"), DataType::Url);
        assert_eq!(d.classify("www.example.com"), DataType::Url);
        assert_eq!(d.classify("level_up"), DataType::String);
        Ok(())
    }

    #[test]
    fn test_classify_dates() -> Result<()> {
        let d = TypeDetector::new()?;
        for value in [
            "2024-03-01",
            "2024/03/01",
            "03/01/2024",
            "01.03.2024",
            "2024-03-01T10:00:00Z",
            "2024-03-01T10:00:00.123+02:00",
            "2024-03-01 10:00:00",
            "2024-03-01 10:00",
            "2024-03-01 10:00:00+00",
        ] {
            assert_eq!(d.classify(value), DataType::Date, "{}", value);
        }
        Ok(())
    }

    #[test]
    fn test_impossible_dates_are_strings() -> Result<()> {
        let d = TypeDetector::new()?;
        assert_eq!(d.classify("2024-13-45"), DataType::String);
        assert_eq!(d.classify("99/99/2024"), DataType::String);
        Ok(())
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        assert_eq!(TypeDetector::parse_number("inf"), None);
        assert_eq!(TypeDetector::parse_number("NaN"), None);
        assert_eq!(TypeDetector::parse_number(" 7 "), Some(7.0));
    }
}
