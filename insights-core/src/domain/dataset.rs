// insights-core/src/domain/dataset.rs

use crate::domain::error::DomainError;
use serde::Serialize;
use std::collections::HashSet;

/// Raw tabular data as uploaded. Cells are kept as text; typing is the job of
/// the profiler.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<Column>,
    /// Rows in the source file. Can exceed `row_count()` when the reader sampled.
    pub total_rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(skip)]
    pub values: Vec<Option<String>>,
}

const NULL_TOKENS: [&str; 4] = ["null", "undefined", "nan", "n/a"];

/// `None`, blank strings and the usual textual null markers.
pub fn is_null_like(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Non-null cells, trimmed, in row order.
    pub fn present_values(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|v| !is_null_like(v.as_deref()))
            .filter_map(|v| v.as_deref().map(str::trim))
    }
}

impl Dataset {
    /// Builds a column-oriented dataset from row-oriented records.
    /// Short rows are padded with nulls; rows wider than the header are rejected.
    pub fn from_rows(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, DomainError> {
        let name = name.into();

        let mut seen = HashSet::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header.trim().is_empty() {
                return Err(DomainError::SchemaError(format!(
                    "Column {} of dataset '{}' has no name",
                    idx + 1,
                    name
                )));
            }
            if !seen.insert(header.as_str()) {
                return Err(DomainError::SchemaError(format!(
                    "Duplicate column '{}' in dataset '{}'",
                    header, name
                )));
            }
        }

        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|h| Column::new(h, Vec::with_capacity(rows.len())))
            .collect();

        let total_rows = rows.len();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() > columns.len() {
                return Err(DomainError::SchemaError(format!(
                    "Row {} of '{}' has {} cells but only {} columns",
                    idx + 1,
                    name,
                    row.len(),
                    columns.len()
                )));
            }
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().flatten());
            }
        }

        Ok(Self {
            name,
            columns,
            total_rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows that repeat an earlier row exactly.
    pub fn duplicate_row_count(&self) -> usize {
        let rows = self.row_count();
        let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(rows);
        let mut duplicates = 0;

        for i in 0..rows {
            let key: Vec<Option<&str>> = self
                .columns
                .iter()
                .map(|c| c.values.get(i).and_then(|v| v.as_deref()))
                .collect();
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        duplicates
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Dataset;

    /// Small "Unity-like" export used across the domain tests.
    pub fn game_events() -> Dataset {
        let headers = ["userId", "sessionId", "eventName", "eventTimestamp", "revenue", "platform"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let raw = [
            ["u1", "s1", "session_start", "2024-03-01T10:00:00Z", "0", "ios"],
            ["u1", "s1", "purchase", "2024-03-01T10:05:00Z", "4.99", "ios"],
            ["u2", "s2", "session_start", "2024-03-01T11:00:00Z", "0", "android"],
            ["u2", "s2", "level_up", "2024-03-01T11:10:00Z", "", "android"],
            ["u3", "s3", "session_start", "2024-03-02T09:00:00Z", "0", "ios"],
            ["u3", "s3", "purchase", "2024-03-02T09:30:00Z", "9.99", "ios"],
        ];
        let rows = raw
            .iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect();

        Dataset::from_rows("events", headers, rows).unwrap_or_default()
    }

    pub fn from_columns(name: &str, columns: &[(&str, &[&str])]) -> Dataset {
        let headers = columns.iter().map(|(h, _)| h.to_string()).collect();
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let rows = (0..height)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, v)| v.get(i).map(|s| s.to_string()))
                    .collect()
            })
            .collect();
        Dataset::from_rows(name, headers, rows).unwrap_or_default()
    }
}
