// insights-core/src/domain/profile/analyzer.rs

use std::collections::HashMap;

use crate::domain::dataset::{Column, Dataset};
use crate::domain::error::DomainError;
use crate::domain::profile::detector::TypeDetector;
use crate::domain::profile::types::{
    ColumnStatistics, DataType, NumericSummary, ValueFrequency, percentage,
};
use crate::domain::project::AnalysisSettings;

pub struct ColumnAnalyzer {
    detector: TypeDetector,
    top_n: usize,
    sample_size: usize,
}

impl ColumnAnalyzer {
    pub fn new(settings: &AnalysisSettings) -> Result<Self, DomainError> {
        Ok(Self {
            detector: TypeDetector::new()?,
            top_n: settings.top_n,
            sample_size: settings.sample_values,
        })
    }

    pub fn analyze(&self, dataset: &Dataset) -> Vec<ColumnStatistics> {
        dataset
            .columns
            .iter()
            .map(|c| self.analyze_column(c))
            .collect()
    }

    pub fn analyze_column(&self, column: &Column) -> ColumnStatistics {
        let total_count = column.values.len();
        let present: Vec<&str> = column.present_values().collect();
        let null_count = total_count - present.len();

        // Un seul passage : fréquences, échantillons, types
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(present.len());
        let mut samples: Vec<String> = Vec::with_capacity(self.sample_size);
        let mut tallies: HashMap<DataType, usize> = HashMap::new();

        for &value in &present {
            let seen = counts.entry(value).or_insert(0);
            *seen += 1;
            if *seen == 1 && samples.len() < self.sample_size {
                samples.push(value.to_string());
            }
            *tallies.entry(self.detector.classify(value)).or_insert(0) += 1;
        }

        let (data_type, dominant) = tallies
            .into_iter()
            .max_by(|(ta, ca), (tb, cb)| ca.cmp(cb).then(ta.cmp(tb)))
            .unwrap_or((DataType::Unknown, 0));

        let type_consistency = if present.is_empty() {
            1.0
        } else {
            dominant as f64 / present.len() as f64
        };

        let numeric = if data_type == DataType::Number {
            let values: Vec<f64> = present
                .iter()
                .filter_map(|v| TypeDetector::parse_number(v))
                .collect();
            summarize_numeric(values)
        } else {
            None
        };

        ColumnStatistics {
            name: column.name.clone(),
            data_type,
            total_count,
            null_count,
            null_percentage: percentage(null_count, total_count),
            unique_count: counts.len(),
            unique_percentage: percentage(counts.len(), present.len()),
            sample_values: samples,
            numeric,
            distribution: top_values(counts, present.len(), self.top_n),
            type_consistency,
        }
    }
}

fn top_values(counts: HashMap<&str, usize>, non_null: usize, top_n: usize) -> Vec<ValueFrequency> {
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_unstable_by(|(va, ca), (vb, cb)| cb.cmp(ca).then_with(|| va.cmp(vb)));
    entries
        .into_iter()
        .take(top_n)
        .map(|(value, count)| ValueFrequency {
            value: value.to_string(),
            count,
            percentage: percentage(count, non_null),
        })
        .collect()
}

/// Linear interpolation between closest ranks, `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn summarize_numeric(mut values: Vec<f64>) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let mean = sum / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let median = quantile(&values, 0.5);

    let outlier_count = if values.len() >= 4 {
        let q1 = quantile(&values, 0.25);
        let q3 = quantile(&values, 0.75);
        let fence = 1.5 * (q3 - q1);
        values
            .iter()
            .filter(|v| **v < q1 - fence || **v > q3 + fence)
            .count()
    } else {
        0
    };

    Some(NumericSummary {
        min: values[0],
        max: values[values.len() - 1],
        mean,
        median,
        sum,
        std_dev: variance.sqrt(),
        outlier_count,
    })
}
