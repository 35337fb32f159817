// insights-core/src/application/batch.rs

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::application::analysis::{AnalysisReport, analyze_file};
use crate::domain::project::ProjectConfig;
use crate::error::{ErrorCategory, InsightsError};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::save_json;
use crate::ports::reader::DatasetReader;

#[derive(Debug, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
    pub category: ErrorCategory,
}

#[derive(Debug, Default, Serialize)]
pub struct ScanResult {
    /// Directory that was scanned.
    pub root: PathBuf,
    /// Sorted by path.
    pub reports: Vec<(PathBuf, AnalysisReport)>,
    pub failures: Vec<ScanFailure>,
}

impl ScanResult {
    pub fn file_count(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// Writes each report under `<target>/reports/`, mirroring the layout of the
    /// scanned directory: `2024/events.csv` -> `reports/2024/events.json`.
    /// Files sharing a stem in one folder keep their extension (`events.csv.json`).
    pub fn save_reports(&self, target_dir: &Path) -> Result<Vec<PathBuf>, InsightsError> {
        let reports_dir = target_dir.join("reports");

        let relative: Vec<PathBuf> = self
            .reports
            .iter()
            .map(|(path, _)| self.relative_path(path))
            .collect();
        let mut stems: HashMap<PathBuf, usize> = HashMap::new();
        for rel in &relative {
            *stems.entry(rel.with_extension("")).or_insert(0) += 1;
        }

        let mut saved = Vec::with_capacity(self.reports.len());
        for (rel, (_, report)) in relative.iter().zip(&self.reports) {
            let file = if stems.get(&rel.with_extension("")).copied().unwrap_or(0) > 1 {
                let mut name = rel.as_os_str().to_os_string();
                name.push(".json");
                PathBuf::from(name)
            } else {
                rel.with_extension("json")
            };
            let out = reports_dir.join(file);
            save_json(&out, report)?;
            saved.push(out);
        }
        info!(count = saved.len(), "💾 Scan reports saved");
        Ok(saved)
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            // walkdir only yields paths under the root
            Err(_) => path.file_name().map(PathBuf::from).unwrap_or_default(),
        }
    }
}

/// Analyses every supported file under `dir`, at most `concurrency` at a time.
/// A file that fails is recorded and the scan goes on.
#[instrument(skip(reader, config), fields(dir = %dir.display()))]
pub async fn scan_directory(
    dir: &Path,
    reader: &dyn DatasetReader,
    config: &ProjectConfig,
    concurrency: usize,
) -> Result<ScanResult, InsightsError> {
    if !dir.is_dir() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ))
        .into());
    }

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| reader.supports(p))
        .collect();
    info!(files = files.len(), "🔎 Scanning data directory");

    let outcomes: Vec<(PathBuf, Result<AnalysisReport, InsightsError>)> = stream::iter(files)
        .map(|path| async move {
            let res = analyze_file(reader, &path, config).await;
            (path, res)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut result = ScanResult {
        root: dir.to_path_buf(),
        ..Default::default()
    };
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => result.reports.push((path, report)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "File skipped");
                result.failures.push(ScanFailure {
                    category: e.category(),
                    error: e.to_string(),
                    path,
                });
            }
        }
    }
    result.reports.sort_by(|a, b| a.0.cmp(&b.0));
    result.failures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(result)
}
