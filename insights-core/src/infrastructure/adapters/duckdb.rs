// insights-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::path::Path;
use tracing::{debug, instrument};

use crate::domain::dataset::Dataset;
use crate::error::InsightsError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::reader::DatasetReader;

const TABLE: &str = "upload";

/// File formats DuckDB can load for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }

    fn scan_expr(&self, path: &str) -> String {
        // Chemin en littéral SQL : on double les apostrophes
        let path = path.replace('\'', "''");
        match self {
            Self::Csv => format!("read_csv('{}', header = true, all_varchar = true)", path),
            Self::Tsv => format!(
                "read_csv('{}', header = true, all_varchar = true, delim = '\\t')",
                path
            ),
            Self::Json => format!("read_json_auto('{}')", path),
            Self::Ndjson => format!("read_json_auto('{}', format = 'newline_delimited')", path),
            Self::Parquet => format!("read_parquet('{}')", path),
        }
    }
}

/// Reads upload files through an in-memory DuckDB, one connection per file.
pub struct DuckDbReader {
    max_rows: usize,
}

impl DuckDbReader {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    fn load_blocking(path: &Path, max_rows: usize) -> Result<Dataset, InsightsError> {
        let format = SourceFormat::from_path(path)
            .ok_or_else(|| InfrastructureError::UnsupportedFormat(path.display().to_string()))?;
        if !path.is_file() {
            return Err(InfrastructureError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ))
            .into());
        }

        let conn = Connection::open_in_memory_with_flags(Config::default())
            .map_err(InfrastructureError::from)?;
        let path_str = path.to_string_lossy();

        conn.execute_batch(&format!(
            "CREATE TABLE {} AS SELECT * FROM {}",
            TABLE,
            format.scan_expr(&path_str)
        ))
        .map_err(InfrastructureError::from)?;

        let headers = Self::column_names(&conn)?;
        let total_rows: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", TABLE), [], |row| row.get(0))
            .map_err(InfrastructureError::from)?;

        let projection = headers
            .iter()
            .map(|h| format!("CAST(\"{}\" AS VARCHAR)", h.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(", ");

        let mut rows = Vec::with_capacity(max_rows.min(total_rows.max(0) as usize));
        if !headers.is_empty() {
            let mut stmt = conn
                .prepare(&format!("SELECT {} FROM {} LIMIT {}", projection, TABLE, max_rows))
                .map_err(InfrastructureError::from)?;
            let mut result = stmt.query([]).map_err(InfrastructureError::from)?;
            while let Some(row) = result.next().map_err(InfrastructureError::from)? {
                let mut cells = Vec::with_capacity(headers.len());
                for i in 0..headers.len() {
                    cells.push(row.get::<_, Option<String>>(i).map_err(InfrastructureError::from)?);
                }
                rows.push(cells);
            }
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        let mut dataset = Dataset::from_rows(name, headers, rows)?;
        dataset.total_rows = total_rows.max(0) as usize;
        debug!(
            rows = dataset.row_count(),
            total = dataset.total_rows,
            columns = dataset.column_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    fn column_names(conn: &Connection) -> Result<Vec<String>, InfrastructureError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", TABLE))?;
        let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
        let mut headers = Vec::new();
        for name in names {
            headers.push(name?);
        }
        Ok(headers)
    }
}

#[async_trait]
impl DatasetReader for DuckDbReader {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn read(&self, path: &Path) -> Result<Dataset, InsightsError> {
        let path = path.to_path_buf();
        let max_rows = self.max_rows;
        tokio::task::spawn_blocking(move || Self::load_blocking(&path, max_rows))
            .await
            .map_err(|e| InsightsError::InternalError(format!("Reader task failed: {}", e)))?
    }

    fn supports(&self, path: &Path) -> bool {
        SourceFormat::from_path(path).is_some()
    }
}
