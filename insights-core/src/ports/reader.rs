// insights-core/src/ports/reader.rs

// Ce que l'application attend d'une source de données, sans savoir comment elle est lue.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::dataset::Dataset;
use crate::error::InsightsError;

#[async_trait]
pub trait DatasetReader: Send + Sync {
    /// Loads `path` as text cells, sampled to the reader's row limit.
    async fn read(&self, path: &Path) -> Result<Dataset, InsightsError>;

    /// Whether this reader knows the file's format.
    fn supports(&self, path: &Path) -> bool;
}
