// insights-core/src/infrastructure/fs.rs

use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;
use std::path::Path;

use crate::infrastructure::error::InfrastructureError;

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses filesystems: readers see either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty JSON, written atomically.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), InfrastructureError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json)
}

/// Missing file -> `T::default()`. A corrupt file is an error, not a reset.
pub fn load_json_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, InfrastructureError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(InfrastructureError::Io(e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file_and_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("reports/nested/test.txt");

        atomic_write(&file_path, "Hello, World!")?;
        assert_eq!(fs::read_to_string(file_path)?, "Hello, World!");
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        assert_eq!(fs::read_to_string(file_path)?, "Updated");
        Ok(())
    }

    #[test]
    fn test_json_round_trip_and_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");

        let empty: BTreeMap<String, f64> = load_json_or_default(&path)?;
        assert!(empty.is_empty());

        let data = BTreeMap::from([("row_count".to_string(), 6.0)]);
        save_json(&path, &data)?;
        let loaded: BTreeMap<String, f64> = load_json_or_default(&path)?;
        assert_eq!(loaded, data);
        Ok(())
    }

    #[test]
    fn test_corrupt_json_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json")?;
        let res: Result<BTreeMap<String, f64>, _> = load_json_or_default(&path);
        assert!(matches!(res, Err(InfrastructureError::JsonError(_))));
        Ok(())
    }
}
