//! JSON export of a solver result.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::schema::ResultModel;

/// File name used when exporting into a directory.
pub const EXPORT_FILE_NAME: &str = "resultados_ejemplo.json";

/// Export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No result to export yet")]
    NoResult,
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pretty-printed JSON in the solver's own field layout.
pub fn to_json(result: &ResultModel) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Same as [`to_json`], for an optional result.
pub fn current_to_json(result: Option<&ResultModel>) -> Result<String, ExportError> {
    to_json(result.ok_or(ExportError::NoResult)?)
}

/// Write a result to `target`. A directory gets [`EXPORT_FILE_NAME`] inside it.
pub fn write_json<P: AsRef<Path>>(target: P, result: &ResultModel) -> Result<PathBuf, ExportError> {
    let target = target.as_ref();
    let path = if target.is_dir() {
        target.join(EXPORT_FILE_NAME)
    } else {
        target.to_path_buf()
    };

    let json = to_json(result)?;
    fs::write(&path, json).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("Exported result to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SelectedAllocation;
    use tempfile::tempdir;

    fn sample() -> ResultModel {
        ResultModel {
            best_benefit: 180.0,
            best_area: 0.72,
            area_utilization_percent: 1.44,
            selected: vec![SelectedAllocation::new("Lavadora", 0.36, 2)],
            placements: None,
            fitness_history: vec![120.0, 180.0],
        }
    }

    #[test]
    fn test_json_uses_solver_field_names() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["mejor_beneficio"], 180.0);
        assert_eq!(json["articulos_seleccionados"][0]["nombre"], "Lavadora");
        assert_eq!(json["articulos_seleccionados"][0]["cantidad"], 2);
        assert_eq!(json["historial"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_into_directory() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), &sample()).unwrap();
        assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));

        let read: ResultModel = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, sample());
    }

    #[test]
    fn test_write_to_file_path() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("run.json");
        assert_eq!(write_json(&target, &sample()).unwrap(), target);
        assert!(target.exists());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("run.json");
        assert!(matches!(
            write_json(&target, &sample()),
            Err(ExportError::Io { .. })
        ));
    }

    #[test]
    fn test_no_result() {
        assert!(matches!(current_to_json(None), Err(ExportError::NoResult)));
        assert!(current_to_json(Some(&sample())).is_ok());
    }
}
