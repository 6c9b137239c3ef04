//! App-level genesis document and its file helpers.

use std::collections::BTreeMap;
use std::path::Path;

use realfin_core::ModuleError;

/// The app genesis document: module name → raw genesis section.
///
/// A `BTreeMap` keeps the serialized document key-sorted, so exports are
/// canonical.
pub type GenesisDoc = BTreeMap<String, serde_json::Value>;

/// Read a genesis document from a JSON file.
///
/// # Errors
///
/// [`ModuleError::Internal`] when the file cannot be read;
/// [`ModuleError::InvalidArgument`] when its contents are not a valid
/// document.
pub fn load_file(path: &Path) -> Result<GenesisDoc, ModuleError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ModuleError::Internal(anyhow::anyhow!("reading genesis {path:?}: {e}")))?;
    serde_json::from_str(&raw)
        .map_err(|e| ModuleError::InvalidArgument(format!("genesis document: {e}")))
}

/// Write a genesis document to a JSON file, pretty-printed.
///
/// # Errors
///
/// [`ModuleError::Internal`] when serialization or the write fails.
pub fn save_file(path: &Path, doc: &GenesisDoc) -> Result<(), ModuleError> {
    let raw = serde_json::to_string_pretty(doc)
        .map_err(|e| ModuleError::Internal(anyhow::Error::new(e)))?;
    std::fs::write(path, raw)
        .map_err(|e| ModuleError::Internal(anyhow::anyhow!("writing genesis {path:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");

        let mut doc = GenesisDoc::new();
        doc.insert(
            "insurance".to_string(),
            serde_json::json!({ "params": {}, "policies": [] }),
        );
        doc.insert(
            "tokenization".to_string(),
            serde_json::json!({ "params": {}, "assets": [] }),
        );

        save_file(&path, &doc).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn missing_file_is_internal() {
        let err = load_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ModuleError::Internal(_)));
    }

    #[test]
    fn malformed_json_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_file(&path).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }
}
