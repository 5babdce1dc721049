//! Startup loading of mapping files.
//!
//! Every `*.json` file in the mappings directory holds one mapping document. Files are
//! registered in file-name order, so a later file shadows an earlier one with the same
//! request criteria.

use crate::mapping::{MappingDefinition, MappingDocument, MappingStore};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Register every mapping file in `dir`. Returns the number of mappings loaded.
///
/// A file that cannot be read or parsed is skipped with a warning.
pub fn load_mappings_dir(dir: &Path, store: &MappingStore) -> anyhow::Result<usize> {
    let files = collect_mapping_files(dir)
        .with_context(|| format!("Failed to read mappings directory {}", dir.display()))?;

    let mut loaded = 0;
    for path in &files {
        match load_mapping_file(path) {
            Ok(definition) => {
                let handle = store.insert(definition);
                debug!(
                    file = %path.display(),
                    sequence = handle.sequence,
                    "Loaded mapping file"
                );
                loaded += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), "Skipping mapping file: {:#}", e);
            }
        }
    }

    info!(
        "Loaded {} of {} mapping files from {}",
        loaded,
        files.len(),
        dir.display()
    );
    Ok(loaded)
}

fn collect_mapping_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn load_mapping_file(path: &Path) -> anyhow::Result<MappingDefinition> {
    let content = std::fs::read(path)?;
    Ok(MappingDocument::parse(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{find_match, RequestDescriptor};
    use std::fs;
    use tracing_test::traced_test;

    const CANNED: &str = r#"{
        "request": { "method": "GET", "url": "/canned/resource" },
        "response": {
            "status": 200,
            "body": "{\"somekey\": \"My value\"}",
            "headers": { "Content-Type": "application/json" }
        }
    }"#;

    #[test]
    fn test_load_mappings_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("canned.json"), CANNED).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a mapping").unwrap();

        let store = MappingStore::new();
        let loaded = load_mappings_dir(dir.path(), &store).unwrap();
        assert_eq!(loaded, 1);

        let snapshot = store.all_mappings();
        let request = RequestDescriptor::new("GET", "/canned/resource");
        let mapping = find_match(&request, &snapshot).unwrap();
        assert_eq!(mapping.response().body(), Some("{\"somekey\": \"My value\"}"));
    }

    #[test]
    #[traced_test]
    fn test_invalid_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a-broken.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("b-invalid.json"),
            r#"{"request": {"url": ""}, "response": {"status": 200}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("c-canned.json"), CANNED).unwrap();

        let store = MappingStore::new();
        assert_eq!(load_mappings_dir(dir.path(), &store).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(logs_contain("Skipping mapping file"));
        assert!(logs_contain("a-broken.json"));
    }

    #[test]
    fn test_files_load_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, status) in [("20-second.json", 202), ("10-first.json", 201)] {
            let json = format!(
                r#"{{"request": {{"url": "/ordered"}}, "response": {{"status": {status}}}}}"#
            );
            fs::write(dir.path().join(name), json).unwrap();
        }

        let store = MappingStore::new();
        load_mappings_dir(dir.path(), &store).unwrap();

        let snapshot = store.all_mappings();
        let statuses: Vec<u16> = snapshot
            .iter()
            .map(|m| m.response().status().as_u16())
            .collect();
        assert_eq!(statuses, vec![201, 202]);

        // The later file wins
        let request = RequestDescriptor::new("GET", "/ordered");
        let mapping = find_match(&request, &snapshot).unwrap();
        assert_eq!(mapping.response().status().as_u16(), 202);
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let store = MappingStore::new();
        assert!(load_mappings_dir(Path::new("/definitely/not/here"), &store).is_err());
    }
}
