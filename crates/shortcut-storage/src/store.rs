//! JSON file store
//!
//! Every read goes to disk and every write replaces the whole file. A missing or
//! unparseable file is replaced by the default document.

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::document::ConfigDocument;
use crate::error::StorageError;
use crate::Result;

pub struct ConfigStore {
    path: PathBuf,
    /// Fixed for the lifetime of the store so repeated loads agree with each other
    defaults: ConfigDocument,
    /// Serializes load-mutate-save cycles; shared between clones
    lock: Arc<Mutex<()>>,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            defaults: ConfigDocument::seeded(Utc::now()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn defaults(&self) -> &ConfigDocument {
        &self.defaults
    }

    /// Read the document, seeding the file with defaults when it is missing or unusable
    pub fn load(&self) -> ConfigDocument {
        let _guard = self.lock.lock();
        self.load_unlocked()
    }

    /// Write the document, reporting success instead of failing
    pub fn save(&self, doc: &ConfigDocument) -> bool {
        match self.try_save(doc) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to save configuration"
                );
                false
            }
        }
    }

    pub fn try_save(&self, doc: &ConfigDocument) -> Result<()> {
        let _guard = self.lock.lock();
        self.write_unlocked(doc)
    }

    /// Load, mutate and save as one step.
    ///
    /// Nothing is written when `f` fails.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut ConfigDocument) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let _guard = self.lock.lock();
        let mut doc = self.load_unlocked();
        let value = f(&mut doc)?;
        self.write_unlocked(&doc)?;
        Ok(value)
    }

    fn load_unlocked(&self) -> ConfigDocument {
        match self.read_unlocked() {
            Ok(Some(doc)) => return doc,
            Ok(None) => {
                tracing::info!(
                    path = %self.path.display(),
                    "No configuration file, seeding defaults"
                );
            }
            Err(e) => {
                // TODO: copy the unreadable file aside as `<name>.corrupt` before reseeding
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read configuration, replacing with defaults"
                );
            }
        }

        if let Err(e) = self.write_unlocked(&self.defaults) {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to seed configuration"
            );
        }
        self.defaults.clone()
    }

    fn read_unlocked(&self) -> Result<Option<ConfigDocument>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Read(e.to_string())),
        };

        let stored: Value =
            serde_json::from_str(&raw).map_err(|e| StorageError::Read(e.to_string()))?;
        merge_over_defaults(&self.defaults, stored).map(Some)
    }

    fn write_unlocked(&self, doc: &ConfigDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let body = serde_json::to_vec_pretty(doc)?;

        // Rename over the target so a reader never sees a half-written file
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&body)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|e| StorageError::Persist(e.error))?;

        tracing::debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            defaults: self.defaults.clone(),
            lock: Arc::clone(&self.lock),
        }
    }
}

/// Shallow merge: every top-level key of `stored` replaces the default wholesale.
///
/// Only a non-object root is an error. A record that cannot be read is dropped with a
/// warning and the rest of the document is kept.
pub fn merge_over_defaults(defaults: &ConfigDocument, stored: Value) -> Result<ConfigDocument> {
    let Value::Object(mut stored) = stored else {
        return Err(StorageError::Read(
            "configuration root is not a JSON object".to_string(),
        ));
    };

    let mut doc = defaults.clone();
    if let Some(projects) = stored
        .remove("projects")
        .and_then(|v| decode_records("projects", v))
    {
        doc.projects = projects;
    }
    if let Some(sites) = stored
        .remove("quickAccessSites")
        .and_then(|v| decode_records("quickAccessSites", v))
    {
        doc.quick_access_sites = sites;
    }
    match stored.remove("version") {
        Some(Value::String(version)) => doc.version = version,
        Some(other) => tracing::warn!(version = %other, "Ignoring non-string schema version"),
        None => {}
    }
    doc.extra.extend(stored);

    Ok(doc)
}

/// `None` keeps the default collection
fn decode_records<T: DeserializeOwned>(key: &str, value: Value) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        tracing::warn!(key, "Stored collection is not an array, using defaults");
        return None;
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "Dropping unreadable record");
                None
            }
        })
        .collect();
    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Project;
    use serde_json::{json, Map};
    use tempfile::tempdir;

    fn sample_project() -> Project {
        let now = Utc::now();
        Project {
            id: "project_1_abcdefghi".to_string(),
            name: "Foo".to_string(),
            path: "/tmp/foo".to_string(),
            description: Some("demo".to_string()),
            command: Some("npm run dev".to_string()),
            is_running: false,
            port: None,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_first_load_seeds_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config/simple-shortcut-config.json");
        let store = ConfigStore::new(&path);

        let doc = store.load();
        assert_eq!(&doc, store.defaults());
        assert!(path.exists());

        let on_disk: ConfigDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, doc);
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        assert_eq!(store.load(), store.load());

        let mut doc = store.load();
        doc.projects.push(sample_project());
        assert!(store.save(&doc));
        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let mut doc = store.load();
        doc.projects.push(sample_project());
        doc.quick_access_sites.truncate(1);
        doc.extra.insert("theme".to_string(), json!("dark"));
        assert!(store.save(&doc));

        assert_eq!(store.load(), doc);
    }

    #[test]
    fn test_missing_keys_filled_from_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "projects": [] }"#).unwrap();

        let store = ConfigStore::new(&path);
        let doc = store.load();

        assert!(doc.projects.is_empty());
        assert_eq!(doc.quick_access_sites, store.defaults().quick_access_sites);
        assert_eq!(doc.version, store.defaults().version);
    }

    #[test]
    fn test_stored_collections_replace_defaults_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "quickAccessSites": [], "version": "0.9.0" }"#).unwrap();

        let doc = ConfigStore::new(&path).load();
        assert!(doc.quick_access_sites.is_empty());
        assert_eq!(doc.version, "0.9.0");
    }

    #[test]
    fn test_corrupt_file_is_replaced_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::new(&path);
        let doc = store.load();
        assert_eq!(&doc, store.defaults());

        let on_disk: ConfigDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&on_disk, store.defaults());
    }

    #[test]
    fn test_mismatched_record_keeps_the_rest_of_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "projects": [
                    {
                        "id": "project_1_abcdefghi",
                        "name": "Foo",
                        "path": "/tmp/foo",
                        "port": 70000,
                        "createdAt": "2024-05-01T10:00:00.000Z"
                    },
                    { "name": "no id" },
                    42
                ],
                "quickAccessSites": [
                    { "id": "docs", "name": "Docs", "url": "https://docs.rs", "description": null }
                ],
                "version": 2,
                "theme": "dark"
            }"#,
        )
        .unwrap();

        let store = ConfigStore::new(&path);
        let doc = store.load();

        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.projects[0].id, "project_1_abcdefghi");
        assert_eq!(doc.projects[0].port, None);
        assert_eq!(doc.quick_access_sites.len(), 1);
        assert_eq!(doc.quick_access_sites[0].description, "");
        assert_eq!(doc.version, store.defaults().version);
        assert_eq!(doc.extra.get("theme"), Some(&json!("dark")));

        // Loading alone never rewrites a readable file
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("project_1_abcdefghi"));
        assert!(raw.contains("no id"));
    }

    #[test]
    fn test_non_array_collection_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "projects": null, "quickAccessSites": "oops" }"#).unwrap();

        let store = ConfigStore::new(&path);
        let doc = store.load();
        assert!(doc.projects.is_empty());
        assert_eq!(doc.quick_access_sites, store.defaults().quick_access_sites);
    }

    #[test]
    fn test_non_object_root_is_treated_as_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = ConfigStore::new(&path);
        assert_eq!(&store.load(), store.defaults());
    }

    #[test]
    fn test_pretty_printed_with_two_spaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);
        store.load();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n  \"projects\""));
    }

    #[test]
    fn test_save_failure_reports_false() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let store = ConfigStore::new(blocker.join("config.json"));
        assert!(!store.save(&ConfigDocument::seeded(Utc::now())));
        assert!(store.try_save(&ConfigDocument::seeded(Utc::now())).is_err());
    }

    #[test]
    fn test_failed_transaction_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);
        store.load();
        let before = fs::read_to_string(&path).unwrap();

        let result: std::result::Result<(), StorageError> = store.transaction(|doc| {
            doc.projects.push(sample_project());
            Err(StorageError::Read("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
