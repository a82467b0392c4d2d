//! Persisted free-text note.
//!
//! The note lives under a single key in a small JSON object on disk. Other
//! keys in the same file are preserved when the note is saved.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::error::InspektError;

/// Reads and writes one note string in a JSON key/value file.
///
/// # Examples
///
/// ```no_run
/// # use inspekt::notes::NoteStore;
/// # fn main() -> Result<(), inspekt::InspektError> {
/// let store = NoteStore::new("state.json", "notes");
/// store.save("Check the outdoor unit bracket")?;
/// assert_eq!(store.load()?, "Check the outdoor unit bracket");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
    key: String,
}

impl NoteStore {
    /// Creates a store for `key` in the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored note, or an empty string when nothing is stored.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not a JSON object, or holds a
    /// non-string value under the key.
    pub fn load(&self) -> Result<String, InspektError> {
        let entries = self.read_entries()?;
        match entries.get(&self.key) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(note)) => {
                trace!(key = self.key, len = note.len(); "Note loaded");
                Ok(note.clone())
            }
            Some(other) => Err(InspektError::Notes(format!(
                "value under `{}` is not a string: {other}",
                self.key
            ))),
        }
    }

    /// Stores `note`, keeping any other keys in the file.
    ///
    /// # Errors
    ///
    /// Fails when the existing file is unreadable or the new content cannot
    /// be written.
    pub fn save(&self, note: &str) -> Result<(), InspektError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(note.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|err| InspektError::Notes(err.to_string()))?;
        fs::write(&self.path, content)?;

        debug!(key = self.key, path:? = self.path; "Note saved");
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>, InspektError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(InspektError::Notes(format!(
                "`{}` does not hold a JSON object",
                self.path.display()
            ))),
            Err(err) => Err(InspektError::Notes(format!(
                "`{}` is not valid JSON: {err}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("missing.json"), "notes");
        assert_eq!(store.load().unwrap(), "");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("nested/state.json"), "notes");
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap(), "second");
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = NoteStore::new(&path, "notes");
        store.save("hello").unwrap();

        let content: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content["theme"], "dark");
        assert_eq!(content["notes"], "hello");
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        NoteStore::new(&path, "a").save("alpha").unwrap();
        assert_eq!(NoteStore::new(&path, "b").load().unwrap(), "");
        assert_eq!(NoteStore::new(&path, "a").load().unwrap(), "alpha");
    }

    #[test]
    fn test_invalid_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            NoteStore::new(&path, "notes").load(),
            Err(InspektError::Notes(_))
        ));

        fs::write(&path, r#"{"notes": 42}"#).unwrap();
        assert!(matches!(
            NoteStore::new(&path, "notes").load(),
            Err(InspektError::Notes(_))
        ));
    }
}
