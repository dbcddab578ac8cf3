use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;
use serde_json::Value;

use crate::record::{Field, FormRecord};

/// Key the whole form record is persisted under.
pub const STORAGE_KEY: &str = "user_form_data_v1";

/// Synchronous key-value store the form state lives in.
///
/// Injected into the controller so tests can swap [`MemoryStore`] in for the
/// durable [`FileStore`].
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Plain in-memory store, the test double for the durable one.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON file, the durable stand-in for the
/// browser-local storage the form originally lived in.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// one is abandoned with a warning rather than taking the form down.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("store file [{}] is corrupt, starting empty: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        self.flush()
    }
}

/// Serialize the full record and write it under [`STORAGE_KEY`].
pub fn save_record<S: Storage>(store: &mut S, record: &FormRecord) -> Result<()> {
    store.set(STORAGE_KEY, &serde_json::to_string(record)?)
}

/// Merge the persisted record, if any, into `record`.
///
/// A corrupt entry is deleted and never reported to the caller. Recognized
/// fields holding JSON strings overwrite the in-memory value; unknown keys
/// and non-string values are ignored; fields missing from the stored object
/// keep their current value.
pub fn load_record<S: Storage>(store: &mut S, record: &mut FormRecord) {
    let Some(raw) = store.get(STORAGE_KEY) else {
        return;
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => {
            for field in Field::ALL {
                if let Some(Value::String(value)) = map.get(field.name()) {
                    record.set(field, value.clone());
                }
            }
        }
        Ok(_) => {}
        Err(_) => {
            if let Err(e) = store.remove(STORAGE_KEY) {
                warn!("cannot remove corrupt form entry: {e:?}");
            }
        }
    }
}

/// Delete the persisted record and reset every field.
pub fn clear_record<S: Storage>(store: &mut S, record: &mut FormRecord) -> Result<()> {
    store.remove(STORAGE_KEY)?;
    *record = FormRecord::default();
    Ok(())
}
