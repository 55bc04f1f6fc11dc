use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::session::{RestoredSession, Session};

pub const RECENT_COLORS_KEY: &str = "recentColors";
pub const LAST_COLOR_KEY: &str = "lastColor";
pub const THEME_KEY: &str = "theme";

pub const PERSISTED_KEYS: [&str; 3] = [RECENT_COLORS_KEY, LAST_COLOR_KEY, THEME_KEY];

/// Flat key-value storage. `get` returns only the keys that are present.
pub trait KeyValueStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;
    fn set(&mut self, items: Map<String, Value>) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        (**self).get(keys)
    }

    fn set(&mut self, items: Map<String, Value>) -> Result<()> {
        (**self).set(items)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        Ok(keys
            .iter()
            .filter_map(|key| self.entries.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    fn set(&mut self, items: Map<String, Value>) -> Result<()> {
        self.entries.extend(items);
        Ok(())
    }
}

/// A single JSON object on disk. Writes merge into whatever is already there.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist yet.
    fn read_contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    fn parse(&self, contents: &str) -> Result<Map<String, Value>> {
        serde_json::from_str(contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        match self.read_contents()? {
            Some(contents) => self.parse(&contents),
            None => Ok(Map::new()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let mut all = self.read_all()?;
        Ok(keys
            .iter()
            .filter_map(|key| all.remove(*key).map(|v| (key.to_string(), v)))
            .collect())
    }

    /// Only a file that is unparsable gets replaced; any other read error
    /// aborts the write. The new contents land via rename, so a failed write
    /// never leaves a truncated file behind.
    fn set(&mut self, items: Map<String, Value>) -> Result<()> {
        let mut all = match self.read_contents()? {
            Some(contents) => self.parse(&contents).unwrap_or_else(|e| {
                warn!("Replacing unreadable store {}: {:#}", self.path.display(), e);
                Map::new()
            }),
            None => Map::new(),
        };
        all.extend(items);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to stage a write in {}", dir.display()))?;
        serde_json::to_writer(&mut staged, &all)
            .with_context(|| format!("Failed to write {}", staged.path().display()))?;
        staged
            .persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

fn take_key<T: DeserializeOwned>(items: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = items.remove(key)?;
    match serde_json::from_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed stored '{}': {}", key, e);
            None
        }
    }
}

/// Read the persisted subset. A store that cannot be read restores nothing.
pub fn restore(store: &impl KeyValueStore) -> RestoredSession {
    let mut items = match store.get(&PERSISTED_KEYS) {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to read stored session, starting fresh: {:#}", e);
            return RestoredSession::default();
        }
    };
    debug!("Restored keys: {:?}", items.keys().collect::<Vec<_>>());
    RestoredSession {
        recent_colors: take_key(&mut items, RECENT_COLORS_KEY),
        last_color: take_key(&mut items, LAST_COLOR_KEY),
        theme: take_key(&mut items, THEME_KEY),
    }
}

/// The three persisted fields as one batch. Format is never persisted.
pub fn persisted_items(session: &Session) -> Map<String, Value> {
    let mut items = Map::new();
    items.insert(RECENT_COLORS_KEY.to_string(), Value::from(session.recent_colors.clone()));
    items.insert(LAST_COLOR_KEY.to_string(), Value::from(session.current_color()));
    items.insert(
        THEME_KEY.to_string(),
        serde_json::to_value(session.theme).unwrap_or(Value::Null),
    );
    items
}

pub fn persist(store: &mut impl KeyValueStore, session: &Session) -> Result<()> {
    store.set(persisted_items(session))
}
