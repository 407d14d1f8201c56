//! Bounded, most-recent-first list of searched cities backed by a JSON file.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::{Result, WeatherError};

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<String>,
}

impl HistoryStore {
    /// An empty store that will persist to `path`. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
            entries: Vec::new(),
        }
    }

    /// Load the persisted history, degrading to an empty one on any problem.
    pub fn load(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        let path = path.into();
        match Self::try_load(&path, max_entries) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!("{err}; starting with empty history");
                Self::new(path, max_entries)
            }
        }
    }

    /// Like [`HistoryStore::load`] but hands the failure back.
    /// A missing file is not a failure.
    pub fn try_load(path: &Path, max_entries: usize) -> Result<Self> {
        let mut store = Self::new(path, max_entries);

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(store),
            Err(source) => {
                return Err(WeatherError::HistoryIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let entries: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| WeatherError::HistoryFormat {
                path: path.to_path_buf(),
                source,
            })?;

        // Hand-edited files may break the invariants; the first spelling wins.
        for entry in entries {
            if !store.contains(&entry) {
                store.entries.push(entry);
            }
        }
        store.entries.truncate(store.max_entries);

        tracing::debug!(count = store.entries.len(), path = %path.display(), "history loaded");
        Ok(store)
    }

    /// Move `city` to the front, dropping any case-insensitive duplicate and
    /// the oldest entries past the limit, then persist.
    ///
    /// The in-memory list is updated even if persisting fails.
    pub fn record(&mut self, city: &str) -> Result<()> {
        let key = city.to_lowercase();
        self.entries.retain(|e| e.to_lowercase() != key);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(self.max_entries);

        self.persist()
    }

    /// Most-recent-first.
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    /// Write the list as pretty JSON. The data goes to a sibling temp file
    /// first and is renamed over the target, so a good file is never left
    /// half-written.
    pub fn persist(&self) -> Result<()> {
        let io_err = |source| WeatherError::HistoryIo {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            WeatherError::HistoryFormat {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(io_err)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }

        tracing::debug!(count = self.entries.len(), path = %self.path.display(), "history saved");
        Ok(())
    }

    fn contains(&self, city: &str) -> bool {
        let key = city.to_lowercase();
        self.entries.iter().any(|e| e.to_lowercase() == key)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("history"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
