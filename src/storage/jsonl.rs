//! JSONL-backed storage: one `<collection>.jsonl` file per collection,
//! cached in memory after first read.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::traits::{Filter, HasId, Storage};
use crate::error::{IdeaRalphError, Result};

fn poisoned<T>(e: PoisonError<T>) -> IdeaRalphError {
    IdeaRalphError::Storage(format!("cache lock poisoned: {}", e))
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

pub struct JsonlStorage {
    base_path: PathBuf,
    cache: RwLock<HashMap<String, Vec<Value>>>,
}

impl JsonlStorage {
    /// Open (creating if needed) a storage directory.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        log::debug!("Opened JSONL storage at {}", base_path.display());
        Ok(Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", collection))
    }

    fn read_collection(&self, collection: &str) -> Result<Vec<Value>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut records = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                IdeaRalphError::Storage(format!("{}:{}: {}", path.display(), n + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn ensure_loaded(&self, collection: &str) -> Result<()> {
        if self.cache.read().map_err(poisoned)?.contains_key(collection) {
            return Ok(());
        }

        let mut cache = self.cache.write().map_err(poisoned)?;
        if !cache.contains_key(collection) {
            let records = self.read_collection(collection)?;
            cache.insert(collection.to_string(), records);
        }
        Ok(())
    }

    fn append_to_file(&self, collection: &str, record: &Value) -> Result<()> {
        let path = self.collection_path(collection);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    fn rewrite_file(&self, collection: &str, records: &[Value]) -> Result<()> {
        let path = self.collection_path(collection);
        let mut writer = BufWriter::new(File::create(&path)?);
        for record in records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write `next` to disk, then make it the cached collection.
    ///
    /// The cache is left untouched if the write fails.
    fn commit(&self, collection: &str, records: &mut Vec<Value>, next: Vec<Value>) -> Result<()> {
        self.rewrite_file(collection, &next)?;
        *records = next;
        Ok(())
    }

    /// Run `f` against a loaded collection with the write lock held.
    fn with_collection<R>(&self, collection: &str, f: impl FnOnce(&mut Vec<Value>) -> Result<R>) -> Result<R> {
        self.ensure_loaded(collection)?;
        let mut cache = self.cache.write().map_err(poisoned)?;
        let records = cache.entry(collection.to_string()).or_default();
        f(records)
    }
}

impl Storage for JsonlStorage {
    fn create<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.with_collection(collection, |records| {
            if records.iter().any(|r| record_id(r) == Some(record.id())) {
                return Err(IdeaRalphError::Storage(format!(
                    "{} already contains {}",
                    collection,
                    record.id()
                )));
            }
            self.append_to_file(collection, &value)?;
            records.push(value);
            Ok(())
        })
    }

    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        self.ensure_loaded(collection)?;
        let cache = self.cache.read().map_err(poisoned)?;
        let found = cache
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)));

        match found {
            Some(record) => Ok(Some(serde_json::from_value(record.clone())?)),
            None => Ok(None),
        }
    }

    fn update<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.with_collection(collection, |records| {
            let pos = records
                .iter()
                .position(|r| record_id(r) == Some(record.id()))
                .ok_or_else(|| IdeaRalphError::NotFound(format!("{}/{}", collection, record.id())))?;
            let mut next = records.clone();
            next[pos] = value;
            self.commit(collection, records, next)
        })
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.with_collection(collection, |records| {
            let next: Vec<Value> = records.iter().filter(|r| record_id(r) != Some(id)).cloned().collect();
            if next.len() == records.len() {
                return Err(IdeaRalphError::NotFound(format!("{}/{}", collection, id)));
            }
            self.commit(collection, records, next)
        })
    }

    fn delete_where(&self, collection: &str, filters: &[Filter]) -> Result<usize> {
        self.with_collection(collection, |records| {
            let next: Vec<Value> = records
                .iter()
                .filter(|r| !filters.iter().all(|f| f.matches(r)))
                .cloned()
                .collect();
            let removed = records.len() - next.len();
            if removed > 0 {
                self.commit(collection, records, next)?;
            }
            Ok(removed)
        })
    }

    fn query<T: DeserializeOwned>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>> {
        self.ensure_loaded(collection)?;
        let cache = self.cache.read().map_err(poisoned)?;
        cache
            .get(collection)
            .map(|records| records.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|r| filters.iter().all(|f| f.matches(r)))
            .map(|r| serde_json::from_value(r.clone()).map_err(IdeaRalphError::from))
            .collect()
    }
}
