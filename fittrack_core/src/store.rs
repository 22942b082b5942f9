//! Data document persistence with file locking.
//!
//! The entire application state lives in one JSON document. Loading falls
//! back to the built-in seed when the file is missing or unreadable;
//! every mutation persists the whole document synchronously (atomic
//! write-then-rename) before it is considered committed.

use crate::seed::seed_document;
use crate::{AggregateStats, Document, Error, Goals, Result, SessionRecord};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Owner of the persisted document and single writer to it.
pub struct Store {
    path: PathBuf,
    doc: Document,
}

impl Store {
    /// Open the store at `path`.
    ///
    /// A missing or corrupt document is replaced silently by the seed
    /// catalog (a warning is logged); nothing is written to disk until
    /// the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = load_document(&path)?;
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn goals(&self) -> &Goals {
        &self.doc.goals
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.doc.user_stats
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.doc.history
    }

    /// Apply a mutation and persist the whole document durably.
    ///
    /// If the write fails the in-memory document is rolled back, so
    /// memory never diverges silently from disk.
    pub(crate) fn commit<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Document),
    {
        let backup = self.doc.clone();
        mutate(&mut self.doc);
        if let Err(e) = save_document(&self.path, &self.doc) {
            self.doc = backup;
            return Err(e);
        }
        Ok(())
    }
}

fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        tracing::info!("No data file found at {:?}, seeding defaults", path);
        return Ok(seed_document());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open data file {:?}: {}. Seeding defaults.", path, e);
            return Ok(seed_document());
        }
    };

    // Shared lock for reading
    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock data file {:?}: {}. Seeding defaults.", path, e);
        return Ok(seed_document());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read data file {:?}: {}. Seeding defaults.", path, e);
        return Ok(seed_document());
    }

    file.unlock()?;

    match serde_json::from_str::<Document>(&contents) {
        Ok(doc) => {
            tracing::debug!("Loaded data document from {:?}", path);
            Ok(doc)
        }
        Err(e) => {
            tracing::warn!("Failed to parse data file {:?}: {}. Seeding defaults.", path, e);
            Ok(seed_document())
        }
    }
}

/// Atomically write the document: temp file in the same directory,
/// exclusive lock, sync, then rename over the original.
fn save_document(path: &Path, doc: &Document) -> Result<()> {
    write_document(path, doc).map_err(|e| Error::Persistence(e.to_string()))
}

fn write_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "data path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(doc)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved data document to {:?}", path);
    Ok(())
}
