//! One-file-per-document store.

use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Stores each document as `<id>.<extension>` inside one directory.
///
/// Files are written exactly once and never modified afterwards, so a
/// completely written document can be read without synchronization.
///
/// # Durability
///
/// `write` goes through a buffered writer and an explicit flush. There is no
/// write-to-temp-then-rename step: a failure mid-write can leave a partial
/// file behind under the final name.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
    extension: String,
}

impl DocumentStore {
    /// Creates a store over `dir` using files ending in `.<extension>`.
    ///
    /// The directory is not created here.
    pub fn new(dir: &Path, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            extension: extension.into(),
        }
    }

    /// Returns the directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the document file extension (without the dot).
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the file name used for `id`, e.g. `42.json`.
    #[must_use]
    pub fn file_name(&self, id: u64) -> String {
        format!("{}.{}", id, self.extension)
    }

    /// Returns the full path of the document file for `id`.
    #[must_use]
    pub fn path_of(&self, id: u64) -> PathBuf {
        self.dir.join(self.file_name(id))
    }

    /// Writes a new document file for `id`.
    ///
    /// When `sync` is true the file is fsynced before returning.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if a file for `id` is already
    /// present, and an I/O error on create, write, flush or sync failure.
    pub fn write(&self, id: u64, bytes: &[u8], sync: bool) -> StorageResult<()> {
        let path = self.path_of(id);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::AlreadyExists { id, path },
                _ => StorageError::Io(e),
            })?;

        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;

        if sync {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        Ok(())
    }

    /// Reads the raw bytes of the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no file exists for `id`, and
    /// an I/O error otherwise.
    pub fn read(&self, id: u64) -> StorageResult<Vec<u8>> {
        let path = self.path_of(id);
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound { id, path },
            _ => StorageError::Io(e),
        })?;

        let mut bytes = Vec::new();
        BufReader::new(file).read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Lists every document file in the directory.
    ///
    /// Only files named `<decimal id>.<extension>` are returned, with the ID
    /// written the way [`DocumentStore::file_name`] writes it. Names such as
    /// `01.json` or `+1.json` are skipped, since [`DocumentStore::read`] would
    /// resolve them to a different file. The order follows directory
    /// traversal and is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> StorageResult<Vec<u64>> {
        let suffix = format!(".{}", self.extension);
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(&suffix) else {
                continue;
            };
            match stem.parse::<u64>() {
                Ok(id) if id.to_string() == stem => ids.push(id),
                _ => {}
            }
        }

        Ok(ids)
    }

    /// Returns the number of document files in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self.list()?.len())
    }
}
