//! Persistent ID counter.

use crate::error::{StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Width of the on-disk counter record in bytes.
pub const COUNTER_WIDTH: usize = 8;

/// A persistent, strictly increasing ID counter.
///
/// The counter is a single 8-byte big-endian `u64` stored at offset 0 of a
/// dedicated file. The stored value is the most recently allocated ID, so a
/// fresh counter holds 0 and its first allocation returns 1.
///
/// # Thread Safety
///
/// `allocate` takes `&mut self` and performs an unsynchronized
/// read-modify-write. Concurrent allocators must be serialized by the caller.
///
/// # Example
///
/// ```no_run
/// use flatdb_storage::IdCounter;
/// use std::path::Path;
///
/// let mut counter = IdCounter::open(Path::new("id.txt")).unwrap();
/// let first = counter.allocate().unwrap();
/// let second = counter.allocate().unwrap();
/// assert!(second > first);
/// ```
#[derive(Debug)]
pub struct IdCounter {
    path: PathBuf,
    file: File,
}

impl IdCounter {
    /// Opens the counter at `path`, creating it with value 0 if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened, or if an
    /// existing file is not exactly [`COUNTER_WIDTH`] bytes long.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(mut file) => {
                file.write_all(&0u64.to_be_bytes())?;
                file.flush()?;
                file
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                OpenOptions::new().read(true).write(true).open(path)?
            }
            Err(e) => return Err(e.into()),
        };

        let len = file.metadata()?.len();
        if len != COUNTER_WIDTH as u64 {
            return Err(StorageError::Corrupted(format!(
                "{} is {} bytes, expected {}",
                path.display(),
                len,
                COUNTER_WIDTH
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Reads the value stored at `path` without opening a writable handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn peek(path: &Path) -> StorageResult<u64> {
        let mut file = File::open(path)?;
        read_record(&mut file)
    }

    /// Returns the path of the counter file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the most recently allocated ID (0 if none yet).
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read.
    pub fn current(&mut self) -> StorageResult<u64> {
        read_record(&mut self.file)
    }

    /// Allocates the next ID.
    ///
    /// Reads the stored value, writes back `value + 1` at offset 0 and
    /// returns it. The record is a single fixed-width field, so a failed
    /// write leaves either the old or the new value on disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error on read, seek or write failure, and
    /// [`StorageError::IdExhausted`] once `u64::MAX` has been handed out.
    pub fn allocate(&mut self) -> StorageResult<u64> {
        let current = read_record(&mut self.file)?;
        let next = current.checked_add(1).ok_or(StorageError::IdExhausted)?;

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&next.to_be_bytes())?;
        self.file.flush()?;

        Ok(next)
    }

    /// Syncs the counter record to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn sync(&self) -> StorageResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

fn read_record(file: &mut File) -> StorageResult<u64> {
    let mut bytes = [0u8; COUNTER_WIDTH];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut bytes).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            StorageError::Corrupted("counter record is truncated".into())
        } else {
            StorageError::Io(e)
        }
    })?;
    Ok(u64::from_be_bytes(bytes))
}
