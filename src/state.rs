//! Durable frontier store: one redb table mapping the stable hash of a
//! normalized URL to its [`UrlRecord`]. Every mutation is a single committed
//! write transaction, so a crash leaves the store consistent with whatever
//! the caller observed as durably returned.

use redb::{Database, ReadableTable, TableDefinition};
use rkyv::{AlignedVec, Archive, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Redb(#[from] redb::Error),

    #[error("Database creation error: {0}")]
    RedbCreate(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),
}

/// Persistent record for one normalized URL.
///
/// Created once by insertion, mutated only to flip `completed`, never
/// deleted. `parent_url` is immutable after insertion.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct UrlRecord {
    pub url: String,
    pub completed: bool,
    pub parent_url: Option<String>,
}

impl UrlRecord {
    pub fn new(url: String, parent_url: Option<String>) -> Self {
        Self {
            url,
            completed: false,
            parent_url,
        }
    }
}

/// redb-backed store of every URL the crawl has ever seen.
pub struct FrontierStore {
    db: Database,
    path: PathBuf,
}

impl FrontierStore {
    const RECORDS: TableDefinition<'_, &str, &[u8]> = TableDefinition::new("records");

    /// Open (or create) the store at `path`. With `restart`, any existing
    /// store file is deleted first so the crawl begins from seeds alone.
    pub fn open<P: AsRef<Path>>(path: P, restart: bool) -> Result<Self, StateError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if restart && path.exists() {
            tracing::info!("Found save file {}, deleting it", path.display());
            std::fs::remove_file(&path)?;
        } else if !restart && !path.exists() {
            tracing::info!(
                "Did not find save file {}, starting from seed",
                path.display()
            );
        }

        let db = Database::create(&path)?;

        // Open the table once so it exists before any read transaction.
        let write_txn = db.begin_write()?;
        {
            let _records = write_txn.open_table(Self::RECORDS)?;
        }
        write_txn.commit()?;

        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record unless the hash is already present.
    ///
    /// Returns `true` if the record was inserted. The check and the insert
    /// share one write transaction, so concurrent callers cannot both insert
    /// the same hash. The commit is the durable flush point.
    pub fn insert_if_absent(&self, hash: &str, record: &UrlRecord) -> Result<bool, StateError> {
        let write_txn = self.db.begin_write()?;
        let inserted = {
            let mut table = write_txn.open_table(Self::RECORDS)?;
            if table.get(hash)?.is_some() {
                false
            } else {
                let serialized = rkyv::to_bytes::<_, 512>(record)
                    .map_err(|e| StateError::Serialization(format!("serialize failed: {}", e)))?;
                table.insert(hash, serialized.as_ref())?;
                true
            }
        };
        write_txn.commit()?;
        Ok(inserted)
    }

    /// Flip `completed` to true, preserving the parent pointer.
    ///
    /// Returns `false` if the hash was never inserted (the caller decides how
    /// loud to be about that).
    pub fn mark_complete(&self, hash: &str) -> Result<bool, StateError> {
        let write_txn = self.db.begin_write()?;
        let found = {
            let mut table = write_txn.open_table(Self::RECORDS)?;

            // Drop the table borrow before reinserting to satisfy aliasing rules.
            let existing = if let Some(bytes) = table.get(hash)? {
                let mut aligned = AlignedVec::new();
                aligned.extend_from_slice(bytes.value());
                Some(aligned)
            } else {
                None
            };

            match existing {
                Some(aligned) => {
                    let mut record: UrlRecord = unsafe { rkyv::from_bytes_unchecked(&aligned) }
                        .map_err(|e| {
                            StateError::Serialization(format!("deserialize failed: {}", e))
                        })?;
                    record.completed = true;
                    let serialized = rkyv::to_bytes::<_, 512>(&record).map_err(|e| {
                        StateError::Serialization(format!("serialize failed: {}", e))
                    })?;
                    table.insert(hash, serialized.as_ref())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(found)
    }

    pub fn get(&self, hash: &str) -> Result<Option<UrlRecord>, StateError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::RECORDS)?;

        if let Some(bytes) = table.get(hash)? {
            let mut aligned = AlignedVec::new();
            aligned.extend_from_slice(bytes.value());
            let record: UrlRecord = unsafe { rkyv::from_bytes_unchecked(&aligned) }
                .map_err(|e| StateError::Serialization(format!("deserialize failed: {}", e)))?;
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    pub fn contains(&self, hash: &str) -> Result<bool, StateError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::RECORDS)?;
        Ok(table.get(hash)?.is_some())
    }

    /// Stream every record through a callback so startup reconstruction does
    /// not hold the whole store in memory.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), StateError>
    where
        F: FnMut(UrlRecord) -> Result<(), StateError>,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::RECORDS)?;

        for result in table.iter()? {
            let (_key, value) = result?;
            let mut aligned = AlignedVec::new();
            aligned.extend_from_slice(value.value());
            let record: UrlRecord = unsafe { rkyv::from_bytes_unchecked(&aligned) }
                .map_err(|e| StateError::Serialization(format!("deserialize failed: {}", e)))?;
            f(record)?;
        }

        Ok(())
    }

    pub fn record_count(&self) -> Result<usize, StateError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::RECORDS)?;
        Ok(table.iter()?.count())
    }

    pub fn completed_count(&self) -> Result<usize, StateError> {
        let mut count = 0;
        self.for_each(|record| {
            if record.completed {
                count += 1;
            }
            Ok(())
        })?;
        Ok(count)
    }
}
