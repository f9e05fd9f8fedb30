//! RocksDB persistent user store.
//!
//! Users are stored as JSON documents keyed by ID in the `users` column
//! family. The `emails` column family maps each email to its owner's ID and
//! enforces uniqueness. Writes that touch both families go through a single
//! `WriteBatch` under a store-wide write lock, so a record and its index
//! entry never disagree.

use async_trait::async_trait;
use parking_lot::Mutex;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::{Path, PathBuf};
use userbase_types::{IssuedToken, User, UserId};
use uuid::Uuid;

use crate::{Result, StorageError, UserStore};

/// RocksDB storage configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Write buffer size in bytes.
    pub write_buffer_size: usize,

    /// Enable LZ4 compression.
    pub compression_enabled: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/userbase"),
            write_buffer_size: 16 * 1024 * 1024, // 16 MB
            compression_enabled: true,
        }
    }
}

/// Column family names.
const CF_USERS: &str = "users";
const CF_EMAILS: &str = "emails";

/// RocksDB-backed user store.
pub struct RocksDbUserStore {
    db: DB,
    /// Serialises read-check-write sequences.
    write_lock: Mutex<()>,
}

impl RocksDbUserStore {
    /// Opens or creates a database.
    pub fn open(config: RocksDbConfig) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);

        if config.compression_enabled {
            opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        }

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_USERS, opts.clone()),
            ColumnFamilyDescriptor::new(CF_EMAILS, opts.clone()),
        ];

        let db = DB::open_cf_descriptors(&opts, &config.path, cfs).map_err(backend_err)?;

        tracing::info!(path = %config.path.display(), "Opened RocksDB user store");

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    /// Opens with default configuration at the given path.
    pub fn open_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::Backend(format!("missing column family: {}", name)))
    }

    fn read_user(&self, id: &UserId) -> Result<Option<User>> {
        match self.db.get_cf(self.cf(CF_USERS)?, id.as_bytes()).map_err(backend_err)? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn email_owner(&self, email: &str) -> Result<Option<UserId>> {
        match self
            .db
            .get_cf(self.cf(CF_EMAILS)?, email.as_bytes())
            .map_err(backend_err)?
        {
            Some(data) => Uuid::from_slice(&data)
                .map(Some)
                .map_err(|e| StorageError::Backend(format!("corrupt email index: {}", e))),
            None => Ok(None),
        }
    }

    fn write_user(&self, batch: &mut WriteBatch, user: &User) -> Result<()> {
        let data = serde_json::to_vec(user)?;
        batch.put_cf(self.cf(CF_USERS)?, user.id.as_bytes(), data);
        Ok(())
    }

    /// Flushes all pending writes.
    pub fn flush(&self) -> Result<()> {
        self.db.flush().map_err(backend_err)
    }
}

#[async_trait]
impl UserStore for RocksDbUserStore {
    async fn insert(&self, user: User) -> Result<User> {
        let _guard = self.write_lock.lock();

        if self.email_owner(&user.email)?.is_some() {
            return Err(StorageError::DuplicateEmail(user.email));
        }

        let mut batch = WriteBatch::default();
        self.write_user(&mut batch, &user)?;
        batch.put_cf(self.cf(CF_EMAILS)?, user.email.as_bytes(), user.id.as_bytes());
        self.db.write(batch).map_err(backend_err)?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users = Vec::new();

        for item in self.db.iterator_cf(self.cf(CF_USERS)?, IteratorMode::Start) {
            let (_, value) = item.map_err(backend_err)?;
            users.push(serde_json::from_slice::<User>(&value)?);
        }

        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>> {
        self.read_user(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.email_owner(email)? {
            Some(id) => self.read_user(&id),
            None => Ok(None),
        }
    }

    async fn replace(&self, user: User) -> Result<User> {
        let _guard = self.write_lock.lock();

        let existing = self
            .read_user(&user.id)?
            .ok_or_else(|| StorageError::NotFound(user.id.to_string()))?;

        let mut batch = WriteBatch::default();
        if existing.email != user.email {
            if self.email_owner(&user.email)?.is_some() {
                return Err(StorageError::DuplicateEmail(user.email));
            }
            let emails = self.cf(CF_EMAILS)?;
            batch.delete_cf(emails, existing.email.as_bytes());
            batch.put_cf(emails, user.email.as_bytes(), user.id.as_bytes());
        }
        self.write_user(&mut batch, &user)?;
        self.db.write(batch).map_err(backend_err)?;

        Ok(user)
    }

    async fn append_token(&self, id: &UserId, token: IssuedToken) -> Result<User> {
        let _guard = self.write_lock.lock();

        let mut user = self
            .read_user(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        user.tokens.push(token);

        let mut batch = WriteBatch::default();
        self.write_user(&mut batch, &user)?;
        self.db.write(batch).map_err(backend_err)?;

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<User> {
        let _guard = self.write_lock.lock();

        let user = self
            .read_user(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(self.cf(CF_USERS)?, id.as_bytes());
        batch.delete_cf(self.cf(CF_EMAILS)?, user.email.as_bytes());
        self.db.write(batch).map_err(backend_err)?;

        Ok(user)
    }

    async fn count(&self) -> Result<usize> {
        // RocksDB doesn't have an efficient count, so we iterate
        Ok(self
            .db
            .iterator_cf(self.cf(CF_USERS)?, IteratorMode::Start)
            .count())
    }
}

fn backend_err(e: rocksdb::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}
