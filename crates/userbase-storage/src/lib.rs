//! User record storage for Userbase.
//!
//! This crate provides the [`UserStore`] trait and its backends. The
//! backend is chosen at startup from a connection string:
//!
//! | URI | Backend |
//! |-----|---------|
//! | `memory://` | [`MemoryUserStore`] |
//! | `rocksdb://<path>` | `RocksDbUserStore` (feature `rocksdb-backend`) |
//!
//! ```rust
//! let store = userbase_storage::connect("memory://").unwrap();
//! # drop(store);
//! ```

mod error;
mod memory;
#[cfg(feature = "rocksdb-backend")]
mod rocksdb;
mod traits;

use std::sync::Arc;

pub use error::{Result, StorageError};
pub use memory::MemoryUserStore;
#[cfg(feature = "rocksdb-backend")]
pub use self::rocksdb::{RocksDbConfig, RocksDbUserStore};
pub use traits::UserStore;

/// Opens the store named by a connection string.
pub fn connect(uri: &str) -> Result<Arc<dyn UserStore>> {
    #[cfg_attr(not(feature = "rocksdb-backend"), allow(unused_variables))]
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| StorageError::UnsupportedUri("<missing scheme>".to_string()))?;

    match scheme {
        "memory" => {
            tracing::info!("Using in-memory user store");
            Ok(Arc::new(MemoryUserStore::new()))
        }
        #[cfg(feature = "rocksdb-backend")]
        "rocksdb" => {
            if rest.is_empty() {
                return Err(StorageError::Backend("rocksdb:// requires a path".to_string()));
            }
            Ok(Arc::new(RocksDbUserStore::open_default(rest)?))
        }
        // Only the scheme is echoed: the rest may carry credentials.
        other => Err(StorageError::UnsupportedUri(other.to_string())),
    }
}
