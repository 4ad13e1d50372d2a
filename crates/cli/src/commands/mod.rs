//! Command implementations.

pub mod capture;
pub mod collection;
pub mod profile;

use snowdex::AppError;
use snowdex::config::StorageConfig;
use snowdex::store::{FileStore, LocalStore};

/// Open the file store named by `SNOWDEX_DATA_DIR`.
fn open_store() -> Result<LocalStore, AppError> {
    let storage = StorageConfig::from_env();
    let backend = FileStore::open(&storage.data_dir)?;
    Ok(LocalStore::new(backend))
}
