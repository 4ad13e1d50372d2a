//! Capture command: analyze a photo into a profile's collection.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - required
//! - `GEMINI_BASE_URL`, `GEMINI_ANALYSIS_MODEL`, `GEMINI_STICKER_MODEL` - optional
//! - `SNOWDEX_DATA_DIR` - where collections are stored

use std::path::Path;

use snowdex::AppError;
use snowdex::config::SnowdexConfig;
use snowdex::gemini::GeminiClient;
use snowdex::image::read_image;
use snowdex::services::{CollectionManager, ProfileManager};
use snowdex::store::{FileStore, LocalStore};
use snowdex_core::ProfileId;

use super::collection::print_entry;

/// Analyze `image_path` and file the result under `profile_id`.
#[allow(clippy::print_stdout)]
pub async fn capture(profile_id: &ProfileId, image_path: &Path) -> Result<(), AppError> {
    let config = SnowdexConfig::from_env()?;
    let store = LocalStore::new(FileStore::open(&config.storage().data_dir)?);
    let profiles = ProfileManager::load(store.clone());

    let gemini = GeminiClient::new(config.gemini())?;
    let manager = CollectionManager::new(store, gemini);
    manager.switch_profile_by_id(&profiles, profile_id)?;

    let image = read_image(image_path).await?;
    tracing::info!(path = %image_path.display(), "Analyzing snowman...");

    match manager.capture(image).await {
        Ok(entry) => {
            print_entry(&entry);
            println!();
            println!(
                "Collection: {} snowmen ({})",
                manager.entry_count(),
                manager.rank()
            );
            Ok(())
        }
        Err(e) => {
            if let Some(message) = manager.error() {
                println!("{message}");
            }
            Err(e.into())
        }
    }
}
