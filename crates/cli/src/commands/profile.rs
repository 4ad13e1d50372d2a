//! Profile commands.
//!
//! # Usage
//!
//! ```bash
//! snowdex profile create "눈사람 마스터"
//! snowdex profile list
//! ```
//!
//! Only `SNOWDEX_DATA_DIR` is read; no API key is required.

use snowdex::AppError;
use snowdex::services::ProfileManager;
use snowdex_core::CollectorRank;

use super::open_store;

/// Create a profile and print its id.
#[allow(clippy::print_stdout)]
pub fn create(name: &str) -> Result<(), AppError> {
    let mut profiles = ProfileManager::load(open_store()?);
    let profile = profiles.create_profile(name)?;

    println!("Created profile {}", profile.name);
    println!("  id:     {}", profile.id);
    println!("  email:  {}", profile.email);
    println!("  avatar: {}", profile.avatar_color());
    Ok(())
}

/// Print every profile with its collection size and rank.
#[allow(clippy::print_stdout)]
pub fn list() -> Result<(), AppError> {
    let store = open_store()?;
    let profiles = ProfileManager::load(store.clone()).list_profiles();

    if profiles.is_empty() {
        println!("No profiles yet. Create one with `snowdex profile create <NAME>`.");
        return Ok(());
    }

    for profile in profiles {
        let count = store.load_collection(&profile.id).len();
        println!(
            "{}  {:<20} {:>3} snowmen  {}",
            profile.id,
            profile.name,
            count,
            CollectorRank::for_count(count)
        );
    }
    Ok(())
}
