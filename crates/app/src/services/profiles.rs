//! Profile registry management.

use thiserror::Error;
use tracing::{info, instrument};

use snowdex_core::{ProfileId, UserProfile};

use crate::store::{LocalStore, StoreError};

/// Errors that can occur when managing profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The display name was blank after trimming.
    #[error("profile name cannot be empty")]
    EmptyName,

    /// The registry could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Creates and looks up locally stored profiles.
///
/// Profiles are append-only: there is no rename and no delete.
#[derive(Debug)]
pub struct ProfileManager {
    store: LocalStore,
    profiles: Vec<UserProfile>,
}

impl ProfileManager {
    /// Load the registry from `store`.
    #[must_use]
    pub fn load(store: LocalStore) -> Self {
        let profiles = store.load_profiles();
        Self { store, profiles }
    }

    /// Create a profile and persist the registry.
    ///
    /// The in-memory registry only changes once the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::EmptyName` for a blank name, or
    /// `ProfileError::Storage` if the registry cannot be written.
    #[instrument(skip(self))]
    pub fn create_profile(&mut self, display_name: &str) -> Result<UserProfile, ProfileError> {
        let profile = UserProfile::create(display_name).ok_or(ProfileError::EmptyName)?;

        let mut updated = self.profiles.clone();
        updated.push(profile.clone());
        self.store.save_profiles(&updated)?;
        self.profiles = updated;

        info!(profile_id = %profile.id, name = %profile.name, "Profile created");
        Ok(profile)
    }

    /// Every profile currently persisted.
    #[must_use]
    pub fn list_profiles(&self) -> Vec<UserProfile> {
        self.store.load_profiles()
    }

    /// The registry as loaded by this manager.
    #[must_use]
    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    /// Look up a profile in the loaded registry.
    #[must_use]
    pub fn select_profile(&self, id: &ProfileId) -> Option<&UserProfile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }
}
