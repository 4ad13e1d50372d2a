//! Collection session: the active profile, its entries, and the capture
//! pipeline.
//!
//! # Capture flow
//!
//! 1. Reject unless a profile is active and no capture is running
//! 2. Mark the session `Analyzing`
//! 3. Analyze the photo (failure aborts with a user-visible message)
//! 4. Generate a sticker (failure or absence is tolerated)
//! 5. Persist `[new, ...old]`, then swap it into memory and select the entry
//! 6. Return to `Idle`
//!
//! Session state sits behind a mutex that is never held across an await, so a
//! manager shared between tasks still enforces one capture at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{info, instrument, warn};

use snowdex_core::{CollectorRank, EntryId, ImageData, ProfileId, SnowmanEntry, UserProfile};

use crate::gemini::prompt::ANALYSIS_FAILED_MESSAGE;
use crate::gemini::{GeminiError, SnowmanGateway};
use crate::store::{LocalStore, StoreError};

use super::profiles::ProfileManager;

/// User-visible message shown when a capture cannot be saved.
pub const SAVE_FAILED_MESSAGE: &str = "도감 저장에 실패했습니다. 다시 시도해주세요.";

/// Errors that can occur during a capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No profile is active.
    #[error("no active profile")]
    NoActiveProfile,

    /// Another capture is already running.
    #[error("a capture is already in progress")]
    Busy,

    /// The photo could not be analyzed.
    #[error("analysis failed: {0}")]
    Analysis(#[from] GeminiError),

    /// The updated collection could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors that can occur when changing the active profile.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A capture is running; the profile cannot change under it.
    #[error("cannot change profile while a capture is in progress")]
    Busy,

    /// No profile with this id exists.
    #[error("unknown profile: {0}")]
    UnknownProfile(ProfileId),
}

/// Where the capture pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Analyzing,
}

#[derive(Debug, Default)]
struct Session {
    profile: Option<UserProfile>,
    entries: Vec<SnowmanEntry>,
    selected: Option<EntryId>,
    error: Option<String>,
    state: CaptureState,
}

impl Session {
    fn is_busy(&self) -> bool {
        self.state == CaptureState::Analyzing
    }
}

/// Owns the active profile's collection and runs captures against it.
pub struct CollectionManager<G> {
    store: LocalStore,
    gateway: G,
    session: Mutex<Session>,
}

impl<G: SnowmanGateway> CollectionManager<G> {
    /// Create a manager with no active profile.
    pub fn new(store: LocalStore, gateway: G) -> Self {
        Self {
            store,
            gateway,
            session: Mutex::new(Session::default()),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `profile` active and load its collection.
    ///
    /// Clears the selection and any error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while a capture is running.
    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    pub fn switch_profile(&self, profile: UserProfile) -> Result<(), SessionError> {
        if self.session().is_busy() {
            return Err(SessionError::Busy);
        }

        let entries = self.store.load_collection(&profile.id);

        let mut session = self.session();
        if session.is_busy() {
            return Err(SessionError::Busy);
        }
        info!(entries = entries.len(), "Profile activated");
        *session = Session {
            profile: Some(profile),
            entries,
            ..Session::default()
        };
        Ok(())
    }

    /// Activate a profile by id from the loaded registry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownProfile` if no such profile exists, or
    /// `SessionError::Busy` while a capture is running.
    pub fn switch_profile_by_id(
        &self,
        profiles: &ProfileManager,
        id: &ProfileId,
    ) -> Result<(), SessionError> {
        let profile = profiles
            .select_profile(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProfile(id.clone()))?;
        self.switch_profile(profile)
    }

    /// Deactivate the current profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while a capture is running.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        let mut session = self.session();
        if session.is_busy() {
            return Err(SessionError::Busy);
        }
        *session = Session::default();
        Ok(())
    }

    /// Analyze `image`, add the result to the collection, and select it.
    ///
    /// # Errors
    ///
    /// - `CaptureError::NoActiveProfile` / `CaptureError::Busy` - rejected
    ///   without touching the session
    /// - `CaptureError::Analysis` - analysis failed; the session error is set
    /// - `CaptureError::Storage` - the collection could not be saved; the
    ///   session error is set
    ///
    /// On any error the collection is left unchanged.
    #[instrument(
        skip(self, image),
        fields(profile_id = tracing::field::Empty, entry_id = tracing::field::Empty)
    )]
    pub async fn capture(&self, image: ImageData) -> Result<SnowmanEntry, CaptureError> {
        let (profile_id, _guard) = {
            let mut session = self.session();
            let profile_id = session
                .profile
                .as_ref()
                .map(|profile| profile.id.clone())
                .ok_or(CaptureError::NoActiveProfile)?;
            if session.is_busy() {
                return Err(CaptureError::Busy);
            }
            session.error = None;
            session.state = CaptureState::Analyzing;
            (profile_id, AnalyzingGuard(&self.session))
        };
        tracing::Span::current().record("profile_id", tracing::field::display(&profile_id));

        let analysis = match self.gateway.analyze(&image).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                self.session().error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
                return Err(e.into());
            }
        };

        let sticker = match self.gateway.generate_sticker(&image).await {
            Ok(Some(sticker)) => Some(sticker),
            Ok(None) => {
                info!("No sticker returned, keeping photo only");
                None
            }
            Err(e) => {
                warn!(error = %e, "Sticker generation failed, keeping photo only");
                None
            }
        };

        let entry = SnowmanEntry::new(analysis, image, sticker);
        tracing::Span::current().record("entry_id", tracing::field::display(&entry.id));

        let updated: Vec<SnowmanEntry> = {
            let session = self.session();
            std::iter::once(entry.clone())
                .chain(session.entries.iter().cloned())
                .collect()
        };

        if let Err(e) = self.store.save_collection(&profile_id, &updated) {
            warn!(error = %e, "Failed to persist collection");
            self.session().error = Some(SAVE_FAILED_MESSAGE.to_string());
            return Err(e.into());
        }

        let mut session = self.session();
        session.entries = updated;
        session.selected = Some(entry.id.clone());
        session.state = CaptureState::Idle;
        drop(session);

        info!(name = %entry.name(), rarity = %entry.rarity(), "Snowman captured");
        Ok(entry)
    }

    /// Select an entry of the active collection.
    ///
    /// Returns `false`, leaving the selection untouched, if the id is not in
    /// the collection.
    pub fn select_entry(&self, id: &EntryId) -> bool {
        let mut session = self.session();
        let found = session.entries.iter().any(|entry| &entry.id == id);
        if found {
            session.selected = Some(id.clone());
        }
        found
    }

    pub fn clear_selection(&self) {
        self.session().selected = None;
    }

    pub fn dismiss_error(&self) {
        self.session().error = None;
    }

    #[must_use]
    pub fn active_profile(&self) -> Option<UserProfile> {
        self.session().profile.clone()
    }

    /// The active collection, most recent first.
    #[must_use]
    pub fn entries(&self) -> Vec<SnowmanEntry> {
        self.session().entries.clone()
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.session().entries.len()
    }

    /// The selected entry, if any.
    #[must_use]
    pub fn selected(&self) -> Option<SnowmanEntry> {
        let session = self.session();
        let id = session.selected.as_ref()?;
        session.entries.iter().find(|entry| &entry.id == id).cloned()
    }

    /// Message describing the last failed capture.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.session().error.clone()
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.session().state
    }

    /// Rank earned by the size of the active collection.
    #[must_use]
    pub fn rank(&self) -> CollectorRank {
        CollectorRank::for_count(self.entry_count())
    }
}

/// Returns the session to `Idle` when a capture ends, including when its
/// future is dropped mid-flight.
struct AnalyzingGuard<'a>(&'a Mutex<Session>);

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).state = CaptureState::Idle;
    }
}
