//! Unified error handling for snowdex.

use thiserror::Error;

use snowdex_core::ImageError;

use crate::config::ConfigError;
use crate::gemini::GeminiError;
use crate::services::{CaptureError, ProfileError, SessionError};
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Gemini API operation failed.
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    /// Input image could not be read.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Profile operation failed.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Profile could not be activated.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Capture failed.
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),
}
