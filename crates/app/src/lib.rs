//! Snowdex library.
//!
//! Turns snowman photos into collectible entries: a remote model analyzes the
//! photo and draws a sticker, and the result is filed into the active
//! profile's collection on local storage.
//!
//! # Modules
//!
//! - `config` - Environment-based configuration
//! - `gemini` - Gemini API client behind the [`gemini::SnowmanGateway`] seam
//! - `image` - Reading photos from disk
//! - `services` - Profile registry and collection session
//! - `store` - Key-value persistence of profiles and collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod image;
pub mod services;
pub mod store;

pub use error::AppError;
