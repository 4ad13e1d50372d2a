//! Snowdex services.
//!
//! # Services
//!
//! - `profiles` - Local profile registry (create, list, select)
//! - `collection` - Active collection session and the capture pipeline

pub mod collection;
pub mod profiles;

pub use collection::{
    CaptureError, CaptureState, CollectionManager, SAVE_FAILED_MESSAGE, SessionError,
};
pub use profiles::{ProfileError, ProfileManager};
