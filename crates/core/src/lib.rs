//! Snowdex Core - Shared domain types.
//!
//! This crate provides the types shared by every Snowdex component:
//! - `snowdex` - Local store, Gemini gateway, profile and collection managers
//! - `snowdex-cli` - Command-line surface
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no storage, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Ids, profiles, stats, rarity, images, entries, and ranks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

#[doc(hidden)]
pub use uuid;
