//! Core types for Snowdex.
//!
//! This module provides type-safe wrappers for the collection's domain concepts.

pub mod email;
pub mod entry;
pub mod id;
pub mod image;
pub mod profile;
pub mod rank;
pub mod rarity;
pub mod stats;

pub use email::{Email, EmailError};
pub use entry::{AnalysisResult, SnowmanEntry};
pub use id::*;
pub use image::{ImageData, ImageError};
pub use profile::{AvatarColor, UserProfile};
pub use rank::CollectorRank;
pub use rarity::Rarity;
pub use stats::{RawStats, STAT_MAX, STAT_MIN, SnowmanStats, StatKind, StatsError};
