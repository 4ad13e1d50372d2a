//! Locally created user profiles.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::ProfileId;

/// A locally created identity that owns one isolated collection.
///
/// Profiles are immutable once created and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique id, also the storage namespace for the profile's collection.
    pub id: ProfileId,
    /// Display name, trimmed and non-empty.
    pub name: String,
    /// Placeholder address derived from the id.
    pub email: Email,
    /// Seed for the avatar color.
    pub avatar_seed: String,
}

impl UserProfile {
    /// Build a new profile with a freshly generated id.
    ///
    /// Returns `None` when `display_name` is blank after trimming.
    #[must_use]
    pub fn create(display_name: &str) -> Option<Self> {
        let name = display_name.trim();
        if name.is_empty() {
            return None;
        }

        let id = ProfileId::generate();
        Some(Self {
            email: Email::placeholder_for(&id),
            id,
            name: name.to_owned(),
            avatar_seed: name.to_owned(),
        })
    }

    /// Avatar background color picked from the seed.
    #[must_use]
    pub fn avatar_color(&self) -> AvatarColor {
        AvatarColor::from_seed(&self.avatar_seed)
    }
}

/// Background palette for profile avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarColor {
    Indigo,
    Emerald,
    Rose,
    Amber,
    Sky,
    Purple,
}

impl AvatarColor {
    /// Palette in selection order.
    pub const PALETTE: [Self; 6] = [
        Self::Indigo,
        Self::Emerald,
        Self::Rose,
        Self::Amber,
        Self::Sky,
        Self::Purple,
    ];

    /// Pick a color from the sum of the seed's code points.
    ///
    /// An empty seed maps to the first color.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        let sum: u64 = seed.chars().map(|c| u64::from(u32::from(c))).sum();
        let len = Self::PALETTE.len() as u64;
        let index = usize::try_from(sum % len).unwrap_or(0);
        Self::PALETTE.get(index).copied().unwrap_or(Self::Indigo)
    }
}

impl std::fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Indigo => "indigo",
            Self::Emerald => "emerald",
            Self::Rose => "rose",
            Self::Amber => "amber",
            Self::Sky => "sky",
            Self::Purple => "purple",
        };
        f.write_str(name)
    }
}
