//! Rarity tiers assigned by the remote analysis step.

use serde::{Deserialize, Serialize};

/// Collectability tier of a snowman.
///
/// Serialized with the exact English names the analysis schema enumerates.
/// Tiers are ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Mythical,
}

impl Rarity {
    /// Every tier, most common first.
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Legendary,
        Self::Mythical,
    ];

    /// The schema name of this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Legendary => "Legendary",
            Self::Mythical => "Mythical",
        }
    }

    /// Korean label shown on the detail card.
    #[must_use]
    pub const fn localized_label(self) -> &'static str {
        match self {
            Self::Common => "일반",
            Self::Uncommon => "희귀",
            Self::Rare => "레어",
            Self::Legendary => "전설",
            Self::Mythical => "신화",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str() == s)
            .ok_or_else(|| format!("invalid rarity: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_serde_names() {
        let json = serde_json::to_string(&Rarity::Legendary).unwrap();
        assert_eq!(json, "\"Legendary\"");

        let parsed: Rarity = serde_json::from_str("\"Mythical\"").unwrap();
        assert_eq!(parsed, Rarity::Mythical);
    }

    #[test]
    fn test_rarity_rejects_unknown_and_wrong_case() {
        assert!(serde_json::from_str::<Rarity>("\"Epic\"").is_err());
        assert!(serde_json::from_str::<Rarity>("\"rare\"").is_err());
    }

    #[test]
    fn test_rarity_from_str_matches_display() {
        for rarity in Rarity::ALL {
            assert_eq!(rarity.to_string().parse::<Rarity>().unwrap(), rarity);
        }
        assert!("Shiny".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Legendary < Rarity::Mythical);
    }

    #[test]
    fn test_localized_labels() {
        assert_eq!(Rarity::Common.localized_label(), "일반");
        assert_eq!(Rarity::Mythical.localized_label(), "신화");
    }
}
