//! Snowman stats.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest valid stat value.
pub const STAT_MIN: u8 = 1;
/// Highest valid stat value.
pub const STAT_MAX: u8 = 100;

/// Errors that can occur when building [`SnowmanStats`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A stat fell outside `1..=100`.
    #[error("{kind} must be between 1 and 100 (got {value})")]
    OutOfRange {
        /// Which stat was invalid.
        kind: StatKind,
        /// The rejected value.
        value: i64,
    },
}

/// One of the five stats every snowman carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Creativity,
    Roundness,
    Accessories,
    ChillFactor,
    Durability,
}

impl StatKind {
    /// All stats in display order.
    pub const ALL: [Self; 5] = [
        Self::Creativity,
        Self::Roundness,
        Self::Accessories,
        Self::ChillFactor,
        Self::Durability,
    ];

    /// Field name used in the persisted and remote JSON.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Creativity => "creativity",
            Self::Roundness => "roundness",
            Self::Accessories => "accessories",
            Self::ChillFactor => "chillFactor",
            Self::Durability => "durability",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Creativity => "Creativity",
            Self::Roundness => "Roundness",
            Self::Accessories => "Accessories",
            Self::ChillFactor => "Chill Factor",
            Self::Durability => "Durability",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Stats exactly as they arrive from the wire, before range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    pub creativity: i64,
    pub roundness: i64,
    pub accessories: i64,
    pub chill_factor: i64,
    pub durability: i64,
}

impl RawStats {
    const fn get(&self, kind: StatKind) -> i64 {
        match kind {
            StatKind::Creativity => self.creativity,
            StatKind::Roundness => self.roundness,
            StatKind::Accessories => self.accessories,
            StatKind::ChillFactor => self.chill_factor,
            StatKind::Durability => self.durability,
        }
    }
}

/// Five stats, each guaranteed to lie in `1..=100`.
///
/// Deserialization goes through [`RawStats`] and rejects out-of-range values,
/// so a stored collection can never hold an invalid stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStats")]
pub struct SnowmanStats {
    creativity: u8,
    roundness: u8,
    accessories: u8,
    chill_factor: u8,
    durability: u8,
}

impl SnowmanStats {
    /// Build stats, rejecting any value outside `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::OutOfRange`] for the first invalid stat.
    pub fn new(
        creativity: i64,
        roundness: i64,
        accessories: i64,
        chill_factor: i64,
        durability: i64,
    ) -> Result<Self, StatsError> {
        Self::try_from(RawStats {
            creativity,
            roundness,
            accessories,
            chill_factor,
            durability,
        })
    }

    /// Build stats by clamping every value into `1..=100`.
    ///
    /// Returns the stats together with the kinds that had to be adjusted.
    #[must_use]
    pub fn clamped(raw: RawStats) -> (Self, Vec<StatKind>) {
        let adjusted = StatKind::ALL
            .into_iter()
            .filter(|&kind| checked(raw.get(kind)).is_none())
            .collect();
        let stats = Self {
            creativity: clamp(raw.creativity),
            roundness: clamp(raw.roundness),
            accessories: clamp(raw.accessories),
            chill_factor: clamp(raw.chill_factor),
            durability: clamp(raw.durability),
        };
        (stats, adjusted)
    }

    #[must_use]
    pub const fn creativity(&self) -> u8 {
        self.creativity
    }

    #[must_use]
    pub const fn roundness(&self) -> u8 {
        self.roundness
    }

    #[must_use]
    pub const fn accessories(&self) -> u8 {
        self.accessories
    }

    #[must_use]
    pub const fn chill_factor(&self) -> u8 {
        self.chill_factor
    }

    #[must_use]
    pub const fn durability(&self) -> u8 {
        self.durability
    }

    /// Value of a single stat.
    #[must_use]
    pub const fn get(&self, kind: StatKind) -> u8 {
        match kind {
            StatKind::Creativity => self.creativity,
            StatKind::Roundness => self.roundness,
            StatKind::Accessories => self.accessories,
            StatKind::ChillFactor => self.chill_factor,
            StatKind::Durability => self.durability,
        }
    }

    /// `(kind, value)` pairs in display order, as plotted on the radar chart.
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u8)> + '_ {
        StatKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Sum of all five stats.
    #[must_use]
    pub fn total(&self) -> u16 {
        self.iter().map(|(_, value)| u16::from(value)).sum()
    }
}

impl TryFrom<RawStats> for SnowmanStats {
    type Error = StatsError;

    fn try_from(raw: RawStats) -> Result<Self, Self::Error> {
        let field = |kind: StatKind| {
            let value = raw.get(kind);
            checked(value).ok_or(StatsError::OutOfRange { kind, value })
        };

        Ok(Self {
            creativity: field(StatKind::Creativity)?,
            roundness: field(StatKind::Roundness)?,
            accessories: field(StatKind::Accessories)?,
            chill_factor: field(StatKind::ChillFactor)?,
            durability: field(StatKind::Durability)?,
        })
    }
}

fn checked(value: i64) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| (STAT_MIN..=STAT_MAX).contains(v))
}

fn clamp(value: i64) -> u8 {
    let bounded = value.clamp(i64::from(STAT_MIN), i64::from(STAT_MAX));
    u8::try_from(bounded).unwrap_or(STAT_MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw([creativity, roundness, accessories, chill_factor, durability]: [i64; 5]) -> RawStats {
        RawStats {
            creativity,
            roundness,
            accessories,
            chill_factor,
            durability,
        }
    }

    #[test]
    fn test_new_accepts_bounds() {
        let stats = SnowmanStats::new(1, 100, 50, 1, 100).unwrap();
        assert_eq!(stats.creativity(), 1);
        assert_eq!(stats.roundness(), 100);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = SnowmanStats::new(80, 0, 40, 95, 60).unwrap_err();
        assert_eq!(
            err,
            StatsError::OutOfRange {
                kind: StatKind::Roundness,
                value: 0
            }
        );
        assert!(SnowmanStats::new(80, 90, 101, 95, 60).is_err());
        assert!(SnowmanStats::new(80, 90, 40, 95, -3).is_err());
    }

    #[test]
    fn test_clamped_adjusts_and_reports() {
        let (stats, adjusted) = SnowmanStats::clamped(raw([0, 150, 40, -7, 60]));
        assert_eq!(stats.creativity(), 1);
        assert_eq!(stats.roundness(), 100);
        assert_eq!(stats.accessories(), 40);
        assert_eq!(stats.chill_factor(), 1);
        assert_eq!(stats.durability(), 60);
        assert_eq!(
            adjusted,
            vec![StatKind::Creativity, StatKind::Roundness, StatKind::ChillFactor]
        );
    }

    #[test]
    fn test_clamped_in_range_untouched() {
        let (stats, adjusted) = SnowmanStats::clamped(raw([80, 90, 40, 95, 60]));
        assert!(adjusted.is_empty());
        assert_eq!(stats, SnowmanStats::new(80, 90, 40, 95, 60).unwrap());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let stats = SnowmanStats::new(80, 90, 40, 95, 60).unwrap();
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["chillFactor"], 95);

        let parsed: SnowmanStats = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, stats);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let json = r#"{"creativity":80,"roundness":90,"accessories":40,"chillFactor":255,"durability":60}"#;
        assert!(serde_json::from_str::<SnowmanStats>(json).is_err());
    }

    #[test]
    fn test_iter_order_and_total() {
        let stats = SnowmanStats::new(80, 90, 40, 95, 60).unwrap();
        let kinds: Vec<StatKind> = stats.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, StatKind::ALL.to_vec());
        assert_eq!(stats.total(), 365);
    }
}
