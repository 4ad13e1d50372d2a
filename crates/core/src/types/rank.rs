//! Collector rank shown next to the collection count.

use serde::{Deserialize, Serialize};

/// Title earned by the size of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorRank {
    Rookie,
    Expert,
    Veteran,
    God,
}

impl CollectorRank {
    /// Rank for a collection holding `count` entries.
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        match count {
            20.. => Self::God,
            10.. => Self::Veteran,
            5.. => Self::Expert,
            _ => Self::Rookie,
        }
    }

    /// Entries needed to reach the next rank, or `None` at the top.
    #[must_use]
    pub const fn next_threshold(self) -> Option<usize> {
        match self {
            Self::Rookie => Some(5),
            Self::Expert => Some(10),
            Self::Veteran => Some(20),
            Self::God => None,
        }
    }
}

impl std::fmt::Display for CollectorRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Rookie => "Rookie",
            Self::Expert => "Expert",
            Self::Veteran => "Veteran",
            Self::God => "God",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(CollectorRank::for_count(0), CollectorRank::Rookie);
        assert_eq!(CollectorRank::for_count(4), CollectorRank::Rookie);
        assert_eq!(CollectorRank::for_count(5), CollectorRank::Expert);
        assert_eq!(CollectorRank::for_count(9), CollectorRank::Expert);
        assert_eq!(CollectorRank::for_count(10), CollectorRank::Veteran);
        assert_eq!(CollectorRank::for_count(19), CollectorRank::Veteran);
        assert_eq!(CollectorRank::for_count(20), CollectorRank::God);
        assert_eq!(CollectorRank::for_count(500), CollectorRank::God);
    }

    #[test]
    fn test_next_threshold_reaches_next_rank() {
        let mut rank = CollectorRank::Rookie;
        while let Some(threshold) = rank.next_threshold() {
            let next = CollectorRank::for_count(threshold);
            assert!(next > rank);
            rank = next;
        }
        assert_eq!(rank, CollectorRank::God);
    }
}
