//! Analysis results and collected entries.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::id::EntryId;
use super::image::ImageData;
use super::rarity::Rarity;
use super::stats::SnowmanStats;

/// Structured description of a snowman produced by the analysis step.
///
/// Transient: it only lives between a successful analysis and the
/// construction of a [`SnowmanEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub name: String,
    pub description: String,
    /// Elemental type, e.g. frost, mud, ice.
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: Rarity,
    pub stats: SnowmanStats,
    pub fun_fact: String,
}

/// One collected, immutable snowman record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowmanEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    /// The photo as captured.
    pub source_image: ImageData,
    /// Stylized sticker, absent when generation produced nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_image: Option<ImageData>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

impl SnowmanEntry {
    /// Build a new entry with a fresh id, stamped with the current time.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is
    /// persisted with, so a stored entry reloads equal to the original.
    #[must_use]
    pub fn new(
        analysis: AnalysisResult,
        source_image: ImageData,
        sticker_image: Option<ImageData>,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            analysis,
            source_image,
            sticker_image,
            captured_at: Utc::now().trunc_subsecs(3),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.analysis.name
    }

    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        self.analysis.rarity
    }

    #[must_use]
    pub const fn stats(&self) -> &SnowmanStats {
        &self.analysis.stats
    }

    /// Sticker if one was generated, otherwise the source photo.
    #[must_use]
    pub fn display_image(&self) -> &ImageData {
        self.sticker_image.as_ref().unwrap_or(&self.source_image)
    }

    #[must_use]
    pub const fn has_sticker(&self) -> bool {
        self.sticker_image.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";

    fn frosty() -> AnalysisResult {
        AnalysisResult {
            name: "Frosty".to_string(),
            description: "A cheerful sentinel of the schoolyard.".to_string(),
            kind: "Ice".to_string(),
            rarity: Rarity::Rare,
            stats: SnowmanStats::new(80, 90, 40, 95, 60).unwrap(),
            fun_fact: "Wears a borrowed scarf.".to_string(),
        }
    }

    #[test]
    fn test_display_image_prefers_sticker() {
        let photo = ImageData::from_bytes(JPEG_BYTES.to_vec()).unwrap();
        let sticker = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap();

        let with_sticker = SnowmanEntry::new(frosty(), photo.clone(), Some(sticker.clone()));
        assert_eq!(with_sticker.display_image(), &sticker);

        let without = SnowmanEntry::new(frosty(), photo.clone(), None);
        assert_eq!(without.display_image(), &photo);
        assert!(!without.has_sticker());
    }

    #[test]
    fn test_entry_json_shape() {
        let photo = ImageData::from_bytes(JPEG_BYTES.to_vec()).unwrap();
        let entry = SnowmanEntry::new(frosty(), photo, None);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["name"], "Frosty");
        assert_eq!(json["type"], "Ice");
        assert_eq!(json["rarity"], "Rare");
        assert_eq!(json["funFact"], "Wears a borrowed scarf.");
        assert_eq!(json["stats"]["chillFactor"], 95);
        assert!(json["capturedAt"].is_i64());
        assert!(json["sourceImage"].as_str().unwrap().starts_with("data:image/jpeg"));
        assert!(json.get("stickerImage").is_none());
    }

    #[test]
    fn test_entry_roundtrip_preserves_fields() {
        let photo = ImageData::from_bytes(JPEG_BYTES.to_vec()).unwrap();
        let sticker = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let entry = SnowmanEntry::new(frosty(), photo, Some(sticker));

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: SnowmanEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, entry);
    }
}
