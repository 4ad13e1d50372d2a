//! Fixed instructions and the response schema sent with every request.

use serde_json::{Value, json};

use snowdex_core::{Rarity, StatKind};

/// Instruction sent with the photo for structured analysis.
pub const ANALYSIS_PROMPT: &str = "이 눈사람 사진을 도감용 데이터로 분석해줘. 이름과 설명은 아주 창의적이고 수집하고 싶게끔 매력적인 한국어로 작성해줘.";

/// Instruction sent with the photo for sticker generation.
pub const STICKER_PROMPT: &str = "Generate a cute, high-quality, flat vector sticker illustration of this snowman. Isolated on white background, thick white border, sticker style, vibrant colors, pokemon character design.";

/// Aspect ratio requested for stickers.
pub const STICKER_ASPECT_RATIO: &str = "1:1";

/// User-visible message shown when analysis fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "눈사람 분석에 실패했습니다. 사진 품질을 확인해주세요.";

/// Response schema enforced on the analysis call.
#[must_use]
pub fn analysis_schema() -> Value {
    let rarities: Vec<&str> = Rarity::ALL.iter().map(|r| r.as_str()).collect();

    let stat_properties: serde_json::Map<String, Value> = StatKind::ALL
        .iter()
        .map(|kind| {
            (
                kind.field_name().to_string(),
                json!({ "type": "INTEGER", "description": "1-100" }),
            )
        })
        .collect();
    let stat_names: Vec<&str> = StatKind::ALL.iter().map(|kind| kind.field_name()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "눈사람의 창의적인 한국어 이름"
            },
            "description": {
                "type": "STRING",
                "description": "도감 설명 (2-3문장)"
            },
            "type": {
                "type": "STRING",
                "description": "속성 (예: 서리, 진흙, 얼음, 요정, 도시)"
            },
            "rarity": {
                "type": "STRING",
                "enum": rarities
            },
            "stats": {
                "type": "OBJECT",
                "properties": stat_properties,
                "required": stat_names
            },
            "funFact": {
                "type": "STRING",
                "description": "재미있는 사실 한 가지"
            }
        },
        "required": ["name", "description", "type", "rarity", "stats", "funFact"]
    })
}
