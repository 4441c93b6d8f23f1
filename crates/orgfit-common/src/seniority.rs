use serde::{Deserialize, Deserializer, Serialize};
use strum::AsRefStr;
use tracing::warn;

/// 5段階のシニオリティ（全スコアリングで共通の全順序）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Lead,
    #[serde(rename = "C-Level")]
    #[strum(serialize = "C-Level")]
    CLevel,
}

pub const SENIORITY_SCALE: [Seniority; 5] = [
    Seniority::Junior,
    Seniority::Mid,
    Seniority::Senior,
    Seniority::Lead,
    Seniority::CLevel,
];

impl Seniority {
    /// 1〜5 のランク
    pub fn level(self) -> u8 {
        match self {
            Seniority::Junior => 1,
            Seniority::Mid => 2,
            Seniority::Senior => 3,
            Seniority::Lead => 4,
            Seniority::CLevel => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        SENIORITY_SCALE.iter().copied().find(|s| s.level() == level)
    }
}

/// 自由入力のシニオリティ評価を5段階へ補正
pub fn correct_seniority(input: &str) -> Option<Seniority> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(exact) = SENIORITY_SCALE
        .iter()
        .copied()
        .find(|s| s.as_ref().eq_ignore_ascii_case(&lower))
    {
        return Some(exact);
    }

    let compact: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();

    // "3", "L3", "level 3"
    if let Ok(level) = compact
        .trim_start_matches("level")
        .trim_start_matches('l')
        .parse::<u8>()
    {
        return Seniority::from_level(level);
    }

    if compact.starts_with("clevel")
        || compact.contains("executive")
        || ["ceo", "cto", "coo", "cfo", "cxo"].contains(&compact.as_str())
    {
        return Some(Seniority::CLevel);
    }
    if compact.contains("lead") || compact.contains("principal") || compact.contains("staff") {
        return Some(Seniority::Lead);
    }
    if compact.contains("senior") || compact == "sr" {
        return Some(Seniority::Senior);
    }
    if compact.contains("mid") || compact.contains("intermediate") || compact.contains("medior") {
        return Some(Seniority::Mid);
    }
    if compact.contains("junior")
        || compact == "jr"
        || compact.contains("intern")
        || compact.contains("entry")
    {
        return Some(Seniority::Junior);
    }

    None
}

/// 取り込み用: 自由入力を `correct_seniority` で補正する（判別不能は未設定扱い）
///
/// `#[serde(default, deserialize_with = "...")]` で `Option<Seniority>` フィールドに付ける。
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Seniority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|text| {
        let corrected = correct_seniority(text);
        if corrected.is_none() && !text.trim().is_empty() {
            warn!(value = text, "unrecognized seniority; treating as unknown");
        }
        corrected
    }))
}

/// 実レベル − 要求レベル（どちらか不明なら None）
pub fn seniority_gap(required: Option<Seniority>, actual: Option<Seniority>) -> Option<i8> {
    let req = required?.level() as i8;
    let act = actual?.level() as i8;
    Some(act - req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        assert!(Seniority::Junior < Seniority::Mid);
        assert!(Seniority::Lead < Seniority::CLevel);
        for (idx, s) in SENIORITY_SCALE.iter().enumerate() {
            assert_eq!(s.level() as usize, idx + 1);
            assert_eq!(Seniority::from_level(s.level()), Some(*s));
        }
        assert_eq!(Seniority::from_level(0), None);
        assert_eq!(Seniority::from_level(6), None);
    }

    #[test]
    fn serializes_c_level_with_hyphen() {
        let json = serde_json::to_string(&Seniority::CLevel).unwrap();
        assert_eq!(json, "\"C-Level\"");
        let parsed: Seniority = serde_json::from_str("\"Mid\"").unwrap();
        assert_eq!(parsed, Seniority::Mid);
        assert_eq!(Seniority::CLevel.as_ref(), "C-Level");
    }

    #[test]
    fn normalizes_free_text_assessments() {
        assert_eq!(correct_seniority("Senior"), Some(Seniority::Senior));
        assert_eq!(correct_seniority("c-level"), Some(Seniority::CLevel));
        assert_eq!(correct_seniority("Mid-level"), Some(Seniority::Mid));
        assert_eq!(correct_seniority("Sr."), Some(Seniority::Senior));
        assert_eq!(correct_seniority("Tech Lead"), Some(Seniority::Lead));
        assert_eq!(correct_seniority("CTO"), Some(Seniority::CLevel));
        assert_eq!(correct_seniority("intern"), Some(Seniority::Junior));
        assert_eq!(correct_seniority("   "), None);
        assert_eq!(correct_seniority("astronaut"), None);
    }

    #[test]
    fn numeric_levels_map_onto_the_scale() {
        assert_eq!(correct_seniority("3"), Some(Seniority::Senior));
        assert_eq!(correct_seniority("L4"), Some(Seniority::Lead));
        assert_eq!(correct_seniority("Level 1"), Some(Seniority::Junior));
        assert_eq!(correct_seniority("9"), None);
    }

    #[derive(Debug, Deserialize)]
    struct Assessed {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        level: Option<Seniority>,
    }

    fn assessed(json: &str) -> Option<Seniority> {
        serde_json::from_str::<Assessed>(json).unwrap().level
    }

    #[test]
    fn lenient_deserializer_corrects_free_text() {
        assert_eq!(assessed(r#"{"level":"senior"}"#), Some(Seniority::Senior));
        assert_eq!(assessed(r#"{"level":"Sr."}"#), Some(Seniority::Senior));
        assert_eq!(assessed(r#"{"level":"C-Level"}"#), Some(Seniority::CLevel));
        assert_eq!(assessed(r#"{"level":"wizard"}"#), None);
        assert_eq!(assessed(r#"{"level":null}"#), None);
        assert_eq!(assessed("{}"), None);
    }

    #[test]
    fn gap_needs_both_sides() {
        assert_eq!(
            seniority_gap(Some(Seniority::Mid), Some(Seniority::Senior)),
            Some(1)
        );
        assert_eq!(
            seniority_gap(Some(Seniority::Senior), Some(Seniority::Junior)),
            Some(-2)
        );
        assert_eq!(seniority_gap(None, Some(Seniority::Junior)), None);
        assert_eq!(seniority_gap(Some(Seniority::Mid), None), None);
    }
}
