use unicode_normalization::UnicodeNormalization;

use crate::{HardSkillRecord, SkillRequirement};

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCoverage {
    /// 0〜100（要件なしは 100）
    pub percentage: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// 未充足のうち mandatory 指定のもの
    pub missing_mandatory: Vec<String>,
}

impl SkillCoverage {
    fn no_requirement() -> Self {
        Self {
            percentage: 100.0,
            matched: vec![],
            missing: vec![],
            missing_mandatory: vec![],
        }
    }
}

/// スキル名の正規化（NFKC → trim → 小文字化）
pub fn normalize_skill(name: &str) -> String {
    name.nfkc().collect::<String>().trim().to_lowercase()
}

/// 双方向の部分一致（"leadership" ⊂ "team leadership" も、その逆も一致）
pub fn skills_overlap(required: &str, possessed: &str) -> bool {
    let required = normalize_skill(required);
    let possessed = normalize_skill(possessed);
    if required.is_empty() || possessed.is_empty() {
        return false;
    }
    required.contains(&possessed) || possessed.contains(&required)
}

/// 必須ソフトスキルの充足判定
pub fn match_soft_skills(required: &[SkillRequirement], possessed: &[String]) -> SkillCoverage {
    let possessed: Vec<&str> = possessed.iter().map(String::as_str).collect();
    coverage(required, &possessed)
}

/// 必須ハードスキルの充足判定（本人のハードスキル記録と突き合わせる）
pub fn match_hard_skills(
    required: &[SkillRequirement],
    records: &[HardSkillRecord],
) -> SkillCoverage {
    let possessed: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    coverage(required, &possessed)
}

fn coverage(required: &[SkillRequirement], possessed: &[&str]) -> SkillCoverage {
    let required: Vec<&SkillRequirement> = required
        .iter()
        .filter(|r| !normalize_skill(&r.name).is_empty())
        .collect();

    if required.is_empty() {
        return SkillCoverage::no_requirement();
    }

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut missing_mandatory = Vec::new();

    for req in &required {
        if possessed.iter().any(|p| skills_overlap(&req.name, p)) {
            matched.push(req.name.trim().to_string());
        } else {
            missing.push(req.name.trim().to_string());
            if req.mandatory {
                missing_mandatory.push(req.name.trim().to_string());
            }
        }
    }

    let percentage = 100.0 * matched.len() as f64 / required.len() as f64;

    SkillCoverage {
        percentage,
        matched,
        missing,
        missing_mandatory,
    }
}
