/// ロールフィットの重み（スキル充足 50% / シニオリティ整合 50%）
pub const ROLE_FIT_WEIGHTS: FitWeights = FitWeights {
    skills: 0.5,
    seniority: 0.5,
};

/// シニオリティ差 1 段階あたりの減点
/// 上振れ（オーバースペック）は下振れの2倍厳しく減点する
pub const SENIORITY_PENALTIES: SeniorityPenalties = SeniorityPenalties {
    over_per_level: 30.0,
    under_per_level: 15.0,
};

/// 候補者ランキングで許容する上振れ段階数（これを超えると除外）
pub const RANKING_SENIORITY_CUTOFF: i8 = 1;

/// ランキングの既定返却件数
pub const DEFAULT_TOP_N: usize = 5;

/// 職種名にこれらを含めばリーダー扱い（大文字小文字無視）
pub const LEADER_KEYWORDS: &[&str] = &["head", "manager", "lead", "director", "ceo", "cto", "coo"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitWeights {
    pub skills: f64,
    pub seniority: f64,
}

impl FitWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.seniority
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeniorityPenalties {
    pub over_per_level: f64,
    pub under_per_level: f64,
}

/// 職種名がリーダー系キーワードを含むか
pub fn is_leader_title(title: &str, keywords: &[&str]) -> bool {
    let title = title.to_lowercase();
    keywords.iter().any(|k| title.contains(&k.to_lowercase()))
}
