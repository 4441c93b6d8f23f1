use std::collections::HashSet;

use crate::{seniority::seniority_gap, Person, PersonId, Role};

/// 候補者の除外判定
#[derive(Debug, Clone, PartialEq)]
pub enum KoDecision {
    /// 確実に除外（ランキング対象外）
    HardKo { reason: String },

    /// ランキングには残すが要確認
    /// 例: シニオリティ評価が未設定
    SoftKo { reason: String },

    Pass,
}

impl KoDecision {
    pub fn is_hard_ko(&self) -> bool {
        matches!(self, KoDecision::HardKo { .. })
    }

    pub fn needs_manual_review(&self) -> bool {
        matches!(self, KoDecision::SoftKo { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            KoDecision::HardKo { reason } | KoDecision::SoftKo { reason } => Some(reason.as_str()),
            KoDecision::Pass => None,
        }
    }
}

/// 全チェック結果の集約
#[derive(Debug, Clone, PartialEq)]
pub struct KnockoutResult {
    pub is_hard_knockout: bool,
    pub needs_manual_review: bool,
    /// （チェック名, 判定）
    pub decisions: Vec<(&'static str, KoDecision)>,
}

impl KnockoutResult {
    pub fn new(decisions: Vec<(&'static str, KoDecision)>) -> Self {
        let is_hard_knockout = decisions.iter().any(|(_, d)| d.is_hard_ko());
        let needs_manual_review = decisions.iter().any(|(_, d)| d.needs_manual_review());

        Self {
            is_hard_knockout,
            needs_manual_review,
            decisions,
        }
    }

    /// HardKo の理由を ; 区切りで連結
    pub fn hard_ko_reasons(&self) -> Option<String> {
        self.joined(KoDecision::is_hard_ko)
    }

    /// SoftKo の理由を ; 区切りで連結
    pub fn manual_review_reasons(&self) -> Option<String> {
        self.joined(KoDecision::needs_manual_review)
    }

    fn joined(&self, pick: fn(&KoDecision) -> bool) -> Option<String> {
        let reasons: Vec<_> = self
            .decisions
            .iter()
            .filter(|(_, d)| pick(d))
            .filter_map(|(name, d)| d.reason().map(|r| format!("{name}: {r}")))
            .collect();

        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}

/// 募集ロールに対する候補者の除外チェックをまとめて実行する
pub fn run_all_ko_checks(
    role: &Role,
    candidate: &Person,
    exclude_ids: &HashSet<PersonId>,
    seniority_cutoff: i8,
) -> KnockoutResult {
    let decisions = vec![
        ("own_slot", check_own_slot(role, candidate)),
        ("excluded", check_excluded(candidate, exclude_ids)),
        ("vacancy", check_vacancy(candidate)),
        ("identity", check_identity(candidate)),
        (
            "seniority_cutoff",
            check_seniority_cutoff(role, candidate, seniority_cutoff),
        ),
    ];

    KnockoutResult::new(decisions)
}

/// ロール自身の席（現任者 / 暗黙ロールの元人物）は候補にしない
fn check_own_slot(role: &Role, candidate: &Person) -> KoDecision {
    let holds_role = role.holder_id() == Some(candidate.id.as_str());
    let is_implicit_origin = role.implicit_origin() == Some(candidate.id.as_str());

    if holds_role || is_implicit_origin {
        KoDecision::HardKo {
            reason: format!("{} already holds role {}", candidate.id, role.id),
        }
    } else {
        KoDecision::Pass
    }
}

fn check_excluded(candidate: &Person, exclude_ids: &HashSet<PersonId>) -> KoDecision {
    if exclude_ids.contains(&candidate.id) {
        KoDecision::HardKo {
            reason: "listed by caller".into(),
        }
    } else {
        KoDecision::Pass
    }
}

fn check_vacancy(candidate: &Person) -> KoDecision {
    if candidate.is_vacancy() {
        KoDecision::HardKo {
            reason: "placeholder, not a person".into(),
        }
    } else {
        KoDecision::Pass
    }
}

fn check_identity(candidate: &Person) -> KoDecision {
    if candidate.has_identity() {
        KoDecision::Pass
    } else {
        KoDecision::HardKo {
            reason: "identity_missing: no first or last name".into(),
        }
    }
}

/// 要求レベルを cutoff 段階より大きく上回る候補は除外
fn check_seniority_cutoff(role: &Role, candidate: &Person, cutoff: i8) -> KoDecision {
    match seniority_gap(role.required_seniority, candidate.seniority_assessment) {
        Some(gap) if gap > cutoff => KoDecision::HardKo {
            reason: format!("over_qualified: {gap} levels above requirement (limit {cutoff})"),
        },
        Some(_) => KoDecision::Pass,
        None if role.required_seniority.is_some() => KoDecision::SoftKo {
            reason: "seniority_unknown: candidate has no seniority assessment".into(),
        },
        None => KoDecision::Pass,
    }
}
