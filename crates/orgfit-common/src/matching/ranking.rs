use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ko_checks::{run_all_ko_checks, KnockoutResult},
    scoring::{FitScoringEngine, RoleFitBreakdown},
};
use crate::{Person, PersonId, Role, RoleId};

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    /// 返却する候補の最大数
    pub top_n: usize,
    /// 要求レベルからの上振れ許容段階数
    pub seniority_cutoff: i8,
}

#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub person: Person,
    pub breakdown: RoleFitBreakdown,
    /// 「現在の所属」表示用
    pub current_location: Option<String>,
    pub ko: KnockoutResult,
}

/// 募集ポジションに対する社内候補者ランキング
pub struct CandidateRankingEngine {
    scoring: FitScoringEngine,
    config: RankingConfig,
}

impl CandidateRankingEngine {
    pub fn new(scoring: FitScoringEngine) -> Self {
        let config = RankingConfig {
            top_n: scoring.config().top_n,
            seniority_cutoff: scoring.config().ranking_cutoff,
        };
        Self { scoring, config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// 除外チェックを通過した候補のみロールフィットを算出して返す
    pub fn evaluate_candidate(
        &self,
        role: &Role,
        candidate: &Person,
        exclude_ids: &HashSet<PersonId>,
    ) -> Option<RankedCandidate> {
        let ko = run_all_ko_checks(role, candidate, exclude_ids, self.config.seniority_cutoff);
        if ko.is_hard_knockout {
            debug!(
                role_id = %role.id,
                person_id = %candidate.id,
                reasons = ko.hard_ko_reasons().as_deref().unwrap_or(""),
                "candidate excluded"
            );
            return None;
        }

        Some(RankedCandidate {
            breakdown: self.scoring.role_fit(role, candidate),
            current_location: candidate.node_name.clone(),
            person: candidate.clone(),
            ko,
        })
    }

    /// ロールフィット降順、同点は人物ID昇順で上位 top_n 件
    pub fn rank(
        &self,
        pool: &[Person],
        role: &Role,
        exclude_ids: &HashSet<PersonId>,
        top_n: usize,
    ) -> Vec<RankedCandidate> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ranked: Vec<_> = pool
            .iter()
            .filter(|p| seen.insert(p.id.as_str()))
            .filter_map(|p| self.evaluate_candidate(role, p, exclude_ids))
            .collect();

        ranked.sort_by(|a, b| {
            b.breakdown
                .role_fit_score
                .cmp(&a.breakdown.role_fit_score)
                .then_with(|| a.person.id.cmp(&b.person.id))
        });
        ranked.truncate(top_n);

        debug!(
            role_id = %role.id,
            pool = pool.len(),
            returned = ranked.len(),
            "ranked candidates"
        );
        ranked
    }

    /// 設定の top_n でランキング
    pub fn shortlist(
        &self,
        pool: &[Person],
        role: &Role,
        exclude_ids: &HashSet<PersonId>,
    ) -> Vec<RankedCandidate> {
        self.rank(pool, role, exclude_ids, self.config.top_n)
    }
}

/// ショートリスト永続化側へ渡すレコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistEntry {
    pub run_id: String,
    pub role_id: RoleId,
    pub person_id: PersonId,
    /// 1 始まりの順位
    pub rank: u32,
    pub role_fit_score: u8,
    pub skill_score: f64,
    pub seniority_score: f64,
    pub needs_manual_review: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl RankedCandidate {
    pub fn to_shortlist_entry(
        &self,
        run_id: impl Into<String>,
        role_id: impl Into<RoleId>,
        rank: u32,
        created_at: Option<DateTime<Utc>>,
    ) -> ShortlistEntry {
        ShortlistEntry {
            run_id: run_id.into(),
            role_id: role_id.into(),
            person_id: self.person.id.clone(),
            rank,
            role_fit_score: self.breakdown.role_fit_score,
            skill_score: self.breakdown.skill_score,
            seniority_score: self.breakdown.seniority_score,
            needs_manual_review: self.ko.needs_manual_review,
            created_at,
        }
    }
}
