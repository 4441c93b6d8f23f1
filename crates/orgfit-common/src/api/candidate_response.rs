use serde::{Deserialize, Serialize};

use crate::{
    matching::{RankedCandidate, SeniorityMatch},
    seniority::Seniority,
};

/// 候補者比較画面向け
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidateResponse {
    pub rank: u32,
    pub person_id: String,
    pub name: String,
    pub job_title: String,
    pub seniority: Option<Seniority>,
    /// 「現在の所属: X」
    pub current_location: Option<String>,
    pub role_fit_score: u8,
    pub skill_score: f64,
    pub seniority_score: f64,
    pub seniority_match: SeniorityMatch,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub manual_review_reason: Option<String>,
}

impl RankedCandidateResponse {
    /// rank は 1 始まり
    pub fn from_ranked(rank: u32, candidate: &RankedCandidate) -> Self {
        let breakdown = &candidate.breakdown;
        Self {
            rank,
            person_id: candidate.person.id.clone(),
            name: candidate.person.display_name(),
            job_title: candidate.person.job_title.clone(),
            seniority: candidate.person.seniority_assessment,
            current_location: candidate.current_location.clone(),
            role_fit_score: breakdown.role_fit_score,
            skill_score: breakdown.skill_score,
            seniority_score: breakdown.seniority_score,
            seniority_match: breakdown.seniority_match,
            matched_skills: breakdown.soft_skills.matched.clone(),
            missing_skills: breakdown.soft_skills.missing.clone(),
            manual_review_reason: candidate.ko.manual_review_reasons(),
        }
    }

    pub fn from_ranking(candidates: &[RankedCandidate]) -> Vec<Self> {
        candidates
            .iter()
            .zip(1u32..)
            .map(|(c, rank)| Self::from_ranked(rank, c))
            .collect()
    }
}
