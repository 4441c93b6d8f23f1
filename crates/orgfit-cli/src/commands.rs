use std::collections::HashSet;

use chrono::{DateTime, Utc};
use orgfit_common::{
    api::{DetailedMetricsDto, PositionResponse, RankedCandidateResponse},
    matching::{CandidateRankingEngine, FitScoringEngine, RankedCandidate, ShortlistEntry},
    unify::UnifiedPositionBuilder,
    Person, PersonId,
};
use serde::Serialize;
use tracing::info;

use crate::snapshot::{OrgSnapshot, SnapshotError};

/// `positions` の出力 1 件
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    #[serde(flatten)]
    pub position: PositionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailedMetricsDto>,
}

pub fn positions(
    snapshot: &OrgSnapshot,
    scoring: &FitScoringEngine,
    node_id: &str,
    detailed: bool,
) -> Result<Vec<PositionView>, SnapshotError> {
    let tree = snapshot.tree();
    if tree.node(node_id).is_none() {
        return Err(SnapshotError::UnknownNode(node_id.to_string()));
    }

    let node_roles = snapshot.roles_in_node(node_id);
    let people_in_node: Vec<Person> = tree
        .people_in_node(node_id, &snapshot.people)
        .into_iter()
        .cloned()
        .collect();
    let managers: Vec<Person> = tree
        .parent_managers(node_id, &snapshot.people, scoring.config().leader_keywords)
        .into_iter()
        .cloned()
        .collect();

    let builder = UnifiedPositionBuilder::new(scoring.clone());
    let unified = builder.build(
        &node_roles,
        &people_in_node,
        &snapshot.people,
        &snapshot.company_values,
        &managers,
    );

    info!(
        node_id,
        positions = unified.len(),
        managers = managers.len(),
        "built node positions"
    );

    Ok(unified
        .iter()
        .map(|p| PositionView {
            position: PositionResponse::from(p),
            detail: detailed.then(|| {
                DetailedMetricsDto::from(&builder.scoring().detailed_score(
                    &p.role,
                    p.assignee.as_ref(),
                    &snapshot.company_values,
                    &managers,
                ))
            }),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct RankRequest<'a> {
    pub role_id: &'a str,
    pub top_n: Option<usize>,
    pub exclude: &'a [PersonId],
}

/// `rank` の出力。`--shortlist` では永続化用レコードを返す
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RankOutput {
    Candidates(Vec<RankedCandidateResponse>),
    Shortlist(Vec<ShortlistEntry>),
}

pub fn rank(
    snapshot: &OrgSnapshot,
    engine: &CandidateRankingEngine,
    request: &RankRequest<'_>,
) -> Result<Vec<RankedCandidateResponse>, SnapshotError> {
    let ranked = rank_raw(snapshot, engine, request)?;
    Ok(RankedCandidateResponse::from_ranking(&ranked))
}

pub fn shortlist(
    snapshot: &OrgSnapshot,
    engine: &CandidateRankingEngine,
    request: &RankRequest<'_>,
    run_id: &str,
    created_at: DateTime<Utc>,
) -> Result<Vec<ShortlistEntry>, SnapshotError> {
    let ranked = rank_raw(snapshot, engine, request)?;
    Ok(ranked
        .iter()
        .zip(1u32..)
        .map(|(candidate, rank)| {
            candidate.to_shortlist_entry(run_id, request.role_id, rank, Some(created_at))
        })
        .collect())
}

fn rank_raw(
    snapshot: &OrgSnapshot,
    engine: &CandidateRankingEngine,
    request: &RankRequest<'_>,
) -> Result<Vec<RankedCandidate>, SnapshotError> {
    let role = snapshot.find_role(request.role_id)?;
    let exclude: HashSet<PersonId> = request.exclude.iter().cloned().collect();
    let top_n = request.top_n.unwrap_or(engine.config().top_n);

    let ranked = engine.rank(&snapshot.people, &role, &exclude, top_n);
    info!(
        role_id = %role.id,
        pool = snapshot.people.len(),
        excluded = exclude.len(),
        returned = ranked.len(),
        "ranked candidates for role"
    );
    Ok(ranked)
}
