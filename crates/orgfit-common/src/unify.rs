//! Role/person unification.
//!
//! Explicit `Role` records (with time-boxed assignments) and the legacy model, where a
//! role is only implied by a person's job title, are normalized into one list of
//! [`UnifiedPosition`]s per organizational node.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::{debug, warn};

use crate::{
    matching::{FitScoringEngine, Metrics},
    Assignment, Person, Role,
};

/// ポジションの出自
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PositionOrigin {
    Explicit,
    Implicit,
}

/// 正規化前の入力（閉じた直和型。呼び出し側で重複判定を持たないこと）
#[derive(Debug, Clone, Copy)]
pub enum PositionSource<'a> {
    Explicit {
        role: &'a Role,
        assignment: Option<&'a Assignment>,
        assignee: Option<&'a Person>,
    },
    Implicit {
        person: &'a Person,
    },
}

impl PositionSource<'_> {
    fn origin(&self) -> PositionOrigin {
        match self {
            PositionSource::Explicit { .. } => PositionOrigin::Explicit,
            PositionSource::Implicit { .. } => PositionOrigin::Implicit,
        }
    }
}

/// 表示用の派生ビュー（永続化しない。入力が変われば作り直す）
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedPosition {
    pub role: Role,
    pub assignee: Option<Person>,
    pub assignment: Option<Assignment>,
    pub metrics: Metrics,
    pub origin: PositionOrigin,
}

pub struct UnifiedPositionBuilder {
    scoring: FitScoringEngine,
}

impl UnifiedPositionBuilder {
    pub fn new(scoring: FitScoringEngine) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &FitScoringEngine {
        &self.scoring
    }

    /// ノード内のポジション一覧を構築する（明示ロール → 暗黙ロールの順、並べ替えなし）
    pub fn build(
        &self,
        node_roles: &[Role],
        people_in_node: &[Person],
        all_people: &[Person],
        company_values: &[String],
        parent_managers: &[Person],
    ) -> Vec<UnifiedPosition> {
        let sources = collect_sources(node_roles, people_in_node, all_people);
        debug!(
            roles = node_roles.len(),
            people = people_in_node.len(),
            positions = sources.len(),
            "built position sources"
        );

        sources
            .into_iter()
            .map(|source| self.normalize(source, company_values, parent_managers))
            .collect()
    }

    /// 直和型から `UnifiedPosition` を作る唯一の経路
    pub fn normalize(
        &self,
        source: PositionSource<'_>,
        company_values: &[String],
        parent_managers: &[Person],
    ) -> UnifiedPosition {
        let origin = source.origin();
        let (role, assignment, assignee) = match source {
            PositionSource::Explicit {
                role,
                assignment,
                assignee,
            } => (role.clone(), assignment.cloned(), assignee.cloned()),
            PositionSource::Implicit { person } => {
                let assignee = (!person.is_vacancy()).then(|| person.clone());
                (Role::implicit_for(person), None, assignee)
            }
        };

        let metrics =
            self.scoring
                .score(&role, assignee.as_ref(), company_values, parent_managers);

        UnifiedPosition {
            role,
            assignee,
            assignment,
            metrics,
            origin,
        }
    }
}

fn collect_sources<'a>(
    node_roles: &'a [Role],
    people_in_node: &'a [Person],
    all_people: &'a [Person],
) -> Vec<PositionSource<'a>> {
    let mut sources = Vec::with_capacity(node_roles.len() + people_in_node.len());

    if node_roles.is_empty() {
        let mut emitted: HashSet<&str> = HashSet::new();
        for person in people_in_node {
            if !person.is_vacancy() && !emitted.insert(person.id.as_str()) {
                warn!(person_id = %person.id, "duplicate person in node; skipped");
                continue;
            }
            sources.push(PositionSource::Implicit { person });
        }
        return sources;
    }

    let mut attached: HashSet<&str> = HashSet::new();
    for role in node_roles {
        let assignment = role.primary_assignment();
        let assignee = match resolve_assignee(role, assignment, people_in_node, all_people)
            .filter(|p| !p.is_vacancy())
        {
            Some(p) if !attached.insert(p.id.as_str()) => {
                warn!(
                    role_id = %role.id,
                    person_id = %p.id,
                    "person is primary on several roles in node; left unassigned"
                );
                None
            }
            other => other,
        };

        sources.push(PositionSource::Explicit {
            role,
            assignment,
            assignee,
        });
    }

    let claimed: HashSet<&str> = node_roles.iter().filter_map(Role::holder_id).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    for person in people_in_node {
        if claimed.contains(person.id.as_str())
            || person.is_vacancy()
            || !person.has_identity()
            || !emitted.insert(person.id.as_str())
        {
            continue;
        }
        sources.push(PositionSource::Implicit { person });
    }

    sources
}

/// primary アサインメントの人物 → 事前結合済み現任者の順で解決する
fn resolve_assignee<'a>(
    role: &'a Role,
    assignment: Option<&'a Assignment>,
    people_in_node: &'a [Person],
    all_people: &'a [Person],
) -> Option<&'a Person> {
    let prejoined = role.current_assignee.as_deref();

    let Some(assignment) = assignment else {
        return prejoined;
    };

    let found = all_people
        .iter()
        .chain(people_in_node)
        .find(|p| p.id == assignment.person_id)
        .or_else(|| prejoined.filter(|p| p.id == assignment.person_id));

    if found.is_none() {
        warn!(
            role_id = %role.id,
            person_id = %assignment.person_id,
            "primary assignee not found in people snapshot"
        );
    }
    found
}
