use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    matching::{DetailedMetrics, ManagerFit, Metrics, SeniorityMatch},
    unify::{PositionOrigin, UnifiedPosition},
    AssignmentType, RoleStatus,
};

/// 上長相性が算出不能な場合の表示値
pub const MANAGER_FIT_NOT_COMPUTABLE: i32 = -1;

/// 組織図カード向けポジション
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub role_id: String,
    pub role_title: String,
    pub role_status: RoleStatus,
    pub origin: PositionOrigin,
    pub is_hiring: bool,
    pub headcount: u32,
    /// 有効アサインメントの FTE 合計（%）
    pub staffed_fte: u32,
    pub assignee: Option<AssigneeSummary>,
    pub assignment: Option<AssignmentSummary>,
    pub metrics: MetricsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeSummary {
    pub id: String,
    pub name: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: String,
    pub assignment_type: AssignmentType,
    pub fte_percentage: u8,
    pub start_date: NaiveDate,
}

/// null = 算出不能（カードでは空欄表示）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub role_fit_score: u8,
    pub manager_fit_score: Option<u8>,
    pub culture_fit_score: u8,
    pub is_leader: bool,
}

impl From<&Metrics> for MetricsDto {
    fn from(value: &Metrics) -> Self {
        Self {
            role_fit_score: value.role_fit_score,
            manager_fit_score: value.manager_fit_score,
            culture_fit_score: value.culture_fit_score,
            is_leader: value.is_leader,
        }
    }
}

impl From<&UnifiedPosition> for PositionResponse {
    fn from(value: &UnifiedPosition) -> Self {
        Self {
            role_id: value.role.id.clone(),
            role_title: value.role.title.clone(),
            role_status: value.role.status,
            origin: value.origin,
            is_hiring: value.role.is_hiring,
            headcount: value.role.headcount,
            staffed_fte: value.role.staffed_fte(),
            assignee: value.assignee.as_ref().map(|p| AssigneeSummary {
                id: p.id.clone(),
                name: p.display_name(),
                job_title: p.job_title.clone(),
            }),
            assignment: value.assignment.as_ref().map(|a| AssignmentSummary {
                id: a.id.clone(),
                assignment_type: a.assignment_type,
                fte_percentage: a.fte_percentage,
                start_date: a.start_date,
            }),
            metrics: MetricsDto::from(&value.metrics),
        }
    }
}

/// 詳細パネル向け
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedMetricsDto {
    #[serde(flatten)]
    pub metrics: MetricsDto,
    pub matched_soft_skills: Vec<String>,
    pub missing_soft_skills: Vec<String>,
    pub missing_mandatory_skills: Vec<String>,
    pub matched_hard_skills: Vec<String>,
    pub missing_hard_skills: Vec<String>,
    pub seniority_match: SeniorityMatch,
    pub manager_fits: Vec<ManagerFitDto>,
    pub matched_culture_values: Vec<String>,
}

/// リスト描画用。score = -1 は算出不能
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagerFitDto {
    pub manager_id: String,
    pub manager_name: String,
    pub score: i32,
}

impl From<&ManagerFit> for ManagerFitDto {
    fn from(value: &ManagerFit) -> Self {
        Self {
            manager_id: value.manager_id.clone(),
            manager_name: value.manager_name.clone(),
            score: value
                .score
                .map(i32::from)
                .unwrap_or(MANAGER_FIT_NOT_COMPUTABLE),
        }
    }
}

impl From<&DetailedMetrics> for DetailedMetricsDto {
    fn from(value: &DetailedMetrics) -> Self {
        Self {
            metrics: MetricsDto::from(&value.metrics),
            matched_soft_skills: value.matched_soft_skills.clone(),
            missing_soft_skills: value.missing_soft_skills.clone(),
            missing_mandatory_skills: value.missing_mandatory_skills.clone(),
            matched_hard_skills: value.matched_hard_skills.clone(),
            missing_hard_skills: value.missing_hard_skills.clone(),
            seniority_match: value.seniority_match,
            manager_fits: value.manager_fits.iter().map(ManagerFitDto::from).collect(),
            matched_culture_values: value.matched_culture_values.clone(),
        }
    }
}
