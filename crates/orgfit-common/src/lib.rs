pub mod api;
pub mod compatibility;
pub mod error;
pub mod logging;
pub mod matching;
pub mod org;
pub mod run_id;
pub mod seniority;
pub mod unify;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use seniority::Seniority;

pub type PersonId = String;
pub type RoleId = String;
pub type NodeId = String;

/// 暗黙ロールIDの接頭辞（`implicit:<personId>`）
pub const IMPLICIT_ROLE_PREFIX: &str = "implicit:";

// Records handed over by the persistence layer. The core never mutates them.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub job_title: String,
    pub profile_code: Option<String>,
    #[serde(default, deserialize_with = "seniority::deserialize_lenient")]
    pub seniority_assessment: Option<Seniority>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub hard_skills: Vec<HardSkillRecord>,
    #[serde(default)]
    pub primary_values: Vec<String>,
    /// true = 実在の人物ではなく募集枠のプレースホルダ
    #[serde(default)]
    pub is_hiring: bool,
    pub node_id: Option<NodeId>,
    /// 所属ノード名（「現在の所属」表示用に事前結合済み）
    pub node_name: Option<String>,
    /// レガシーモデルで人物に紐づく「求める人物像」
    pub required_profile: Option<RequiredProfile>,
}

impl Person {
    pub fn has_identity(&self) -> bool {
        !self.first_name.trim().is_empty() || !self.last_name.trim().is_empty()
    }

    pub fn is_vacancy(&self) -> bool {
        self.is_hiring
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// プロファイルコード（空文字は未設定扱い）
    pub fn profile_code(&self) -> Option<&str> {
        self.profile_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardSkillRecord {
    pub name: String,
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredProfile {
    #[serde(default, deserialize_with = "seniority::deserialize_lenient")]
    pub required_seniority: Option<Seniority>,
    #[serde(default)]
    pub required_soft_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub required_hard_skills: Vec<SkillRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequirement {
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    pub level: Option<u8>,
}

impl SkillRequirement {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleStatus {
    #[default]
    Active,
    Vacant,
    Frozen,
    Planned,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentType {
    #[default]
    Primary,
    Interim,
    Backup,
    Training,
}

fn default_fte() -> u8 {
    100
}

fn default_headcount() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub role_id: RoleId,
    pub person_id: PersonId,
    #[serde(default)]
    pub assignment_type: AssignmentType,
    /// 0〜100（既定 100）
    #[serde(default = "default_fte")]
    pub fte_percentage: u8,
    pub start_date: NaiveDate,
    /// None = 現在有効
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Assignment {
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn is_primary_current(&self) -> bool {
        self.assignment_type == AssignmentType::Primary && self.is_current()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub node_id: Option<NodeId>,
    pub title: String,
    #[serde(default, deserialize_with = "seniority::deserialize_lenient")]
    pub required_seniority: Option<Seniority>,
    #[serde(default)]
    pub required_soft_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub required_hard_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub status: RoleStatus,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    #[serde(default)]
    pub is_hiring: bool,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// 永続化層で事前結合された現任者（任意）
    pub current_assignee: Option<Box<Person>>,
}

impl Role {
    /// 有効な primary アサインメント（複数あれば先頭）
    pub fn primary_assignment(&self) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.is_primary_current())
    }

    /// 有効なアサインメントの FTE 合計（100 = 1 人分）
    pub fn staffed_fte(&self) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.is_current())
            .map(|a| u32::from(a.fte_percentage.min(100)))
            .sum()
    }

    /// この役割の「席」を占めている人物ID
    pub fn holder_id(&self) -> Option<&str> {
        self.primary_assignment()
            .map(|a| a.person_id.as_str())
            .or_else(|| self.current_assignee.as_ref().map(|p| p.id.as_str()))
    }

    /// レガシーモデル: 職種名から推定した合成ロール
    pub fn implicit_for(person: &Person) -> Self {
        let profile = person.required_profile.clone().unwrap_or_default();
        Self {
            id: format!("{IMPLICIT_ROLE_PREFIX}{}", person.id),
            node_id: person.node_id.clone(),
            title: person.job_title.clone(),
            required_seniority: profile.required_seniority,
            required_soft_skills: profile.required_soft_skills,
            required_hard_skills: profile.required_hard_skills,
            status: if person.is_hiring {
                RoleStatus::Vacant
            } else {
                RoleStatus::Active
            },
            headcount: 1,
            is_hiring: person.is_hiring,
            assignments: Vec::new(),
            current_assignee: None,
        }
    }

    /// 暗黙ロールの元になった人物ID（明示ロールなら None）
    pub fn implicit_origin(&self) -> Option<&str> {
        self.id.strip_prefix(IMPLICIT_ROLE_PREFIX)
    }
}
