use std::path::{Path, PathBuf};

use orgfit_common::{org::OrgNode, org::OrgTree, Person, Role, IMPLICIT_ROLE_PREFIX};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown org node: {0}")]
    UnknownNode(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// 永続化層からエクスポートした組織スナップショット
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSnapshot {
    #[serde(default)]
    pub nodes: Vec<OrgNode>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub company_values: Vec<String>,
}

impl OrgSnapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Self = serde_json::from_str(raw)?;
        snapshot.fill_node_names();
        Ok(snapshot)
    }

    pub fn tree(&self) -> OrgTree {
        OrgTree::new(self.nodes.iter().cloned())
    }

    pub fn roles_in_node(&self, node_id: &str) -> Vec<Role> {
        self.roles
            .iter()
            .filter(|r| r.node_id.as_deref() == Some(node_id))
            .cloned()
            .collect()
    }

    /// 明示ロール、なければ `implicit:<personId>` の暗黙ロールを探す
    pub fn find_role(&self, role_id: &str) -> Result<Role, SnapshotError> {
        if let Some(role) = self.roles.iter().find(|r| r.id == role_id) {
            return Ok(role.clone());
        }

        role_id
            .strip_prefix(IMPLICIT_ROLE_PREFIX)
            .and_then(|person_id| self.people.iter().find(|p| p.id == person_id))
            .map(Role::implicit_for)
            .ok_or_else(|| SnapshotError::UnknownRole(role_id.to_string()))
    }

    /// 所属ノード名が未結合の人物に補完する
    fn fill_node_names(&mut self) {
        let tree = self.tree();
        for person in &mut self.people {
            if person.node_name.is_some() {
                continue;
            }
            person.node_name = person
                .node_id
                .as_deref()
                .and_then(|id| tree.node(id))
                .map(|node| node.name.clone());
        }
    }
}
