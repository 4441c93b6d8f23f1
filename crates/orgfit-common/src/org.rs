use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{matching::weights::is_leader_title, NodeId, Person};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    pub id: NodeId,
    pub name: String,
    pub parent_id: Option<NodeId>,
}

/// 組織ツリー（親子関係のみ。表示レイアウトは扱わない）
#[derive(Debug, Clone, Default)]
pub struct OrgTree {
    nodes: HashMap<NodeId, OrgNode>,
}

impl OrgTree {
    pub fn new(nodes: impl IntoIterator<Item = OrgNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&OrgNode> {
        self.nodes.get(id)
    }

    /// 祖先ノード（近い順）。循環参照は検出して打ち切る
    pub fn ancestors(&self, id: &str) -> Vec<&OrgNode> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut current = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                warn!(node_id = id, parent_id, "cycle in org tree; stopping ancestor walk");
                break;
            }
            let Some(parent) = self.nodes.get(parent_id) else {
                break;
            };
            out.push(parent);
            current = parent.parent_id.as_deref();
        }

        out
    }

    /// 指定ノード所属の人物（募集枠を含む）
    pub fn people_in_node<'a>(&self, id: &str, people: &'a [Person]) -> Vec<&'a Person> {
        people
            .iter()
            .filter(|p| p.node_id.as_deref() == Some(id))
            .collect()
    }

    /// 上位ノードのリーダー（近い祖先から順に）
    pub fn parent_managers<'a>(
        &self,
        id: &str,
        people: &'a [Person],
        leader_keywords: &[&str],
    ) -> Vec<&'a Person> {
        self.ancestors(id)
            .into_iter()
            .flat_map(|ancestor| self.people_in_node(&ancestor.id, people))
            .filter(|p| !p.is_vacancy() && is_leader_title(&p.job_title, leader_keywords))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::weights::LEADER_KEYWORDS;

    fn node(id: &str, parent: Option<&str>) -> OrgNode {
        OrgNode {
            id: id.into(),
            name: format!("Node {id}"),
            parent_id: parent.map(Into::into),
        }
    }

    fn member(id: &str, node: &str, title: &str) -> Person {
        Person {
            id: id.into(),
            first_name: id.into(),
            job_title: title.into(),
            node_id: Some(node.into()),
            ..Person::default()
        }
    }

    fn tree() -> OrgTree {
        OrgTree::new(vec![
            node("root", None),
            node("eng", Some("root")),
            node("platform", Some("eng")),
        ])
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let tree = tree();
        let ids: Vec<_> = tree
            .ancestors("platform")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["eng", "root"]);
        assert!(tree.ancestors("root").is_empty());
        assert!(tree.ancestors("missing").is_empty());
    }

    #[test]
    fn cycles_do_not_loop_forever() {
        let tree = OrgTree::new(vec![node("a", Some("b")), node("b", Some("a"))]);
        let ids: Vec<_> = tree.ancestors("a").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn parent_managers_are_leaders_of_ancestor_nodes() {
        let people = vec![
            member("ceo", "root", "CEO"),
            member("vp", "eng", "Director of Engineering"),
            member("dev", "eng", "Engineer"),
            member("local", "platform", "Platform Lead"),
        ];

        let managers = tree().parent_managers("platform", &people, LEADER_KEYWORDS);
        let ids: Vec<_> = managers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["vp", "ceo"]);
    }
}
