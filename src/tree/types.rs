use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TreeError;
use crate::types::{PermissionId, PermissionRecord};

/// A permission record together with its ordered children.
///
/// Serializes flat, i.e. `{ id, name, order, dad, children }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    #[serde(flatten)]
    pub record: PermissionRecord,
    #[serde(default)]
    pub children: Vec<PermissionNode>,
}

impl PermissionNode {
    pub fn new(record: PermissionRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> PermissionId {
        self.record.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// What to do with a record whose parent id is not in the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    #[default]
    Drop,
    #[serde(rename = "promote")]
    PromoteToRoot,
    Reject,
}

impl FromStr for OrphanPolicy {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(OrphanPolicy::Drop),
            "promote" | "promote-to-root" | "root" => Ok(OrphanPolicy::PromoteToRoot),
            "reject" => Ok(OrphanPolicy::Reject),
            other => Err(TreeError::UnknownOrphanPolicy(other.to_string())),
        }
    }
}

// Nested nodes are released one level at a time so dropping a deep tree
// does not recurse.
impl Drop for PermissionNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Total number of nodes in a forest
pub fn count_nodes(forest: &[PermissionNode]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&[PermissionNode]> = vec![forest];
    while let Some(nodes) = stack.pop() {
        count += nodes.len();
        stack.extend(nodes.iter().map(|n| n.children.as_slice()));
    }
    count
}

/// Depth-first, pre-order traversal yielding `(depth, node)`
pub fn walk(forest: &[PermissionNode]) -> Vec<(usize, &PermissionNode)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &PermissionNode)> = forest.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.push((depth, node));
        stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    }
    out
}

pub fn find(forest: &[PermissionNode], id: PermissionId) -> Option<&PermissionNode> {
    let mut stack: Vec<&PermissionNode> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id() == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}
