use std::collections::HashMap;

use super::error::TreeError;
use super::types::{OrphanPolicy, PermissionNode};
use crate::types::{PermissionId, PermissionRecord};

/// Assembles a flat permission list into an ordered forest.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    orphan_policy: OrphanPolicy,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Build the forest.
    ///
    /// Every record is attached exactly once, to the root list or to its
    /// parent's children. Records whose parent chain never reaches a root
    /// (cycles) are therefore unreachable and left out. Siblings are sorted
    /// by `order` with a stable sort, so ties keep input order.
    pub fn build(&self, records: &[PermissionRecord]) -> Result<Vec<PermissionNode>, TreeError> {
        let mut index: HashMap<PermissionId, usize> = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.contains_key(&record.id) {
                tracing::warn!("Duplicate permission id {} at position {}, keeping first", record.id, pos);
                continue;
            }
            index.insert(record.id, pos);
        }

        let mut roots: Vec<usize> = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];

        for (pos, record) in records.iter().enumerate() {
            if index.get(&record.id) != Some(&pos) {
                continue;
            }

            let Some(parent_id) = record.parent_id else {
                roots.push(pos);
                continue;
            };

            match index.get(&parent_id) {
                Some(&parent_pos) => children[parent_pos].push(pos),
                None => match self.orphan_policy {
                    OrphanPolicy::Drop => {
                        tracing::debug!("Dropping permission {}: parent {} not found", record.id, parent_id);
                    }
                    OrphanPolicy::PromoteToRoot => {
                        tracing::debug!("Promoting permission {} to root: parent {} not found", record.id, parent_id);
                        roots.push(pos);
                    }
                    OrphanPolicy::Reject => {
                        return Err(TreeError::DanglingParent {
                            id: record.id,
                            parent_id,
                        });
                    }
                },
            }
        }

        sort_by_order(&mut roots, records);
        for list in children.iter_mut() {
            sort_by_order(list, records);
        }

        let forest = assemble(&roots, records, &children);

        let placed = super::types::count_nodes(&forest);
        if placed < index.len() {
            tracing::debug!("{} permission(s) not placed in tree", index.len() - placed);
        }

        Ok(forest)
    }
}

/// Build the forest with the default policy, dropping dangling records.
pub fn build_tree(records: &[PermissionRecord]) -> Vec<PermissionNode> {
    // the drop policy never fails
    TreeBuilder::new().build(records).unwrap_or_default()
}

fn sort_by_order(positions: &mut [usize], records: &[PermissionRecord]) {
    // slice::sort_by_key is stable
    positions.sort_by_key(|&pos| records[pos].order);
}

/// Post-order assembly with an explicit stack; tree depth is bounded only by
/// the input size.
fn assemble(roots: &[usize], records: &[PermissionRecord], children: &[Vec<usize>]) -> Vec<PermissionNode> {
    let mut built: Vec<Option<PermissionNode>> = (0..records.len()).map(|_| None).collect();
    let mut stack: Vec<(usize, bool)> = roots.iter().map(|&pos| (pos, false)).collect();

    while let Some((pos, ready)) = stack.pop() {
        if ready {
            let kids = children[pos].iter().filter_map(|&child| built[child].take()).collect();
            built[pos] = Some(PermissionNode {
                record: records[pos].clone(),
                children: kids,
            });
        } else {
            stack.push((pos, true));
            stack.extend(children[pos].iter().map(|&child| (child, false)));
        }
    }

    roots.iter().filter_map(|&pos| built[pos].take()).collect()
}
