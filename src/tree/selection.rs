use std::collections::BTreeSet;

use super::types::{walk, PermissionNode};
use crate::types::{IdRef, PermissionId};

/// Ids currently checked for inclusion in a role (or, reused for roles, a user).
///
/// Never pruned against the current collection: ids that disappear from a
/// refetched list stay selected until the state is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: BTreeSet<PermissionId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state with `id` flipped
    pub fn toggle(&self, id: PermissionId) -> Self {
        let mut next = self.clone();
        next.toggle_in_place(id);
        next
    }

    pub fn toggle_in_place(&mut self, id: PermissionId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn is_selected(&self, id: PermissionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PermissionId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// `[{ "id": n }, ...]` for outbound payloads
    pub fn to_id_refs(&self) -> Vec<IdRef> {
        self.ids.iter().map(|&id| IdRef { id }).collect()
    }
}

impl FromIterator<PermissionId> for SelectionState {
    fn from_iter<I: IntoIterator<Item = PermissionId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Parent ids whose children are currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    ids: BTreeSet<PermissionId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state with `id` flipped. Leaf ids flip too; the renderer
    /// ignores them.
    pub fn toggle(&self, id: PermissionId) -> Self {
        let mut next = self.clone();
        next.toggle_in_place(id);
        next
    }

    pub fn toggle_in_place(&mut self, id: PermissionId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Mark `id` expanded; already expanded ids stay expanded
    pub fn expand(&mut self, id: PermissionId) {
        self.ids.insert(id);
    }

    pub fn is_expanded(&self, id: PermissionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<PermissionId> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = PermissionId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// A forest with its selection and expansion state, owned by one view.
#[derive(Debug, Clone, Default)]
pub struct TreeController {
    forest: Vec<PermissionNode>,
    selection: SelectionState,
    expansion: ExpansionState,
}

impl TreeController {
    pub fn new(forest: Vec<PermissionNode>) -> Self {
        Self {
            forest,
            selection: SelectionState::new(),
            expansion: ExpansionState::new(),
        }
    }

    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    pub fn forest(&self) -> &[PermissionNode] {
        &self.forest
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Replace the forest after a refetch. Selection is kept as is.
    pub fn replace_forest(&mut self, forest: Vec<PermissionNode>) {
        self.forest = forest;
    }

    pub fn toggle_selected(&mut self, id: PermissionId) -> &SelectionState {
        self.selection.toggle_in_place(id);
        &self.selection
    }

    pub fn is_selected(&self, id: PermissionId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn toggle_expanded(&mut self, id: PermissionId) -> &ExpansionState {
        self.expansion.toggle_in_place(id);
        &self.expansion
    }

    pub fn expand(&mut self, id: PermissionId) {
        self.expansion.expand(id);
    }

    pub fn is_expanded(&self, id: PermissionId) -> bool {
        self.expansion.is_expanded(id)
    }

    /// Expand every node that has children
    pub fn expand_all(&mut self) {
        self.expansion = walk(&self.forest)
            .into_iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(_, node)| node.id())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expansion = ExpansionState::new();
    }

    pub fn render_text(&self) -> String {
        super::render::render_text(&self.forest, &self.selection, &self.expansion)
    }
}
