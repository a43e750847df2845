//! The current selection: a set of node and/or connection ids.
//!
//! Rebuilt on every selection-changing gesture; order is irrelevant. Every
//! mutator reports whether the set actually changed so the controller only
//! notifies the host on real changes.

use diagraph_core::{DiagramSnapshot, ElementId};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: SmallVec<[ElementId; 8]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }

    /// `additive` flips membership of `id`; otherwise the set becomes `{id}`.
    pub fn toggle(&mut self, id: ElementId, additive: bool) -> bool {
        if additive {
            if let Some(pos) = self.ids.iter().position(|x| *x == id) {
                self.ids.remove(pos);
            } else {
                self.ids.push(id);
            }
            true
        } else {
            self.replace(vec![id])
        }
    }

    /// Replace the whole set. Returns false when the new set is equal
    /// (order-insensitively) to the current one.
    pub fn replace(&mut self, ids: Vec<ElementId>) -> bool {
        if same_set(&self.ids, &ids) {
            return false;
        }
        self.ids = SmallVec::from_vec(ids);
        true
    }

    /// Union with `ids` (box selection with the multi-select modifier).
    pub fn merge(&mut self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut changed = false;
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
                changed = true;
            }
        }
        changed
    }

    /// Drop ids that no longer exist in the snapshot, so a just-deleted
    /// element never lingers in the selection.
    pub fn prune(&mut self, snapshot: &DiagramSnapshot) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| snapshot.contains(*id));
        self.ids.len() != before
    }
}

fn same_set(a: &[ElementId], b: &[ElementId]) -> bool {
    a.len() == b.len() && b.iter().all(|id| a.contains(id))
}
