//! Member buddy lists.
//!
//! A buddy list is an ordered set of member ids that never contains its
//! owner.

use serde::Serialize;

use crate::types::DbId;

/// What a buddy operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuddyChange {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuddyList {
    #[serde(skip)]
    owner: DbId,
    ids: Vec<DbId>,
}

impl BuddyList {
    /// Load a stored list, dropping the owner, non-positive ids, and
    /// duplicates while keeping first-seen order.
    pub fn load(owner: DbId, stored: &[DbId]) -> Self {
        let mut ids: Vec<DbId> = Vec::with_capacity(stored.len());
        for &id in stored {
            if id > 0 && id != owner && !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { owner, ids }
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.ids.contains(&id)
    }

    /// Append `target`. No-op for the owner and for existing entries.
    pub fn add(&mut self, target: DbId) -> BuddyChange {
        if target <= 0 || target == self.owner || self.contains(target) {
            return BuddyChange::Unchanged;
        }
        self.ids.push(target);
        BuddyChange::Added
    }

    /// Remove `target`. No-op when absent.
    pub fn remove(&mut self, target: DbId) -> BuddyChange {
        let before = self.ids.len();
        self.ids.retain(|&id| id != target);
        if self.ids.len() == before {
            BuddyChange::Unchanged
        } else {
            BuddyChange::Removed
        }
    }

    /// Remove when present, add otherwise.
    pub fn toggle(&mut self, target: DbId) -> BuddyChange {
        if self.contains(target) {
            self.remove(target)
        } else {
            self.add(target)
        }
    }

    pub fn as_slice(&self) -> &[DbId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_drops_owner_and_duplicates() {
        let list = BuddyList::load(5, &[3, 5, 7, 3, 0, -2, 9]);
        assert_eq!(list.as_slice(), &[3, 7, 9]);
    }

    #[test]
    fn add_self_is_noop() {
        let mut list = BuddyList::load(5, &[3]);
        assert_eq!(list.add(5), BuddyChange::Unchanged);
        assert_eq!(list.as_slice(), &[3]);
    }

    #[test]
    fn add_existing_is_noop() {
        let mut list = BuddyList::load(5, &[3]);
        assert_eq!(list.add(3), BuddyChange::Unchanged);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_appends_in_order() {
        let mut list = BuddyList::load(5, &[3]);
        assert_eq!(list.add(1), BuddyChange::Added);
        assert_eq!(list.as_slice(), &[3, 1]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut list = BuddyList::load(5, &[3]);
        assert_eq!(list.remove(8), BuddyChange::Unchanged);
        assert_eq!(list.as_slice(), &[3]);
    }

    #[test]
    fn remove_present() {
        let mut list = BuddyList::load(5, &[3, 8, 4]);
        assert_eq!(list.remove(8), BuddyChange::Removed);
        assert_eq!(list.as_slice(), &[3, 4]);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut list = BuddyList::load(5, &[]);
        assert_eq!(list.toggle(2), BuddyChange::Added);
        assert_eq!(list.toggle(2), BuddyChange::Removed);
        assert!(list.is_empty());
        assert_eq!(list.toggle(5), BuddyChange::Unchanged);
    }
}
