//! Canonical renumbering with deterministic tie-breaking.
//!
//! After a batch write several entries can legitimately share one index
//! (two users dragging into the top of the same column in the same tick).
//! Renumbering re-sorts the container and assigns gap-free `0..N-1`
//! indices. Ties are broken so the entry that explicitly asked to move to
//! a slot wins over a stationary one, and two explicit movers resolve by
//! their submission order, keeping the result reproducible regardless of
//! store iteration order.

use super::entry::{EntryRef, RootEntry};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A move requested in the current batch, used as a tie-breaking hint.
#[derive(Debug, Clone, Copy)]
pub struct MovePreference {
    /// The entry's index before the batch, when it was already a
    /// root-level entry of the same target container. `None` for entries
    /// new to the container.
    pub old_index: Option<usize>,
    /// The index the client asked for.
    pub new_index: usize,
    /// Position of the originating change in the client's batch.
    pub change_order: usize,
}

impl MovePreference {
    /// Tie-break priority among entries sharing an index.
    ///
    /// 0 = moved forward, or brand new to the container (lands where it
    /// asked); 1 = stationary; 2 = moved backward.
    fn priority(&self) -> u8 {
        match self.old_index {
            None => 0,
            Some(old) if old > self.new_index => 0,
            Some(old) if old < self.new_index => 2,
            Some(_) => 1,
        }
    }
}

/// Per-batch move hints keyed by container entry.
pub type PreferenceMap = HashMap<EntryRef, MovePreference>;

fn priority_of(pref: Option<&MovePreference>) -> u8 {
    pref.map(MovePreference::priority).unwrap_or(1)
}

fn tie_break(a: &RootEntry, b: &RootEntry, prefs: &PreferenceMap) -> Ordering {
    let pa = prefs.get(&a.entry);
    let pb = prefs.get(&b.entry);

    let by_priority = priority_of(pa).cmp(&priority_of(pb));
    if by_priority != Ordering::Equal {
        return by_priority;
    }

    if let (Some(pa), Some(pb)) = (pa, pb) {
        let by_change_order = pa.change_order.cmp(&pb.change_order);
        if by_change_order != Ordering::Equal {
            return by_change_order;
        }
    }

    a.entry.cmp(&b.entry)
}

/// Sort a container's entries into their canonical order and assign
/// gap-free `0..N-1` indices.
///
/// Primary key is the current index; ties resolve by move priority, then
/// submission order (when both sides carry a preference), then numeric
/// entity id. Running the pass a second time with an empty map reproduces
/// the same order.
pub fn renumber(entries: &mut Vec<RootEntry>, prefs: &PreferenceMap) {
    entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| tie_break(a, b, prefs)));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.index = position;
    }
}

/// Compact a container with no move hints: sort by current index with the
/// id fallback and close any gaps.
pub fn compact(entries: &mut Vec<RootEntry>) {
    renumber(entries, &PreferenceMap::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupId, ItemId};

    fn item(id: i64, index: usize) -> RootEntry {
        RootEntry::item(ItemId::new(id), index)
    }

    fn group(id: i64, index: usize) -> RootEntry {
        RootEntry::group(GroupId::new(id), index)
    }

    fn pref(old: Option<usize>, new: usize, order: usize) -> MovePreference {
        MovePreference {
            old_index: old,
            new_index: new,
            change_order: order,
        }
    }

    fn indices(entries: &[RootEntry]) -> Vec<(i64, usize)> {
        entries.iter().map(|e| (e.entry.id_value(), e.index)).collect()
    }

    #[test]
    fn test_compact_closes_gaps() {
        let mut entries = vec![item(1, 0), group(2, 3), item(3, 7)];
        compact(&mut entries);
        assert_eq!(indices(&entries), vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_new_entry_wins_collision_against_stationary() {
        // Item 12 just landed at 0; item 5 was already there.
        let mut entries = vec![item(5, 0), item(12, 0)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(12)), pref(None, 0, 0));

        renumber(&mut entries, &prefs);
        assert_eq!(indices(&entries), vec![(12, 0), (5, 1)]);
    }

    #[test]
    fn test_backward_mover_yields_to_stationary() {
        // Item 1 moved from 0 to 2, colliding with stationary item 9.
        let mut entries = vec![item(9, 2), item(1, 2), item(4, 1)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(1)), pref(Some(0), 2, 0));

        renumber(&mut entries, &prefs);
        assert_eq!(indices(&entries), vec![(4, 0), (9, 1), (1, 2)]);
    }

    #[test]
    fn test_forward_mover_beats_stationary() {
        // Item 8 moved from 3 up to 1, where item 2 already sits.
        let mut entries = vec![item(2, 1), item(8, 1), item(6, 0)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(8)), pref(Some(3), 1, 0));

        renumber(&mut entries, &prefs);
        assert_eq!(indices(&entries), vec![(6, 0), (8, 1), (2, 2)]);
    }

    #[test]
    fn test_change_order_resolves_equal_priority() {
        // Two items new to the column both target index 0; the one listed
        // first in the batch wins.
        let mut entries = vec![item(20, 0), item(10, 0)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(20)), pref(None, 0, 1));
        prefs.insert(EntryRef::Item(ItemId::new(10)), pref(None, 0, 0));

        renumber(&mut entries, &prefs);
        assert_eq!(indices(&entries), vec![(10, 0), (20, 1)]);
    }

    #[test]
    fn test_id_fallback_without_preferences() {
        let mut entries = vec![group(7, 1), item(3, 1), item(1, 0)];
        compact(&mut entries);
        assert_eq!(indices(&entries), vec![(1, 0), (3, 1), (7, 2)]);
    }

    #[test]
    fn test_stationary_preference_counts_as_no_preference() {
        // old == new: behaves like a stationary entry, so the raw id
        // decides against a preference-less peer.
        let mut entries = vec![item(9, 1), item(2, 1)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(9)), pref(Some(1), 1, 0));

        renumber(&mut entries, &prefs);
        assert_eq!(indices(&entries), vec![(2, 0), (9, 1)]);
    }

    #[test]
    fn test_renumber_is_idempotent() {
        let mut entries = vec![item(5, 2), item(3, 2), group(8, 0), item(1, 5)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Item(ItemId::new(3)), pref(Some(4), 2, 0));

        renumber(&mut entries, &prefs);
        let first_pass = entries.clone();

        compact(&mut entries);
        assert_eq!(entries, first_pass);
    }

    #[test]
    fn test_mixed_items_and_groups_share_index_space() {
        let mut entries = vec![item(4, 0), group(2, 0), item(6, 1)];
        let mut prefs = PreferenceMap::new();
        prefs.insert(EntryRef::Group(GroupId::new(2)), pref(Some(2), 0, 0));

        renumber(&mut entries, &prefs);
        // Group 2 moved forward into 0, so it takes the slot.
        assert_eq!(entries[0].entry, EntryRef::Group(GroupId::new(2)));
        assert_eq!(indices(&entries).iter().map(|&(_, i)| i).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
