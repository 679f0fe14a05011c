//! Fixed-slot reconciliation: the backend stores rows only for occupied
//! slots, while the board always shows the full fixed sequence.

use tracing::warn;

use bacheca_types::models::ShoppingItem;

/// Left-join a sparse remote row set onto the fixed slot domain.
///
/// Slot i takes the payload of the row with id == i when present, and the
/// canonical empty payload otherwise. Input order is irrelevant; rows with
/// ids outside the domain are dropped. The result always has exactly
/// `slot_count` entries with slot i at index i.
pub fn reconcile(slot_count: usize, rows: Vec<ShoppingItem>) -> Vec<ShoppingItem> {
    let mut slots: Vec<ShoppingItem> = (0..slot_count)
        .map(|i| ShoppingItem::empty(i as u32))
        .collect();

    for row in rows {
        let idx = row.id as usize;
        if idx >= slot_count {
            warn!("dropping row outside the slot domain: id={}", row.id);
            continue;
        }
        slots[idx] = row;
    }

    slots
}

/// Occupancy counters for the list header ("N elementi, M completati").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStats {
    pub active: usize,
    pub completed: usize,
}

/// The single owner of the in-memory slot sequence.
///
/// All mutation goes through `reset`, `apply_row` and `apply_delete`; that
/// keeps the "exactly N slots" invariant enforceable in one place. Both
/// producers feed these same entry points: local optimistic updates after a
/// successful remote call, and change events arriving over the gateway.
/// Replaying an event the client itself caused replaces a slot's payload
/// with an identical payload, which is a no-op in effect.
#[derive(Debug)]
pub struct SlotBoard {
    slots: Vec<ShoppingItem>,
}

impl SlotBoard {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: reconcile(slot_count, Vec::new()),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Rebuild the whole sequence from a freshly loaded row set.
    pub fn reset(&mut self, rows: Vec<ShoppingItem>) {
        let n = self.slots.len();
        self.slots = reconcile(n, rows);
    }

    /// Replace one slot's payload with a full row. Insert and update are the
    /// same operation here: the payload is replaced wholesale, no field
    /// merging.
    pub fn apply_row(&mut self, item: ShoppingItem) {
        let idx = item.id as usize;
        if idx >= self.slots.len() {
            warn!("ignoring row outside the slot domain: id={}", item.id);
            return;
        }
        self.slots[idx] = item;
    }

    /// Revert one slot to the canonical empty payload. The slot itself is
    /// never removed; the sequence length is invariant.
    pub fn apply_delete(&mut self, id: u32) {
        let idx = id as usize;
        if idx >= self.slots.len() {
            warn!("ignoring delete outside the slot domain: id={}", id);
            return;
        }
        self.slots[idx] = ShoppingItem::empty(id);
    }

    /// The slot at a given position. Slot ids come from the fixed domain, so
    /// an out-of-range id is a programming error, not a runtime condition.
    pub fn slot(&self, id: u32) -> &ShoppingItem {
        &self.slots[id as usize]
    }

    pub fn snapshot(&self) -> Vec<ShoppingItem> {
        self.slots.clone()
    }

    pub fn stats(&self) -> ListStats {
        let active = self.slots.iter().filter(|s| !s.is_empty()).count();
        let completed = self
            .slots
            .iter()
            .filter(|s| !s.is_empty() && s.completed)
            .count();
        ListStats { active, completed }
    }

    /// First empty slot id, or None when the list is full.
    pub fn first_empty(&self) -> Option<u32> {
        self.slots.iter().find(|s| s.is_empty()).map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacheca_types::models::SLOT_COUNT;

    fn item_at(id: u32, text: &str, added_by: &str, completed: bool) -> ShoppingItem {
        let mut it = ShoppingItem::empty(id);
        it.text = text.to_string();
        it.added_by = added_by.to_string();
        it.completed = completed;
        it
    }

    #[test]
    fn sparse_rows_left_join_onto_the_full_domain() {
        let rows = vec![
            item_at(7, "Latte", "Bea", false),
            item_at(0, "Pane", "Matteo", true),
            item_at(19, "Uova", "Michela", false),
        ];

        let slots = reconcile(SLOT_COUNT, rows);

        assert_eq!(slots.len(), SLOT_COUNT);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.id as usize, i, "slot identity equals position");
        }
        assert_eq!(slots[0].text, "Pane");
        assert!(slots[0].completed);
        assert_eq!(slots[7].added_by, "Bea");
        assert_eq!(slots[19].text, "Uova");

        for i in [1usize, 6, 8, 18] {
            assert!(slots[i].is_empty());
            assert!(!slots[i].completed);
            assert_eq!(slots[i].added_by, "");
        }
    }

    #[test]
    fn empty_row_set_yields_all_empty_slots() {
        let slots = reconcile(SLOT_COUNT, Vec::new());
        assert_eq!(slots.len(), SLOT_COUNT);
        assert!(slots.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn rows_outside_the_domain_are_dropped() {
        let slots = reconcile(SLOT_COUNT, vec![item_at(99, "Fantasma", "Matteo", false)]);
        assert_eq!(slots.len(), SLOT_COUNT);
        assert!(slots.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn row_order_does_not_matter() {
        let forward = reconcile(
            SLOT_COUNT,
            vec![item_at(2, "a", "x", false), item_at(5, "b", "y", false)],
        );
        let backward = reconcile(
            SLOT_COUNT,
            vec![item_at(5, "b", "y", false), item_at(2, "a", "x", false)],
        );
        for i in 0..SLOT_COUNT {
            assert_eq!(forward[i].text, backward[i].text);
        }
    }

    #[test]
    fn delete_reverts_one_slot_and_leaves_the_rest() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        board.apply_row(item_at(3, "Pasta", "Giuseppe", false));
        board.apply_row(item_at(4, "Sugo", "Giuseppe", false));

        board.apply_delete(3);

        assert_eq!(board.slot_count(), SLOT_COUNT);
        assert!(board.slot(3).is_empty());
        assert_eq!(board.slot(3).added_by, "");
        assert!(!board.slot(3).completed);
        assert_eq!(board.slot(4).text, "Sugo");
    }

    #[test]
    fn delete_on_an_empty_slot_is_harmless() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        board.apply_delete(9);
        assert_eq!(board.slot_count(), SLOT_COUNT);
        assert!(board.slot(9).is_empty());
    }

    #[test]
    fn replaying_the_same_row_is_a_no_op_in_effect() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        let row = item_at(1, "Latte", "Bea", false);

        board.apply_row(row.clone());
        let first = board.snapshot();
        board.apply_row(row);
        let second = board.snapshot();

        assert_eq!(first, second);
    }

    #[test]
    fn out_of_domain_events_are_ignored() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        board.apply_row(item_at(50, "Fuori", "Matteo", false));
        board.apply_delete(50);
        assert_eq!(board.slot_count(), SLOT_COUNT);
        assert!(board.snapshot().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn stats_count_occupied_and_completed() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        board.apply_row(item_at(0, "Pane", "Matteo", true));
        board.apply_row(item_at(1, "Latte", "Bea", false));
        board.apply_row(item_at(2, "Uova", "Michela", true));

        assert_eq!(
            board.stats(),
            ListStats {
                active: 3,
                completed: 2
            }
        );
    }

    #[test]
    fn first_empty_skips_occupied_slots() {
        let mut board = SlotBoard::new(SLOT_COUNT);
        assert_eq!(board.first_empty(), Some(0));

        board.apply_row(item_at(0, "Pane", "Matteo", false));
        board.apply_row(item_at(1, "Latte", "Bea", false));
        assert_eq!(board.first_empty(), Some(2));

        for i in 0..SLOT_COUNT as u32 {
            board.apply_row(item_at(i, "pieno", "Matteo", false));
        }
        assert_eq!(board.first_empty(), None);
    }

    #[test]
    fn scenario_pane_latte_clear() {
        // Slot 0 holds {Pane, Matteo, not completed}; everything else empty.
        let mut board = SlotBoard::new(SLOT_COUNT);
        board.reset(vec![item_at(0, "Pane", "Matteo", false)]);

        // Completion toggled: payload mutates in place.
        board.apply_row(item_at(0, "Pane", "Matteo", true));
        assert_eq!(board.slot(0).text, "Pane");
        assert!(board.slot(0).completed);

        // Rewritten by another member: completion resets with the new text.
        board.apply_row(item_at(0, "Latte", "Bea", false));
        assert_eq!(board.slot(0).text, "Latte");
        assert_eq!(board.slot(0).added_by, "Bea");
        assert!(!board.slot(0).completed);

        // Cleared: back to the canonical empty payload.
        board.apply_delete(0);
        assert!(board.slot(0).is_empty());
        assert_eq!(board.slot(0).added_by, "");
        assert!(!board.slot(0).completed);
        assert_eq!(board.slot_count(), SLOT_COUNT);
    }
}
