use std::cmp::Ordering;

const NOT_QUEUED: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    cell: usize,
    f: f32,
    seq: u64,
}

impl Entry {
    /// Lower `f` first; equal `f` pops in insertion order.
    fn precedes(&self, other: &Entry) -> bool {
        match self.f.total_cmp(&other.f) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.seq < other.seq,
        }
    }
}

/// Min-priority queue of cell indices keyed by estimated total cost.
///
/// A parallel `slots` array records where each cell currently sits in the
/// heap so that relaxing an already-queued cell updates its entry in place
/// instead of scanning the whole frontier.
#[derive(Debug)]
pub(crate) struct Frontier {
    heap: Vec<Entry>,
    slots: Vec<usize>,
    next_seq: u64,
}

impl Frontier {
    pub(crate) fn new(cell_count: usize) -> Self {
        Self {
            heap: Vec::new(),
            slots: vec![NOT_QUEUED; cell_count],
            next_seq: 0,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, cell: usize) -> bool {
        self.slots[cell] != NOT_QUEUED
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Queue a cell that is not currently in the frontier.
    pub(crate) fn push(&mut self, cell: usize, f: f32) {
        debug_assert!(!self.contains(cell), "cell {cell} is already queued");
        let entry = Entry {
            cell,
            f,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        self.heap.push(entry);
        let slot = self.heap.len() - 1;
        self.slots[cell] = slot;
        self.sift_up(slot);
    }

    /// Lower the priority of a queued cell.
    ///
    /// Silently does nothing when the cell is not in the frontier (for
    /// instance because it was already popped).
    pub(crate) fn decrease_key(&mut self, cell: usize, f: f32) {
        let slot = self.slots[cell];
        if slot == NOT_QUEUED {
            return;
        }
        self.heap[slot].f = f;
        self.sift_up(slot);
    }

    /// Remove and return the cell with the lowest `f`.
    pub(crate) fn pop(&mut self) -> Option<(usize, f32)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.slots[entry.cell] = NOT_QUEUED;

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Some((entry.cell, entry.f))
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.heap[slot].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;

            if left < len && self.heap[left].precedes(&self.heap[best]) {
                best = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[best]) {
                best = right;
            }
            if best == slot {
                break;
            }

            self.swap(slot, best);
            slot = best;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].cell] = a;
        self.slots[self.heap[b].cell] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(frontier: &mut Frontier) -> Vec<usize> {
        std::iter::from_fn(|| frontier.pop().map(|(cell, _)| cell)).collect()
    }

    #[test]
    fn test_pops_in_priority_order() {
        let mut frontier = Frontier::new(6);
        frontier.push(0, 5.0);
        frontier.push(1, 1.0);
        frontier.push(2, 3.0);
        frontier.push(3, 0.5);
        frontier.push(4, 4.0);
        assert_eq!(frontier.len(), 5);

        assert_eq!(drain(&mut frontier), vec![3, 1, 2, 4, 0]);
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn test_equal_priorities_pop_in_insertion_order() {
        let mut frontier = Frontier::new(5);
        for cell in [4, 2, 0, 3, 1] {
            frontier.push(cell, 2.0);
        }
        assert_eq!(drain(&mut frontier), vec![4, 2, 0, 3, 1]);
    }

    #[test]
    fn test_decrease_key_reorders() {
        let mut frontier = Frontier::new(4);
        frontier.push(0, 1.0);
        frontier.push(1, 2.0);
        frontier.push(2, 3.0);

        frontier.decrease_key(2, 0.5);
        assert_eq!(frontier.pop(), Some((2, 0.5)));
        assert_eq!(drain(&mut frontier), vec![0, 1]);
    }

    #[test]
    fn test_decrease_key_on_absent_cell_is_noop() {
        let mut frontier = Frontier::new(3);
        frontier.push(0, 1.0);
        assert_eq!(frontier.pop(), Some((0, 1.0)));

        frontier.decrease_key(0, 0.1);
        frontier.decrease_key(2, 0.1);
        assert_eq!(frontier.len(), 0);
        assert!(!frontier.contains(0));
    }

    #[test]
    fn test_contains_tracks_membership() {
        let mut frontier = Frontier::new(3);
        frontier.push(1, 1.0);
        assert!(frontier.contains(1));
        assert!(!frontier.contains(0));
        frontier.pop();
        assert!(!frontier.contains(1));
    }
}
