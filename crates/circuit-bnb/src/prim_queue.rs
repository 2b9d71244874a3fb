// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! An indexed min-heap with decrease-key, driving Prim's algorithm.
//!
//! Prim's algorithm needs to lower the tentative connection weight of a
//! city that is already queued, which a plain binary heap cannot do. This
//! heap keeps a city-to-slot position table alongside the entry array, so
//! `decrease` finds the entry in O(1) and restores the heap property with
//! one sift. Cities that have already been popped (or were never pushed)
//! are ignored by `decrease`, letting the caller relax every outgoing edge
//! without membership checks.
//!
//! The queue is reused across bound computations; `reset` clears it in
//! O(capacity) without deallocating.

use circuit_model::{index::CityIndex, num::SolverFloat};

/// An entry of the Prim queue: a city, its tentative connection weight into
/// the growing tree, and the tree vertex it would attach to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimEntry<T> {
    /// The queued city.
    pub city: CityIndex,
    /// The cheapest known weight connecting `city` to the tree.
    pub weight: T,
    /// The tree vertex on the other end of that cheapest edge, or `None`
    /// for the root and for cities not yet reached.
    pub parent: Option<CityIndex>,
}

/// A min-heap over [`PrimEntry`]s keyed by weight, with a position table
/// enabling decrease-key.
#[derive(Debug, Clone)]
pub struct PrimQueue<T> {
    entries: Vec<PrimEntry<T>>,
    positions: Vec<Option<usize>>,
}

impl<T> PrimQueue<T>
where
    T: SolverFloat,
{
    /// Creates a queue able to hold one entry per city.
    ///
    /// # Panics
    ///
    /// This function will panic if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "called `PrimQueue::new` with zero capacity"
        );
        Self {
            entries: Vec::with_capacity(capacity),
            positions: vec![None; capacity],
        }
    }

    /// Clears the queue for reuse without deallocating.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.positions.fill(None);
    }

    /// The number of queued cities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no cities are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a fresh entry.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if the city is out of
    /// bounds or already queued.
    pub fn push(&mut self, entry: PrimEntry<T>) {
        debug_assert!(
            entry.city.get() < self.positions.len(),
            "called `PrimQueue::push` with city index out of bounds: the len is {} but the index is {}",
            self.positions.len(),
            entry.city.get()
        );
        debug_assert!(
            self.positions[entry.city.get()].is_none(),
            "called `PrimQueue::push` with already queued city: {}",
            entry.city
        );

        let slot = self.entries.len();
        self.positions[entry.city.get()] = Some(slot);
        self.entries.push(entry);
        self.sift_up(slot);
    }

    /// Lowers the weight of a queued city to `weight`, attaching it to
    /// `parent`.
    ///
    /// Does nothing if the city is not currently queued or if the new
    /// weight is not strictly smaller than the stored one.
    pub fn decrease(&mut self, city: CityIndex, weight: T, parent: CityIndex) {
        let slot = match self.positions.get(city.get()).copied().flatten() {
            Some(slot) => slot,
            None => return,
        };
        if self.entries[slot].weight <= weight {
            return;
        }

        self.entries[slot].weight = weight;
        self.entries[slot].parent = Some(parent);
        self.sift_up(slot);
    }

    /// Removes and returns the entry with the smallest weight.
    pub fn pop_min(&mut self) -> Option<PrimEntry<T>> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        self.swap_slots(0, last);
        let entry = self.entries.pop()?;
        self.positions[entry.city.get()] = None;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry)
    }

    /// Swaps two heap slots, keeping the position table consistent.
    #[inline]
    fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.positions[self.entries[a].city.get()] = Some(b);
        self.positions[self.entries[b].city.get()] = Some(a);
        self.entries.swap(a, b);
    }

    fn sift_up(&mut self, start: usize) {
        let mut current = start;
        while current != 0 {
            let parent = (current - 1) / 2;
            if self.entries[current].weight >= self.entries[parent].weight {
                break;
            }
            self.swap_slots(current, parent);
            current = parent;
        }
    }

    fn sift_down(&mut self, start: usize) {
        let len = self.entries.len();
        let mut current = start;
        loop {
            let left = 2 * current + 1;
            if left >= len {
                break;
            }
            let mut next = left;
            let right = left + 1;
            if right < len && self.entries[right].weight < self.entries[next].weight {
                next = right;
            }
            if self.entries[current].weight <= self.entries[next].weight {
                break;
            }
            self.swap_slots(current, next);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PrimEntry, PrimQueue};
    use circuit_model::index::CityIndex;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn fresh(city: usize) -> PrimEntry<f64> {
        PrimEntry {
            city: ci(city),
            weight: f64::INFINITY,
            parent: None,
        }
    }

    #[test]
    fn test_pop_min_returns_lightest_entry() {
        let mut queue = PrimQueue::new(4);
        for city in 0..4 {
            queue.push(fresh(city));
        }
        queue.decrease(ci(2), 3.0, ci(0));
        queue.decrease(ci(1), 7.0, ci(0));
        queue.decrease(ci(3), 1.0, ci(2));

        let first = queue.pop_min().expect("queue is non-empty");
        assert_eq!(first.city, ci(3));
        assert_eq!(first.weight, 1.0);
        assert_eq!(first.parent, Some(ci(2)));

        let second = queue.pop_min().expect("queue is non-empty");
        assert_eq!(second.city, ci(2));
        assert_eq!(second.weight, 3.0);
    }

    #[test]
    fn test_decrease_ignores_higher_weights() {
        let mut queue = PrimQueue::new(2);
        queue.push(fresh(0));
        queue.push(fresh(1));

        queue.decrease(ci(1), 5.0, ci(0));
        queue.decrease(ci(1), 9.0, ci(0)); // not an improvement, ignored

        let entry = queue.pop_min().expect("queue is non-empty");
        assert_eq!(entry.city, ci(1));
        assert_eq!(entry.weight, 5.0);
    }

    #[test]
    fn test_decrease_on_absent_city_is_a_no_op() {
        let mut queue = PrimQueue::new(3);
        queue.push(fresh(0));

        // City 2 was never pushed, city 0 is popped below.
        queue.decrease(ci(2), 1.0, ci(0));
        let popped = queue.pop_min().expect("queue is non-empty");
        assert_eq!(popped.city, ci(0));
        queue.decrease(ci(0), 1.0, ci(2));

        assert!(queue.is_empty());
        assert!(queue.pop_min().is_none());
    }

    #[test]
    fn test_reset_allows_reuse() {
        let mut queue = PrimQueue::new(3);
        queue.push(fresh(0));
        queue.push(fresh(1));
        queue.reset();

        assert!(queue.is_empty());
        queue.push(fresh(1));
        queue.decrease(ci(1), 2.0, ci(0));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_min().map(|e| e.weight), Some(2.0));
    }

    #[test]
    fn test_position_table_survives_interleaved_operations() {
        let mut queue = PrimQueue::new(6);
        for city in 0..6 {
            queue.push(fresh(city));
        }
        queue.decrease(ci(4), 4.0, ci(0));
        queue.decrease(ci(5), 2.0, ci(0));
        assert_eq!(queue.pop_min().map(|e| e.city), Some(ci(5)));

        queue.decrease(ci(1), 1.0, ci(5));
        queue.decrease(ci(4), 3.0, ci(5));
        assert_eq!(queue.pop_min().map(|e| e.city), Some(ci(1)));
        assert_eq!(queue.pop_min().map(|e| e.city), Some(ci(4)));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    #[should_panic(expected = "zero capacity")]
    fn test_zero_capacity_is_rejected() {
        let _ = PrimQueue::<f64>::new(0);
    }
}
