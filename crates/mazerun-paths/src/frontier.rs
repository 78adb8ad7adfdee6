//! The priority frontier: a min-queue of [`FrontierEntry`]s.
//!
//! Entries are ordered by f-score, then by heuristic value, then by the
//! configured [`TieBreak`]. Several entries may refer to the same cell; the
//! engine discards the outdated ones when they surface (lazy deletion), so
//! the queue never needs a decrease-key operation.

use std::collections::BinaryHeap;
use std::fmt;

use mazerun_core::Point;

use crate::config::TieBreak;

/// A queued candidate: `(f, h, pos)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrontierEntry {
    pub f: i32,
    pub h: i32,
    pub pos: Point,
}

impl FrontierEntry {
    #[inline]
    pub const fn new(f: i32, h: i32, pos: Point) -> Self {
        Self { f, h, pos }
    }

    /// The g-score this entry was pushed with.
    #[inline]
    pub const fn g(&self) -> i32 {
        self.f - self.h
    }
}

/// Returned by [`Frontier::pop_min`] when no entry remains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EmptyFrontier;

impl fmt::Display for EmptyFrontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("frontier is empty")
    }
}

impl std::error::Error for EmptyFrontier {}

/// Heap slot carrying the full sort key.
#[derive(Clone, Copy, Eq, PartialEq)]
struct Slot {
    entry: FrontierEntry,
    // Point::ZERO for every slot under insertion order.
    tertiary: Point,
    seq: u64,
}

impl Slot {
    #[inline]
    fn key(&self) -> (i32, i32, Point, u64) {
        (self.entry.f, self.entry.h, self.tertiary, self.seq)
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered collection of frontier entries with a deterministic
/// tie-break.
pub struct Frontier {
    heap: BinaryHeap<Slot>,
    tie_break: TieBreak,
    next_seq: u64,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new(TieBreak::default())
    }
}

impl Frontier {
    /// Create an empty frontier.
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            heap: BinaryHeap::new(),
            tie_break,
            next_seq: 0,
        }
    }

    /// Queue an entry.
    pub fn push(&mut self, entry: FrontierEntry) {
        let tertiary = match self.tie_break {
            TieBreak::InsertionOrder => Point::ZERO,
            TieBreak::RowMajor => entry.pos,
        };
        self.heap.push(Slot {
            entry,
            tertiary,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Remove and return the smallest entry.
    pub fn pop_min(&mut self) -> Result<FrontierEntry, EmptyFrontier> {
        self.heap.pop().map(|s| s.entry).ok_or(EmptyFrontier)
    }

    /// The entry [`pop_min`](Self::pop_min) would return next.
    #[inline]
    pub fn peek(&self) -> Option<&FrontierEntry> {
        self.heap.peek().map(|s| &s.entry)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued entries, stale ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(fr: &mut Frontier) -> Vec<Point> {
        std::iter::from_fn(|| fr.pop_min().ok()).map(|e| e.pos).collect()
    }

    #[test]
    fn pop_on_empty_fails() {
        let mut fr = Frontier::default();
        assert!(fr.is_empty());
        assert_eq!(fr.pop_min(), Err(EmptyFrontier));
    }

    #[test]
    fn orders_by_f_then_h() {
        let mut fr = Frontier::default();
        fr.push(FrontierEntry::new(6, 2, Point::new(0, 0)));
        fr.push(FrontierEntry::new(4, 3, Point::new(0, 1)));
        fr.push(FrontierEntry::new(4, 1, Point::new(0, 2)));
        fr.push(FrontierEntry::new(5, 0, Point::new(0, 3)));
        assert_eq!(fr.len(), 4);
        assert_eq!(fr.peek().map(|e| e.pos), Some(Point::new(0, 2)));
        assert_eq!(
            drain(&mut fr),
            vec![
                Point::new(0, 2),
                Point::new(0, 1),
                Point::new(0, 3),
                Point::new(0, 0),
            ]
        );
    }

    #[test]
    fn insertion_order_breaks_full_ties() {
        let mut fr = Frontier::new(TieBreak::InsertionOrder);
        for p in [Point::new(2, 0), Point::new(0, 1), Point::new(1, 1)] {
            fr.push(FrontierEntry::new(3, 1, p));
        }
        assert_eq!(
            drain(&mut fr),
            vec![Point::new(2, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn row_major_breaks_full_ties() {
        let mut fr = Frontier::new(TieBreak::RowMajor);
        for p in [Point::new(2, 0), Point::new(0, 1), Point::new(1, 1)] {
            fr.push(FrontierEntry::new(3, 1, p));
        }
        assert_eq!(
            drain(&mut fr),
            vec![Point::new(0, 1), Point::new(1, 1), Point::new(2, 0)]
        );
    }

    #[test]
    fn duplicate_entries_coexist() {
        let mut fr = Frontier::default();
        let p = Point::new(1, 1);
        fr.push(FrontierEntry::new(7, 2, p));
        fr.push(FrontierEntry::new(5, 2, p));
        assert_eq!(fr.pop_min().map(|e| e.g()), Ok(3));
        assert_eq!(fr.pop_min().map(|e| e.g()), Ok(5));
        assert!(fr.is_empty());
    }

    #[test]
    fn peek_on_empty() {
        let mut fr = Frontier::default();
        fr.push(FrontierEntry::new(1, 1, Point::ZERO));
        assert!(fr.pop_min().is_ok());
        assert!(fr.is_empty());
        assert_eq!(fr.peek(), None);
        assert_eq!(fr.pop_min(), Err(EmptyFrontier));
    }
}
