//! Nodes within an [`IntervalIndex`](super::IntervalIndex).

use omics::coordinate::position::Number;

use crate::index::Interval;

/// The position of a [`Node`] within the index's node arena.
pub(crate) type NodeIndex = usize;

/// Where an interval belongs relative to a node's center.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    /// Entirely to the left of the center.
    Left,

    /// Straddling or touching the center.
    Here,

    /// Entirely to the right of the center.
    Right,
}

/// A single node of the centered interval tree.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// The fixed center of the node.
    center: f64,

    /// The intervals stored at this node ordered by their start.
    starts: Vec<Interval>,

    /// The intervals stored at this node ordered by their end.
    ends: Vec<Interval>,

    /// The subtree of intervals entirely left of the center.
    pub(crate) left: Option<NodeIndex>,

    /// The subtree of intervals entirely right of the center.
    pub(crate) right: Option<NodeIndex>,
}

impl Node {
    /// Creates an empty node around `center`.
    pub(crate) fn new(center: f64) -> Self {
        Self {
            center,
            starts: Vec::new(),
            ends: Vec::new(),
            left: None,
            right: None,
        }
    }

    /// Gets the center of the node.
    pub(crate) fn center(&self) -> f64 {
        self.center
    }

    /// Determines which side of this node `interval` belongs on.
    pub(crate) fn side(&self, interval: &Interval) -> Side {
        if (interval.end() as f64) < self.center {
            Side::Left
        } else if (interval.start() as f64) > self.center {
            Side::Right
        } else {
            Side::Here
        }
    }

    /// Stores `interval` in both orderings. Equal keys keep insertion order.
    pub(crate) fn insert(&mut self, interval: Interval) {
        let i = self
            .starts
            .partition_point(|other| other.start() <= interval.start());
        self.starts.insert(i, interval);

        let i = self.ends.partition_point(|other| other.end() <= interval.end());
        self.ends.insert(i, interval);
    }

    /// Removes the interval with `id` from both orderings.
    pub(crate) fn remove(&mut self, id: u64) {
        self.starts.retain(|interval| interval.id() != id);
        self.ends.retain(|interval| interval.id() != id);
    }

    /// Pushes the intervals stored here that contain `address` into `hits`.
    ///
    /// The starts ordering is scanned from the front when the address lies
    /// left of the center (every interval here ends at or past the center), and
    /// the ends ordering from the back when it lies to the right (every
    /// interval here starts at or before the center).
    pub(crate) fn collect(&self, address: Number, hits: &mut Vec<Interval>) {
        let point = address as f64;

        if point < self.center {
            hits.extend(
                self.starts
                    .iter()
                    .take_while(|interval| interval.start() <= address),
            );
        } else if point > self.center {
            hits.extend(
                self.ends
                    .iter()
                    .rev()
                    .take_while(|interval| interval.end() > address),
            );
        } else {
            hits.extend(
                self.starts
                    .iter()
                    .filter(|interval| interval.contains(address)),
            );
        }
    }
}
