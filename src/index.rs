//! A centered interval tree over half-open integer intervals.
//!
//! The [`IntervalIndex`] answers two questions: which intervals contain an
//! address ([`IntervalIndex::point_query()`]) and which intervals overlap a
//! range ([`IntervalIndex::range_query()`]). It knows nothing about genomics;
//! the [`CoordinateSpace`](crate::space::CoordinateSpace) uses it to resolve
//! addresses to segments, and callers may use it to find records within a
//! visible window.
//!
//! The tree is built lazily and is never rebalanced. The root's center is
//! supplied by the caller. Every other node is created the first time an
//! interval falls entirely to one side of its parent, and takes the midpoint
//! of that interval as its center. The shape of the tree therefore depends on
//! insertion order, but query results do not.
//!
//! ```
//! use tracklayout::index::IntervalIndex;
//!
//! let mut index = IntervalIndex::try_new(500.0)?;
//! index.insert(100, 200, Some(1))?;
//! index.insert(150, 600, Some(2))?;
//! index.insert(550, 900, Some(3))?;
//!
//! let mut ids = index
//!     .point_query(175)
//!     .into_iter()
//!     .map(|interval| interval.id())
//!     .collect::<Vec<_>>();
//! ids.sort();
//! assert_eq!(ids, vec![1, 2]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeSet;
use std::collections::HashMap;

use omics::coordinate::position::Number;

mod node;

use node::Node;
use node::NodeIndex;
use node::Side;

/// The position of the root node within the arena.
const ROOT: NodeIndex = 0;

/// An error related to an [`IntervalIndex`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The center of the root node was not a finite number.
    InvalidCenter(f64),

    /// The end of a range was not strictly greater than its start.
    InvalidRange(Number, Number),

    /// An interval with the provided id is already indexed.
    DuplicateId(u64),

    /// No interval with the provided id is indexed.
    UnknownId(u64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidCenter(center) => write!(f, "invalid center: {center}"),
            Error::InvalidRange(start, end) => write!(
                f,
                "invalid range: end ({end}) must be greater than start ({start})"
            ),
            Error::DuplicateId(id) => write!(f, "id {id} is already registered"),
            Error::UnknownId(id) => write!(f, "id {id} is not registered"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Intervals
////////////////////////////////////////////////////////////////////////////////////////

/// A half-open interval `[start, end)` with an identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Interval {
    /// The start (inclusive).
    start: Number,

    /// The end (exclusive).
    end: Number,

    /// The identifier.
    id: u64,
}

impl Interval {
    /// Gets the start of the interval.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end of the interval.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the identifier of the interval.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the number of addresses covered by the interval.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Returns whether `address` falls within the interval.
    pub fn contains(&self, address: Number) -> bool {
        self.start <= address && address < self.end
    }
}

/// An interval returned from a range query along with how much it overlaps
/// the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The interval.
    interval: Interval,

    /// The fraction of the query covered by the interval.
    query_coverage: f64,

    /// The fraction of the interval covered by the query.
    interval_coverage: f64,
}

impl Hit {
    /// Computes a hit for `interval` against the query `[start, end)`.
    fn new(interval: Interval, start: Number, end: Number) -> Self {
        let left = interval.start.max(start);
        let right = interval.end.min(end);
        let overlap = right.saturating_sub(left) as f64;

        Self {
            interval,
            query_coverage: overlap / (end - start) as f64,
            interval_coverage: overlap / interval.len() as f64,
        }
    }

    /// Gets the interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Gets the fraction of the query range covered by the interval.
    pub fn query_coverage(&self) -> f64 {
        self.query_coverage
    }

    /// Gets the fraction of the interval covered by the query range.
    pub fn interval_coverage(&self) -> f64 {
        self.interval_coverage
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Index
////////////////////////////////////////////////////////////////////////////////////////

/// A centered interval tree supporting insertion, removal, and overlap
/// queries.
///
/// Mutation requires exclusive access; a fully built index can be shared
/// across threads for concurrent queries.
#[derive(Clone, Debug)]
pub struct IntervalIndex {
    /// The node arena. The root always lives at [`ROOT`].
    nodes: Vec<Node>,

    /// Every indexed interval by id.
    intervals: HashMap<u64, Interval>,

    /// Every interval endpoint, keyed by `(position, id)`.
    endpoints: BTreeSet<(Number, u64)>,

    /// The next candidate for a generated id.
    next_id: u64,
}

impl IntervalIndex {
    /// Attempts to create an empty index whose root is centered on `center`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::index::IntervalIndex;
    ///
    /// assert!(IntervalIndex::try_new(1024.0).is_ok());
    /// assert!(IntervalIndex::try_new(f64::NAN).is_err());
    /// ```
    pub fn try_new(center: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::InvalidCenter(center));
        }

        Ok(Self {
            nodes: vec![Node::new(center)],
            intervals: HashMap::new(),
            endpoints: BTreeSet::new(),
            next_id: 0,
        })
    }

    /// Gets the number of indexed intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns whether the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Gets the interval registered under `id`.
    pub fn get(&self, id: u64) -> Option<&Interval> {
        self.intervals.get(&id)
    }

    /// Iterates over every indexed interval in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        let mut intervals = self.intervals.values().collect::<Vec<_>>();
        intervals.sort_by_key(|interval| interval.id);
        intervals.into_iter()
    }

    /// Inserts the interval `[start, end)`.
    ///
    /// When `id` is [`None`], the first unused id at or after an internal
    /// counter is assigned.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::index::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::try_new(50.0)?;
    ///
    /// let first = index.insert(0, 10, Some(0))?;
    /// let second = index.insert(5, 15, None)?;
    /// assert_eq!(first.id(), 0);
    /// assert_eq!(second.id(), 1);
    ///
    /// assert!(index.insert(5, 15, Some(1)).is_err());
    /// assert!(index.insert(15, 5, None).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn insert(&mut self, start: Number, end: Number, id: Option<u64>) -> Result<Interval> {
        if start >= end {
            return Err(Error::InvalidRange(start, end));
        }

        let id = match id {
            Some(id) if self.intervals.contains_key(&id) => return Err(Error::DuplicateId(id)),
            Some(id) => id,
            None => {
                while self.intervals.contains_key(&self.next_id) {
                    self.next_id += 1;
                }
                self.next_id
            }
        };

        let interval = Interval { start, end, id };
        self.next_id += 1;

        let mut current = ROOT;
        loop {
            let side = self.nodes[current].side(&interval);
            let child = match side {
                Side::Here => break,
                Side::Left => self.nodes[current].left,
                Side::Right => self.nodes[current].right,
            };

            current = match child {
                Some(child) => child,
                None => {
                    let center = start as f64 + (end - start) as f64 / 2.0;
                    self.nodes.push(Node::new(center));
                    let child = self.nodes.len() - 1;

                    match side {
                        Side::Left => self.nodes[current].left = Some(child),
                        Side::Right => self.nodes[current].right = Some(child),
                        Side::Here => unreachable!("intervals here never descend"),
                    }

                    child
                }
            };
        }

        self.nodes[current].insert(interval);
        self.endpoints.insert((start, id));
        self.endpoints.insert((end, id));
        self.intervals.insert(id, interval);

        Ok(interval)
    }

    /// Removes the interval registered under `id`.
    ///
    /// The interval is taken out of the node that owns it; the shape of the
    /// tree is left untouched.
    pub fn remove(&mut self, id: u64) -> Result<Interval> {
        let interval = self.intervals.remove(&id).ok_or(Error::UnknownId(id))?;

        let mut current = Some(ROOT);
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            current = match node.side(&interval) {
                Side::Left => node.left,
                Side::Right => node.right,
                Side::Here => {
                    node.remove(id);
                    None
                }
            };
        }

        self.endpoints.remove(&(interval.start, id));
        self.endpoints.remove(&(interval.end, id));

        Ok(interval)
    }

    /// Gets every interval containing `address`.
    ///
    /// The order of the results is unspecified.
    pub fn point_query(&self, address: Number) -> Vec<Interval> {
        let mut hits = Vec::new();
        let point = address as f64;

        let mut current = Some(ROOT);
        while let Some(index) = current {
            let node = &self.nodes[index];
            node.collect(address, &mut hits);

            current = if point < node.center() {
                node.left
            } else if point > node.center() {
                node.right
            } else {
                None
            };
        }

        hits
    }

    /// Gets every interval overlapping `[start, end)`, sorted by id.
    ///
    /// The search is split in two. A point query at the midpoint of the range
    /// finds the intervals that cover it, and a scan over the sorted endpoints
    /// finds every interval with an endpoint strictly inside the range. For
    /// half-open integer intervals an overlapping interval either has such an
    /// endpoint or spans the whole range, so the union is complete.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::index::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::try_new(500.0)?;
    /// index.insert(100, 200, Some(1))?;
    /// index.insert(150, 600, Some(2))?;
    /// index.insert(550, 900, Some(3))?;
    ///
    /// let hits = index.range_query(0, 120)?;
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(hits[0].interval().id(), 1);
    /// assert_eq!(hits[0].interval_coverage(), 0.2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn range_query(&self, start: Number, end: Number) -> Result<Vec<Hit>> {
        if end <= start {
            return Err(Error::InvalidRange(start, end));
        }

        let midpoint = start + (end - start) / 2;

        let mut ids = self
            .point_query(midpoint)
            .into_iter()
            .map(|interval| interval.id)
            .collect::<BTreeSet<_>>();

        ids.extend(
            self.endpoints
                .range((start + 1, 0)..(end, 0))
                .map(|(_, id)| *id),
        );

        Ok(ids
            .into_iter()
            .filter_map(|id| self.intervals.get(&id))
            .map(|interval| Hit::new(*interval, start, end))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom as _;

    use super::*;

    fn ids(intervals: impl IntoIterator<Item = Interval>) -> Vec<u64> {
        let mut ids = intervals
            .into_iter()
            .map(|interval| interval.id())
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    fn example() -> Result<IntervalIndex> {
        let mut index = IntervalIndex::try_new(500.0)?;
        index.insert(100, 200, Some(1))?;
        index.insert(150, 600, Some(2))?;
        index.insert(550, 900, Some(3))?;
        Ok(index)
    }

    #[test]
    fn test_point_query_on_the_example_tree() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let index = example()?;

        assert_eq!(ids(index.point_query(175)), vec![1, 2]);
        assert_eq!(ids(index.point_query(500)), vec![2]);
        assert_eq!(ids(index.point_query(575)), vec![2, 3]);
        assert_eq!(ids(index.point_query(600)), vec![3]);
        assert_eq!(ids(index.point_query(200)), vec![2]);
        assert_eq!(ids(index.point_query(99)), Vec::<u64>::new());
        assert_eq!(ids(index.point_query(900)), Vec::<u64>::new());

        Ok(())
    }

    #[test]
    fn test_range_query_on_the_example_tree() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let index = example()?;

        let hits = index.range_query(0, 120)?;
        assert_eq!(hits.len(), 1);

        let hit = hits[0];
        assert_eq!(hit.interval().id(), 1);
        assert!((hit.interval_coverage() - 0.2).abs() < f64::EPSILON);
        assert!((hit.query_coverage() - 20.0 / 120.0).abs() < f64::EPSILON);

        let hits = index.range_query(180, 560)?;
        assert_eq!(
            hits.iter().map(|hit| hit.interval().id()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        // An interval enclosing the whole query is found through the midpoint.
        let hits = index.range_query(300, 310)?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].interval().id(), 2);
        assert_eq!(hits[0].query_coverage(), 1.0);

        Ok(())
    }

    #[test]
    fn test_it_validates_input() -> std::result::Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            IntervalIndex::try_new(f64::INFINITY).unwrap_err(),
            Error::InvalidCenter(f64::INFINITY)
        );

        let mut index = example()?;
        assert_eq!(
            index.insert(10, 10, None).unwrap_err(),
            Error::InvalidRange(10, 10)
        );
        assert_eq!(
            index.insert(0, 10, Some(2)).unwrap_err(),
            Error::DuplicateId(2)
        );
        assert_eq!(
            index.range_query(10, 10).unwrap_err(),
            Error::InvalidRange(10, 10)
        );
        assert_eq!(
            index.range_query(10, 5).unwrap_err().to_string(),
            "invalid range: end (5) must be greater than start (10)"
        );

        Ok(())
    }

    #[test]
    fn test_generated_ids_skip_used_ones() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut index = IntervalIndex::try_new(10.0)?;
        index.insert(0, 5, Some(0))?;
        index.insert(0, 5, Some(2))?;

        // The counter has advanced once per insertion and probes past `2`.
        assert_eq!(index.insert(1, 2, None)?.id(), 3);
        assert_eq!(index.insert(1, 2, None)?.id(), 4);
        assert_eq!(index.len(), 4);

        let mut index = IntervalIndex::try_new(10.0)?;
        index.insert(0, 5, Some(1))?;
        assert_eq!(index.insert(1, 2, None)?.id(), 2);
        assert_eq!(index.get(2).map(|interval| interval.len()), Some(1));

        Ok(())
    }

    #[test]
    fn test_remove() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut index = example()?;

        let removed = index.remove(2)?;
        assert_eq!((removed.start(), removed.end()), (150, 600));
        assert_eq!(ids(index.point_query(175)), vec![1]);
        assert!(index.range_query(300, 310)?.is_empty());
        assert_eq!(index.remove(2).unwrap_err(), Error::UnknownId(2));

        // The id can be reused after removal.
        index.insert(400, 450, Some(2))?;
        assert_eq!(ids(index.point_query(425)), vec![2]);

        Ok(())
    }

    #[test]
    fn test_it_can_be_queried_from_many_threads()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IntervalIndex>();

        let index = example()?;

        let results = std::thread::scope(|scope| {
            let handles = [175, 500, 575, 600]
                .into_iter()
                .map(|address| {
                    let index = &index;
                    scope.spawn(move || ids(index.point_query(address)))
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert_eq!(results, vec![vec![1, 2], vec![2], vec![2, 3], vec![3]]);

        Ok(())
    }

    #[test]
    fn test_point_query_matches_brute_force() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let mut rng = StdRng::seed_from_u64(7);
        let mut index = IntervalIndex::try_new(250.0)?;
        let mut all = Vec::new();

        for i in 0..200u64 {
            let start = (i * 37) % 480;
            let end = start + 1 + (i * 13) % 60;
            all.push(index.insert(start, end, Some(i))?);
        }

        let mut addresses = (0..560).collect::<Vec<Number>>();
        addresses.shuffle(&mut rng);

        for address in addresses {
            let expected = ids(all.iter().copied().filter(|iv| iv.contains(address)));
            assert_eq!(ids(index.point_query(address)), expected, "at {address}");
        }

        Ok(())
    }

    #[test]
    fn test_range_query_is_invariant_to_insertion_order()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut intervals = (0..150u64)
            .map(|i| {
                let start = (i * 71) % 1000;
                (start, start + 1 + (i * 29) % 200, i)
            })
            .collect::<Vec<_>>();

        let queries = [(0, 10), (95, 420), (500, 501), (640, 1300), (999, 1000)];
        let mut expected: Option<Vec<Vec<u64>>> = None;

        for _ in 0..5 {
            intervals.shuffle(&mut rng);

            let mut index = IntervalIndex::try_new(intervals[0].0 as f64)?;
            for (start, end, id) in &intervals {
                index.insert(*start, *end, Some(*id))?;
            }

            let results = queries
                .iter()
                .map(|(start, end)| {
                    index.range_query(*start, *end).map(|hits| {
                        hits.iter()
                            .map(|hit| hit.interval().id())
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            // Every result is exactly the set of overlapping intervals.
            for ((start, end), found) in queries.iter().zip(&results) {
                let mut brute = intervals
                    .iter()
                    .filter(|(s, e, _)| s < end && e > start)
                    .map(|(_, _, id)| *id)
                    .collect::<Vec<_>>();
                brute.sort();
                assert_eq!(found, &brute);
            }

            match &expected {
                Some(expected) => assert_eq!(expected, &results),
                None => expected = Some(results),
            }
        }

        Ok(())
    }
}
