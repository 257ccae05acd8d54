#![forbid(unsafe_code)]

//! Session-scoped sibling capture and nearest-neighbor ranking.
//!
//! A [`Snapshot`] is taken once when a drag starts and never recomputed while
//! the drag is in flight. Structural changes to the container mid-drag, such
//! as the insertion marker moving around, are not reflected.

use crate::direction::{Direction, predict};
use crate::geometry::{Point, Rect, centroid_of, distance};

/// One captured sibling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingRef<H> {
    /// Position in the container at capture time.
    pub index: usize,
    pub handle: H,
    /// Page-coordinate centroid at capture time.
    pub centroid: Point,
}

impl<H> SiblingRef<H> {
    #[inline]
    pub const fn new(index: usize, handle: H, centroid: Point) -> Self {
        Self {
            index,
            handle,
            centroid,
        }
    }
}

/// A sibling paired with its distance to the pointer for one movement event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSibling<H> {
    pub sibling: SiblingRef<H>,
    pub distance: f64,
}

/// Immutable, ordered capture of a container's children and their centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<H> {
    entries: Vec<SiblingRef<H>>,
}

impl<H> Default for Snapshot<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy> Snapshot<H> {
    /// Capture `children` in order, one centroid per child.
    pub fn capture<I>(children: I, scroll: Point) -> Self
    where
        I: IntoIterator<Item = (H, Rect)>,
    {
        let entries = children
            .into_iter()
            .enumerate()
            .map(|(index, (handle, bounds))| {
                SiblingRef::new(index, handle, centroid_of(bounds, scroll))
            })
            .collect();
        Self { entries }
    }

    /// Captured siblings in container order.
    #[must_use]
    pub fn entries(&self) -> &[SiblingRef<H>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layout axis predicted from the first two entries.
    #[must_use]
    pub fn direction(&self) -> Direction {
        predict(self.entries.first(), self.entries.get(1))
    }

    /// Rank every entry by distance to `pointer`.
    #[must_use]
    pub fn rank(&self, pointer: Point) -> Vec<RankedSibling<H>> {
        rank(&self.entries, pointer)
    }
}

/// Order `siblings` ascending by distance to `pointer`.
///
/// The sort is stable, so equidistant siblings keep their snapshot order and
/// the head of the result is deterministic.
#[must_use]
pub fn rank<H: Copy>(siblings: &[SiblingRef<H>], pointer: Point) -> Vec<RankedSibling<H>> {
    let mut ranked: Vec<RankedSibling<H>> = siblings
        .iter()
        .map(|sibling| RankedSibling {
            sibling: *sibling,
            distance: distance(pointer, sibling.centroid),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row() -> Snapshot<char> {
        Snapshot::capture(
            [
                ('a', Rect::new(0.0, 0.0, 20.0, 20.0)),
                ('b', Rect::new(100.0, 0.0, 20.0, 20.0)),
                ('c', Rect::new(200.0, 0.0, 20.0, 20.0)),
            ],
            Point::ORIGIN,
        )
    }

    fn handles(ranked: &[RankedSibling<char>]) -> Vec<char> {
        ranked.iter().map(|r| r.sibling.handle).collect()
    }

    #[test]
    fn capture_assigns_indices_and_centroids() {
        let snapshot = row();
        assert_eq!(snapshot.len(), 3);
        let b = snapshot.entries()[1];
        assert_eq!(b.index, 1);
        assert_eq!(b.handle, 'b');
        assert_eq!(b.centroid, Point::new(110.0, 10.0));
    }

    #[test]
    fn capture_applies_scroll() {
        let snapshot = Snapshot::capture(
            [('a', Rect::new(0.0, 0.0, 10.0, 10.0))],
            Point::new(0.0, 1000.0),
        );
        assert_eq!(snapshot.entries()[0].centroid, Point::new(5.0, 1005.0));
    }

    #[test]
    fn direction_uses_first_two_entries() {
        assert_eq!(row().direction(), Direction::Horizontal);
        let column = Snapshot::capture(
            [
                (1u8, Rect::new(0.0, 0.0, 100.0, 20.0)),
                (2u8, Rect::new(0.0, 30.0, 100.0, 20.0)),
                // A wrapped third row would suggest horizontal; ignored.
                (3u8, Rect::new(500.0, 30.0, 100.0, 20.0)),
            ],
            Point::ORIGIN,
        );
        assert_eq!(column.direction(), Direction::Vertical);
    }

    #[test]
    fn degenerate_snapshots() {
        let empty: Snapshot<u8> = Snapshot::default();
        assert!(empty.is_empty());
        assert_eq!(empty.direction(), Direction::Horizontal);
        assert!(empty.rank(Point::ORIGIN).is_empty());

        let single = Snapshot::capture([(9u8, Rect::new(0.0, 0.0, 4.0, 4.0))], Point::ORIGIN);
        assert_eq!(single.direction(), Direction::Horizontal);
        let ranked = single.rank(Point::new(1000.0, 1000.0));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].sibling.handle, 9);
    }

    #[test]
    fn rank_sorts_by_distance() {
        let ranked = row().rank(Point::new(190.0, 10.0));
        assert_eq!(handles(&ranked), vec!['c', 'b', 'a']);
        assert_eq!(ranked[0].distance, 20.0);
    }

    #[test]
    fn rank_ties_keep_snapshot_order() {
        // Exactly halfway between b (110) and c (210).
        let ranked = row().rank(Point::new(160.0, 10.0));
        assert_eq!(handles(&ranked), vec!['b', 'c', 'a']);
        assert_eq!(ranked[0].distance, ranked[1].distance);
    }

    #[test]
    fn rank_handles_nan_without_panicking() {
        let ranked = row().rank(Point::new(f64::NAN, 0.0));
        assert_eq!(ranked.len(), 3);
    }
}
