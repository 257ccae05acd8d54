#![forbid(unsafe_code)]

//! Dominant layout axis of a sibling list.

use crate::snapshot::SiblingRef;

/// Layout axis along which siblings are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Row-like layout; intent compares x coordinates.
    #[default]
    Horizontal,
    /// Column-like layout; intent compares y coordinates.
    Vertical,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Infer the layout axis from two reference siblings.
///
/// Horizontal iff the x-delta between the centroids strictly exceeds the
/// y-delta; ties are vertical. A missing sibling (empty or single-item list)
/// falls back to [`Direction::Horizontal`].
#[must_use]
pub fn predict<H>(a: Option<&SiblingRef<H>>, b: Option<&SiblingRef<H>>) -> Direction {
    let (Some(a), Some(b)) = (a, b) else {
        return Direction::Horizontal;
    };
    let dx = (b.centroid.x - a.centroid.x).abs();
    let dy = (b.centroid.y - a.centroid.y).abs();
    if dx > dy {
        Direction::Horizontal
    } else {
        Direction::Vertical
    }
}
