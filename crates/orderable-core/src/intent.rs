#![forbid(unsafe_code)]

//! Before/after resolution against the closest sibling.

use crate::direction::Direction;
use crate::geometry::Point;

/// Which side of the reference sibling the dragged element lands on.
///
/// Also used as the insertion side when the visual tree is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intent {
    Before,
    /// Default before any movement has been observed.
    #[default]
    After,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl core::fmt::Display for Intent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the intent of `pointer` relative to a sibling `centroid`.
///
/// Only the coordinate on the session axis is compared; equality resolves to
/// [`Intent::After`].
#[must_use]
pub fn resolve(direction: Direction, pointer: Point, centroid: Point) -> Intent {
    let before = match direction {
        Direction::Horizontal => pointer.x < centroid.x,
        Direction::Vertical => pointer.y < centroid.y,
    };
    if before { Intent::Before } else { Intent::After }
}
