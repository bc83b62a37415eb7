use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const ORIGIN: ScreenPoint = ScreenPoint { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// One party member's placement rule. The record's identity is its index in
/// the owning list; `parent` refers to another index in that same list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PositionRecord {
    pub parent: i64,
    pub x: i32,
    pub y: i32,
}

impl PositionRecord {
    pub fn root(x: i32, y: i32) -> Self {
        Self { parent: -1, x, y }
    }

    pub fn child_of(parent: usize, x: i32, y: i32) -> Self {
        Self {
            parent: i64::try_from(parent).unwrap_or(i64::MAX),
            x,
            y,
        }
    }

    /// Returns the parent index when it addresses a record in a list of
    /// `len` records. Negative and out-of-range values mean "no parent".
    pub fn parent_index(&self, len: usize) -> Option<usize> {
        usize::try_from(self.parent)
            .ok()
            .filter(|&index| index < len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFormation {
    points: Vec<ScreenPoint>,
    broken_cycles: Vec<usize>,
}

impl ResolvedFormation {
    pub(crate) fn new(points: Vec<ScreenPoint>, broken_cycles: Vec<usize>) -> Self {
        Self {
            points,
            broken_cycles,
        }
    }

    pub fn point(&self, index: usize) -> Option<ScreenPoint> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indices of the records that were forced to resolve as parentless
    /// because following their parent chain led back to them.
    pub fn broken_cycles(&self) -> &[usize] {
        &self.broken_cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_out_of_range_parents_have_no_index() {
        assert_eq!(PositionRecord::root(0, 0).parent_index(4), None);
        assert_eq!(
            PositionRecord {
                parent: 4,
                x: 0,
                y: 0
            }
            .parent_index(4),
            None
        );
        assert_eq!(PositionRecord::child_of(3, 0, 0).parent_index(4), Some(3));
        assert_eq!(
            PositionRecord {
                parent: 5_000_000_000,
                x: 0,
                y: 0
            }
            .parent_index(4),
            None
        );
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let point = ScreenPoint::new(i32::MAX - 1, i32::MIN + 1).offset_by(10, -10);
        assert_eq!(point, ScreenPoint::new(i32::MAX, i32::MIN));
    }
}
