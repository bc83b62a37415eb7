use tracing::{debug, warn};

use super::types::{PositionRecord, ResolvedFormation, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Resolved,
}

/// Resolves every record to an absolute screen point.
///
/// Records are driven in ascending index order. Each walk follows parent
/// links on an explicit stack until it reaches a record that is already
/// resolved, a record with no valid parent, or a record already on the
/// current walk. In the last case that record is the first cycle member
/// reached, and it resolves as if it had no parent; the rest of the walk
/// stacks on top of it.
pub fn resolve_all(records: &[PositionRecord]) -> ResolvedFormation {
    let len = records.len();
    let mut visits = vec![Visit::Unvisited; len];
    let mut points = vec![ScreenPoint::ORIGIN; len];
    let mut broken_cycles = Vec::new();
    let mut path = Vec::new();

    for start in 0..len {
        if visits[start] == Visit::Resolved {
            continue;
        }

        let mut cursor = start;
        loop {
            match visits[cursor] {
                Visit::Resolved => break,
                Visit::OnPath => {
                    broken_cycles.push(cursor);
                    points[cursor] = ScreenPoint::new(records[cursor].x, records[cursor].y);
                    visits[cursor] = Visit::Resolved;
                    break;
                }
                Visit::Unvisited => {
                    visits[cursor] = Visit::OnPath;
                    path.push(cursor);
                    match records[cursor].parent_index(len) {
                        Some(parent) => cursor = parent,
                        None => {
                            if records[cursor].parent >= 0 {
                                warn!(
                                    index = cursor,
                                    parent = records[cursor].parent,
                                    record_count = len,
                                    "formation_parent_out_of_range"
                                );
                            }
                            points[cursor] =
                                ScreenPoint::new(records[cursor].x, records[cursor].y);
                            visits[cursor] = Visit::Resolved;
                            break;
                        }
                    }
                }
            }
        }

        while let Some(index) = path.pop() {
            if visits[index] == Visit::Resolved {
                continue;
            }
            let record = records[index];
            let base = record
                .parent_index(len)
                .map(|parent| points[parent])
                .unwrap_or(ScreenPoint::ORIGIN);
            points[index] = base.offset_by(record.x, record.y);
            visits[index] = Visit::Resolved;
        }
    }

    for &index in &broken_cycles {
        warn!(index, parent = records[index].parent, "formation_cycle_broken");
    }
    debug!(
        record_count = len,
        broken_cycles = broken_cycles.len(),
        "formation_resolved"
    );

    ResolvedFormation::new(points, broken_cycles)
}
