//! Pointer hit testing against bubbles

use glam::IVec2;

use super::bubble::Bubble;

/// Index of the first bubble (in list order) whose bounds contain `point`
///
/// Overlapping bubbles resolve to the earliest one in the list, so the
/// oldest surviving bubble wins.
pub fn hit_test(bubbles: &[Bubble], point: IVec2) -> Option<usize> {
    bubbles.iter().position(|b| b.rect.contains_point(point))
}
