use crate::editor::{PointRef, PointSets};
use crate::models::Point;

/// Pointer must be strictly closer than this (image pixels) to grab a point
pub const HOVER_RADIUS: f32 = 10.0;

/// Find the point under the pointer.
///
/// Every point of every set is checked. When several are in range the last
/// one scanned wins (countertop before credit card, then index order), which
/// matches the draw order so the marker on top is the one picked.
pub fn hit_test(sets: &PointSets, pointer: Point, radius: f32) -> Option<PointRef> {
    let mut found = None;

    for (set, points) in sets.iter() {
        for (index, point) in points.iter().enumerate() {
            if point.distance_to(&pointer) < radius {
                found = Some(PointRef { set, index });
            }
        }
    }

    found
}
