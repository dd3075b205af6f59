//! Toroidal geometry
//!
//! The play field wraps at both edges, so the shortest separation between two
//! points may cross an edge. Collision checks must use the toroidal distance
//! or objects near opposite edges would never touch.

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Shortest distance between two points on the wrapping plane.
///
/// Takes the minimum over the 9 candidate separations formed by shifting the
/// x delta by ±width and the y delta by ±height.
pub fn torus_distance(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;

    let mut min_sq = f32::MAX;
    for sx in [-FIELD_WIDTH, 0.0, FIELD_WIDTH] {
        for sy in [-FIELD_HEIGHT, 0.0, FIELD_HEIGHT] {
            let sq = (dx + sx) * (dx + sx) + (dy + sy) * (dy + sy);
            if sq < min_sq {
                min_sq = sq;
            }
        }
    }
    min_sq.sqrt()
}

/// Wrap a position into [0, W) x [0, H)
pub fn wrap_position(pos: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, FIELD_WIDTH), wrap_axis(pos.y, FIELD_HEIGHT))
}

#[inline]
fn wrap_axis(value: f32, dim: f32) -> f32 {
    let v = value % dim;
    if v < 0.0 { v + dim } else { v }
}

/// Euclidean remainder for pixel indices (negative values wrap around)
#[inline]
pub fn wrap_index(value: i32, dim: i32) -> i32 {
    let v = value % dim;
    if v < 0 { v + dim } else { v }
}
