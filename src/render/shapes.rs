//! Pixel-level drawing primitives
//!
//! Everything draws straight into the host's `W x H` u32 buffer. Plots wrap
//! at the field edges like the simulation does, so a shape halfway off the
//! right edge reappears on the left.

use glam::Vec2;

use crate::heading_vec;
use crate::sim::wrap_index;

use super::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Set one pixel, wrapping both axes
#[inline]
pub fn plot(buffer: &mut [u32], x: i32, y: i32, color: u32) {
    let x = wrap_index(x, SCREEN_WIDTH as i32) as usize;
    let y = wrap_index(y, SCREEN_HEIGHT as i32) as usize;
    buffer[y * SCREEN_WIDTH + x] = color;
}

/// Bresenham line between two points
pub fn draw_line(buffer: &mut [u32], from: Vec2, to: Vec2, color: u32) {
    let (mut x, mut y) = (from.x as i32, from.y as i32);
    let (x2, y2) = (to.x as i32, to.y as i32);

    let dx = (x2 - x).abs();
    let dy = -(y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(buffer, x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Filled circle (asteroids, projectiles)
pub fn fill_circle(buffer: &mut [u32], center: Vec2, radius: f32, color: u32) {
    let cx = center.x as i32;
    let cy = center.y as i32;
    let r = radius as i32;
    for x in (cx - r)..=(cx + r) {
        for y in (cy - r)..=(cy + r) {
            if (cx - x) * (cx - x) + (cy - y) * (cy - y) <= r * r {
                plot(buffer, x, y, color);
            }
        }
    }
}

/// Player ship: a notched triangle outlined with four line segments.
///
/// Nose along the heading, two wingtips at ±5π/6 and a short tail point
/// behind the center.
pub fn draw_ship(buffer: &mut [u32], pos: Vec2, heading: f32, radius: f32, color: u32) {
    use std::f32::consts::PI;
    let nose = pos + heading_vec(heading) * radius;
    let left_wing = pos + heading_vec(heading + 5.0 * PI / 6.0) * radius;
    let tail = pos + heading_vec(heading + PI) * (0.6 * radius);
    let right_wing = pos + heading_vec(heading - 5.0 * PI / 6.0) * radius;

    draw_line(buffer, nose, left_wing, color);
    draw_line(buffer, left_wing, tail, color);
    draw_line(buffer, tail, right_wing, color);
    draw_line(buffer, right_wing, nose, color);
}
