//! Bilinear sampling of flat row-major scalar fields.
//!
//! Shared by the sediment advection step (reading the pre-step field at a
//! backtraced position) and by hosts querying ground elevation at continuous
//! coordinates for placement.

use glam::Vec2;

/// Bilinearly interpolate `field` at a fractional grid position.
///
/// Positions are in cell units with `(0, 0)` at the first cell center.
/// Valid range is `[0, width-1) x [0, height-1)`; anything outside it,
/// including exactly the last row or column, returns 0.0 rather than
/// clamping to the nearest edge value. Integer positions inside the range
/// return the cell value exactly.
pub fn sample(field: &[f32], width: usize, height: usize, pos: Vec2) -> f32 {
    if width < 2 || height < 2 {
        return 0.0;
    }
    if pos.x < 0.0 || pos.y < 0.0 {
        return 0.0;
    }
    if pos.x >= (width - 1) as f32 || pos.y >= (height - 1) as f32 {
        return 0.0;
    }

    let x0 = pos.x.floor() as usize;
    let y0 = pos.y.floor() as usize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let sx = pos.x - x0 as f32;
    let sy = pos.y - y0 as f32;

    let v00 = field[y0 * width + x0];
    let v10 = field[y0 * width + x1];
    let v01 = field[y1 * width + x0];
    let v11 = field[y1 * width + x1];

    let v0 = v00 * (1.0 - sx) + v10 * sx;
    let v1 = v01 * (1.0 - sx) + v11 * sx;

    v0 * (1.0 - sy) + v1 * sy
}
