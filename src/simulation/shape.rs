//! Shape target generation for the final toss
//!
//! Rasterizes the decimal text of a number into a monochrome bitmap at a
//! fixed canonical resolution, scans it at a fixed stride, and turns every
//! inked sample into a container-space formation point. The point list is
//! shuffled (Fisher-Yates via the injected RNG) so sequential particle
//! indices don't sweep across the glyph in scan order, then assigned one
//! per particle index.
//!
//! Digits come from a built-in 5x7 row-bitmask font, scaled so the text
//! fills most of the canonical canvas. Coverage is binary, so the 50%
//! opacity threshold of the sampling contract reduces to "cell is inked".

use rand::seq::SliceRandom;
use rand::Rng;

use crate::simulation::geometry::Vessel;
use crate::simulation::states::{System, NVec2, NVec3};

/// Canonical rasterization canvas, pixels per side.
pub const CANVAS: usize = 300;
/// Sampling stride over the canvas.
pub const SCAN_STRIDE: usize = 3;

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// 5x7 digit glyphs, one row-bitmask per row, bit 4 = leftmost column.
const DIGIT_GLYPHS: [[u8; GLYPH_ROWS]; 10] = [
    // 0
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    // 1
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    // 2
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    // 3
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    // 4
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    // 5
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    // 6
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    // 7
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    // 8
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    // 9
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Leading-minus glyph for negative numbers.
const MINUS_GLYPH: [u8; GLYPH_ROWS] = [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000];

fn glyph_for(ch: char) -> [u8; GLYPH_ROWS] {
    match ch.to_digit(10) {
        Some(d) => DIGIT_GLYPHS[d as usize],
        None => MINUS_GLYPH,
    }
}

/// Rasterize the decimal text of `number` into a CANVAS x CANVAS binary
/// bitmap, centered, scaled to fill ~70% of the canvas height (shrunk
/// further if the digit string is wide).
fn rasterize(number: i64) -> Vec<bool> {
    let glyphs: Vec<[u8; GLYPH_ROWS]> = number.to_string().chars().map(glyph_for).collect();

    // One blank column of spacing between glyphs
    let cols = glyphs.len() * GLYPH_COLS + glyphs.len().saturating_sub(1);
    let cell_h = (CANVAS as f64 * 0.7 / GLYPH_ROWS as f64) as usize;
    let cell_w = (CANVAS as f64 * 0.95 / cols as f64) as usize;
    let cell = cell_h.min(cell_w).max(1);

    let width = cols * cell;
    let height = GLYPH_ROWS * cell;
    let x0 = (CANVAS - width.min(CANVAS)) / 2;
    let y0 = (CANVAS - height.min(CANVAS)) / 2;

    let mut bitmap = vec![false; CANVAS * CANVAS];
    for (g, glyph) in glyphs.iter().enumerate() {
        let gx = x0 + g * (GLYPH_COLS + 1) * cell;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                    continue;
                }
                // Fill one cell block for this inked font pixel
                for py in 0..cell {
                    let y = y0 + row * cell + py;
                    for px in 0..cell {
                        let x = gx + col * cell + px;
                        if x < CANVAS && y < CANVAS {
                            bitmap[y * CANVAS + x] = true;
                        }
                    }
                }
            }
        }
    }
    bitmap
}

/// Sample the rasterized number into a shuffled list of container-space
/// formation points centered on the vessel. Deterministic up to the shuffle
/// order for a given number and geometry.
pub fn number_points(number: i64, vessel: &Vessel, rng: &mut impl Rng) -> Vec<NVec2> {
    let bitmap = rasterize(number);

    // Scale the glyph block down when the vessel is smaller than the
    // canonical canvas, so the number stays legible inside the rim.
    let extent = vessel.rest_radius() * 2.0 * 0.9;
    let scale = (extent / CANVAS as f64).min(1.0);
    let half = CANVAS as f64 / 2.0;

    let mut points = Vec::new();
    let mut y = 0;
    while y < CANVAS {
        let mut x = 0;
        while x < CANVAS {
            if bitmap[y * CANVAS + x] {
                points.push(NVec2::new(
                    vessel.center.x + (x as f64 - half) * scale,
                    vessel.center.y + (y as f64 - half) * scale,
                ));
            }
            x += SCAN_STRIDE;
        }
        y += SCAN_STRIDE;
    }

    // Shuffle so the formation doesn't visibly fill in scan order
    points.shuffle(rng);
    points
}

/// Assign point `i` to particle `i`. Particles past the point count lose
/// their target and stay scattered; surplus points go unused.
pub fn assign_targets(sys: &mut System, points: &[NVec2]) {
    for (i, p) in sys.particles.iter_mut().enumerate() {
        p.target = points.get(i).copied();
    }
}

/// Back-compute the lateral launch velocity that lands a drag-free
/// ballistic arc (constant gravity, upward speed `launch_vz`) on `target`
/// at the moment the particle returns to `target_z`.
///
/// Solves `z0 + vz t - g t^2 / 2 = z_target` for the larger positive root.
/// Returns `None` for degenerate geometry (no positive flight time), in
/// which case the caller leaves the particle in free flight.
pub fn ballistic_lateral(
    pos: &NVec3,
    launch_vz: f64,
    target: NVec2,
    target_z: f64,
    gravity: f64,
) -> Option<NVec2> {
    if gravity <= 0.0 {
        return None;
    }
    let disc = launch_vz * launch_vz - 2.0 * gravity * (target_z - pos.z);
    if disc < 0.0 {
        return None;
    }
    let flight = (launch_vz + disc.sqrt()) / gravity;
    if flight <= 1e-9 {
        return None;
    }
    Some(NVec2::new(
        (target.x - pos.x) / flight,
        (target.y - pos.y) / flight,
    ))
}
