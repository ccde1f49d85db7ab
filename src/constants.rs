/// Browser front-end tuning.
///
/// Pure data so host tests can include this file directly.
// DOM
pub const CANVAS_ID: &str = "parallax-stage-canvas";
pub const CURSOR_PROPERTY: &str = "cursor";

// Backing-store pixels per CSS pixel are capped to keep fill rate bounded
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Clear colour behind the sky layers (linear 0..1, alpha 1)
pub const CLEAR_COLOR: [f64; 4] = [0.02, 0.02, 0.05, 1.0];

// Instance buffer starts here and doubles when a frame needs more quads
pub const INITIAL_QUAD_CAPACITY: usize = 256;

// Texel used for untextured planes
pub const WHITE_TEXEL: [u8; 4] = [255, 255, 255, 255];

// Quads are drawn as a 4-vertex triangle strip
pub const QUAD_VERTEX_COUNT: u32 = 4;
