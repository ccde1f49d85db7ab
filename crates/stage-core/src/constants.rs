// Shared stage tuning constants used by the core and the web frontend.

// Theme derivation
pub const DARKEN_FACTOR: f32 = 0.75; // per-channel scale applied for derived dark themes
pub const DEFAULT_THEME: &str = "meadow";
pub const FALLBACK_COLOR: &str = "#ff00ff"; // substituted when a plane colour is missing

// Layer geometry
pub const PLANE_WIDTH: f32 = 100.0;
pub const PLANE_HEIGHT: f32 = 6.0;

// Vegetation scatter
pub const VEGETATION_MIN_ITEMS: u32 = 50;
pub const VEGETATION_MAX_ITEMS: u32 = 52;
pub const VEGETATION_SCATTER_WIDTH: f32 = 40.0; // items land in [-w/2, w/2)
pub const VEGETATION_ASPECT: f32 = 1.5; // width = scale * aspect, height = scale

// Parallax
pub const PARALLAX_HORIZONTAL_GAIN: f32 = 10.0;
pub const PARALLAX_VERTICAL_GAIN: f32 = 4.0;
pub const PARALLAX_MIN_DEPTH: f32 = 1.0; // |z| below this is clamped so layers at z=0 stay finite

// Interaction
pub const HOVER_SCALE: f32 = 1.1;
pub const BASE_SCALE: f32 = 1.0;
pub const THEME_TRANSITION_SECS: f32 = 0.2;

// Mode toggle control
pub const MODE_TOGGLE_NAME: &str = "modeToggle";
pub const MODE_TOGGLE_TINT: &str = "#ffffff";
pub const MODE_TOGGLE_POSITION: [f32; 3] = [4.0, 2.0, 0.0];
pub const SUN_TEXTURE: &str = "assets/env/T_Sun.png";
pub const MOON_TEXTURE: &str = "assets/env/T_Moon.png";

// Camera
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 5.0;
pub const TARGET_ASPECT: f32 = 16.0 / 9.0;
