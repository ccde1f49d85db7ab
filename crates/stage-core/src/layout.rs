//! Static stage layout tables and the mouse-parallax mapping.
//!
//! The tables are plain data so a host can inject its own layout through
//! [`crate::StageConfig`]; `Default` reproduces the reference stage.

use crate::constants::*;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Ground,
    Sky,
}

/// One of the background planes. `id` doubles as the scene name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerLayout {
    pub id: String,
    pub y: f32,
    pub z: f32,
    pub kind: LayerKind,
}

impl LayerLayout {
    pub fn new(id: &str, y: f32, z: f32, kind: LayerKind) -> Self {
        Self {
            id: id.to_string(),
            y,
            z,
            kind,
        }
    }

    #[inline]
    pub fn base_position(&self) -> Vec3 {
        Vec3::new(0.0, self.y, self.z)
    }

    /// Inversely proportional to distance from the camera plane; closer
    /// layers move more.
    #[inline]
    pub fn depth_factor(&self) -> f32 {
        1.0 / self.z.abs().max(PARALLAX_MIN_DEPTH)
    }

    #[inline]
    pub fn is_sky(&self) -> bool {
        self.kind == LayerKind::Sky
    }
}

/// Vegetation parameters for a ground layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VegetationConfig {
    pub layer: String,
    pub color: String,
    pub scale: f32,
    pub z_offset: f32,
    pub y_offset: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorativeAsset {
    pub url: String,
    pub y_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxGains {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for ParallaxGains {
    fn default() -> Self {
        Self {
            horizontal: PARALLAX_HORIZONTAL_GAIN,
            vertical: PARALLAX_VERTICAL_GAIN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleLayout {
    pub name: String,
    pub position: Vec3,
    pub tint: String,
    pub day_texture: String,
    pub night_texture: String,
}

impl Default for ToggleLayout {
    fn default() -> Self {
        Self {
            name: MODE_TOGGLE_NAME.to_string(),
            position: Vec3::from_array(MODE_TOGGLE_POSITION),
            tint: MODE_TOGGLE_TINT.to_string(),
            day_texture: SUN_TEXTURE.to_string(),
            night_texture: MOON_TEXTURE.to_string(),
        }
    }
}

impl ToggleLayout {
    pub fn texture_for(&self, dark: bool) -> &str {
        if dark {
            &self.night_texture
        } else {
            &self.day_texture
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayout {
    pub layers: Vec<LayerLayout>,
    pub plane_size: Vec2,
    pub vegetation: Vec<VegetationConfig>,
    pub decorative_assets: Vec<DecorativeAsset>,
    pub scatter_width: f32,
    pub min_items: u32,
    pub max_items: u32,
    pub parallax: ParallaxGains,
    pub toggle: ToggleLayout,
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            layers: vec![
                LayerLayout::new("darkGreenPlane", -7.0, -3.0, LayerKind::Ground),
                LayerLayout::new("mediumGreenPlane", -5.0, -4.0, LayerKind::Ground),
                LayerLayout::new("lightGreenPlane", -3.0, -5.0, LayerKind::Ground),
                LayerLayout::new("lightBlueSky", 1.0, -10.0, LayerKind::Sky),
                LayerLayout::new("mediumBlueSky", 5.0, -9.0, LayerKind::Sky),
                LayerLayout::new("darkBlueSky", 9.0, -8.0, LayerKind::Sky),
            ],
            plane_size: Vec2::new(PLANE_WIDTH, PLANE_HEIGHT),
            vegetation: vec![
                VegetationConfig {
                    layer: "darkGreenPlane".into(),
                    color: "#556b2f".into(),
                    scale: 2.0,
                    z_offset: 0.2,
                    y_offset: 4.0,
                },
                VegetationConfig {
                    layer: "mediumGreenPlane".into(),
                    color: "#6b8e23".into(),
                    scale: 1.5,
                    z_offset: 0.1,
                    y_offset: 3.7,
                },
                VegetationConfig {
                    layer: "lightGreenPlane".into(),
                    color: "#9acd32".into(),
                    scale: 1.0,
                    z_offset: 0.0,
                    y_offset: 3.5,
                },
            ],
            decorative_assets: (1..=4)
                .map(|i| DecorativeAsset {
                    url: format!("assets/env/T_Grasspatch{:02}.png", i),
                    y_offset: 0.0,
                })
                .collect(),
            scatter_width: VEGETATION_SCATTER_WIDTH,
            min_items: VEGETATION_MIN_ITEMS,
            max_items: VEGETATION_MAX_ITEMS,
            parallax: ParallaxGains::default(),
            toggle: ToggleLayout::default(),
        }
    }
}

impl StageLayout {
    pub fn layer(&self, id: &str) -> Option<&LayerLayout> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn ground_layers(&self) -> impl Iterator<Item = &LayerLayout> {
        self.layers.iter().filter(|l| !l.is_sky())
    }
}

/// Pointer offset from the viewport centre, normalised so the edges map to
/// roughly ±1. Degenerate viewports map to the centre.
#[inline]
pub fn normalize_pointer(client: Vec2, viewport: Vec2) -> Vec2 {
    let center = viewport * 0.5;
    if center.x <= 0.0 || center.y <= 0.0 {
        return Vec2::ZERO;
    }
    (client - center) / center
}

/// World position of `layer` for a normalised pointer offset.
#[inline]
pub fn parallax_position(layer: &LayerLayout, pointer: Vec2, gains: ParallaxGains) -> Vec3 {
    let depth = layer.depth_factor();
    Vec3::new(
        pointer.x * depth * gains.horizontal,
        layer.y + pointer.y * depth * gains.vertical,
        layer.z,
    )
}
