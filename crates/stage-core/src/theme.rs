//! Theme colour model: base palettes, derived light/dark branches and the
//! named theme registry.

use crate::color::darken_hex;
use crate::constants::DARKEN_FACTOR;
use crate::layout::{LayerKind, LayerLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Key of the nested sky sub-map.
pub const SKY_KEY: &str = "sky";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("theme `{0}` is not registered")]
    NotFound(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorEntry {
    Color(String),
    Nested(BTreeMap<String, String>),
}

/// Plane id → hex colour, with nested groups (the sky) as sub-maps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    entries: BTreeMap<String, ColorEntry>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, key: &str, hex: &str) -> Self {
        self.entries
            .insert(key.to_string(), ColorEntry::Color(hex.to_string()));
        self
    }

    pub fn with_nested(mut self, key: &str, colors: &[(&str, &str)]) -> Self {
        let nested = colors
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.entries
            .insert(key.to_string(), ColorEntry::Nested(nested));
        self
    }

    pub fn color(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(ColorEntry::Color(c)) => Some(c.as_str()),
            _ => None,
        }
    }

    pub fn nested_color(&self, group: &str, key: &str) -> Option<&str> {
        match self.entries.get(group) {
            Some(ColorEntry::Nested(m)) => m.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn sky(&self, key: &str) -> Option<&str> {
        self.nested_color(SKY_KEY, key)
    }

    /// Sky layers read the nested sky map, ground layers the flat map.
    pub fn layer_color(&self, layer: &LayerLayout) -> Option<&str> {
        match layer.kind {
            LayerKind::Sky => self.sky(&layer.id),
            LayerKind::Ground => self.color(&layer.id),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &ColorEntry)> {
        self.entries.iter()
    }

    fn darken(&mut self, factor: f32) {
        let darken = |hex: &mut String| match darken_hex(hex, factor) {
            Ok(d) => *hex = d,
            Err(e) => log::warn!("[theme] keeping `{}` undarkened: {}", hex, e),
        };
        for entry in self.entries.values_mut() {
            match entry {
                ColorEntry::Color(c) => darken(c),
                ColorEntry::Nested(m) => m.values_mut().for_each(darken),
            }
        }
    }

    fn apply_overrides(&mut self, overrides: &ColorMap) {
        for (key, value) in &overrides.entries {
            match value {
                ColorEntry::Color(c) if c.is_empty() => {}
                ColorEntry::Color(c) => {
                    self.entries.insert(key.clone(), ColorEntry::Color(c.clone()));
                }
                ColorEntry::Nested(m) => match self.entries.get_mut(key) {
                    Some(ColorEntry::Nested(existing)) => {
                        existing.extend(m.iter().map(|(k, v)| (k.clone(), v.clone())));
                    }
                    _ => {
                        self.entries.insert(key.clone(), ColorEntry::Nested(m.clone()));
                    }
                },
            }
        }
    }
}

/// Derive a theme branch from an immutable base palette.
///
/// Overrides take precedence: darkening only applies to a dark branch that has
/// none. The base is cloned, so repeated derivations never accumulate.
pub fn derive_theme(base: &ColorMap, mode: ThemeMode, overrides: Option<&ColorMap>) -> ColorMap {
    let mut colors = base.clone();
    match (mode, overrides) {
        (_, Some(o)) => colors.apply_overrides(o),
        (ThemeMode::Dark, None) => colors.darken(DARKEN_FACTOR),
        (ThemeMode::Light, None) => {}
    }
    colors
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub light: ColorMap,
    pub dark: ColorMap,
}

impl ThemeConfig {
    pub fn derive(base: &ColorMap, light: Option<&ColorMap>, dark: Option<&ColorMap>) -> Self {
        Self {
            light: derive_theme(base, ThemeMode::Light, light),
            dark: derive_theme(base, ThemeMode::Dark, dark),
        }
    }

    pub fn branch(&self, mode: ThemeMode) -> &ColorMap {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, ThemeConfig>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, theme: ThemeConfig) {
        self.themes.insert(name.to_string(), theme);
    }

    pub fn get(&self, name: &str) -> Result<&ThemeConfig, ThemeError> {
        self.themes
            .get(name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Reference palettes: `meadow` and `desert`.
    pub fn builtin() -> Self {
        let base = base_colors();
        let mut registry = Self::new();
        registry.insert(
            "meadow",
            ThemeConfig::derive(
                &base,
                None,
                Some(&palette(
                    ["#37412a", "#49531d", "#687422"],
                    ["#2a3b55", "#1d2c49", "#0f1d3d"],
                )),
            ),
        );
        registry.insert(
            "desert",
            ThemeConfig::derive(
                &base,
                Some(&palette(
                    ["#c2b280", "#c2a679", "#c29c62"],
                    ["#eddcd2", "#fff1e6", "#fde2e4"],
                )),
                Some(&palette(
                    ["#827b60", "#796a53", "#6f5946"],
                    ["#62374d", "#412234", "#272838"],
                )),
            ),
        );
        registry
    }
}

pub fn base_colors() -> ColorMap {
    palette(
        ["#556b2f", "#6b8e23", "#9acd32"],
        ["#add8e6", "#87ceeb", "#00bfff"],
    )
}

fn palette(ground: [&str; 3], sky: [&str; 3]) -> ColorMap {
    ColorMap::new()
        .with_color("darkGreenPlane", ground[0])
        .with_color("mediumGreenPlane", ground[1])
        .with_color("lightGreenPlane", ground[2])
        .with_nested(
            SKY_KEY,
            &[
                ("lightBlueSky", sky[0]),
                ("mediumBlueSky", sky[1]),
                ("darkBlueSky", sky[2]),
            ],
        )
}
