//! Stage orchestration: layered planes, vegetation, the day/night toggle and
//! mouse parallax.
//!
//! The coordinator owns the stage [`Liveness`] token. Disposing it turns every
//! pending texture continuation and any late parallax event into a no-op; the
//! web layer drops its listener guards alongside.

use crate::assets::AssetTextureCache;
use crate::color::Rgb;
use crate::config::StageConfig;
use crate::constants::VEGETATION_ASPECT;
use crate::layout::{normalize_pointer, parallax_position, LayerLayout, StageLayout};
use crate::lifecycle::Liveness;
use crate::scene::{
    add_decorative_plane, create_interactive_control, spawn_scene_task, ClickHandler,
    ControlRequest, DecorativeRequest, SceneError, SceneGraph, SharedScene,
};
use crate::theme::{ColorMap, ThemeConfig, ThemeError, ThemeMode, ThemeRegistry};
use futures::task::LocalSpawn;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct StageState {
    pub is_dark_mode: bool,
    pub theme_name: String,
    pub theme: ThemeConfig,
}

impl StageState {
    pub fn mode(&self) -> ThemeMode {
        ThemeMode::from_dark(self.is_dark_mode)
    }

    /// The colour branch currently applied to the scene.
    pub fn branch(&self) -> &ColorMap {
        self.theme.branch(self.mode())
    }
}

struct StageInner {
    scene: SharedScene,
    cache: Rc<AssetTextureCache>,
    spawner: Rc<dyn LocalSpawn>,
    liveness: Liveness,
    toggle_liveness: RefCell<Liveness>,
    layout: StageLayout,
    themes: ThemeRegistry,
    state: RefCell<StageState>,
    rng: RefCell<StdRng>,
    transition_secs: f32,
    toggle_tint: Rgb,
    initialized: Cell<bool>,
}

pub struct StageCoordinator {
    inner: Rc<StageInner>,
}

impl StageCoordinator {
    /// Resolve the configured theme and prepare an empty scene. Day mode is
    /// the initial state.
    pub fn new(
        config: &StageConfig,
        cache: Rc<AssetTextureCache>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Result<Self, ThemeError> {
        let theme = config.themes.get(&config.theme)?.clone();
        let fallback = parse_or(&config.fallback_color, Rgb::WHITE, "fallback colour");
        let toggle_tint = parse_or(&config.layout.toggle.tint, Rgb::WHITE, "toggle tint");
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let liveness = Liveness::new();
        Ok(Self {
            inner: Rc::new(StageInner {
                scene: Rc::new(RefCell::new(SceneGraph::new(fallback))),
                cache,
                spawner,
                toggle_liveness: RefCell::new(liveness.child()),
                liveness,
                layout: config.layout.clone(),
                themes: config.themes.clone(),
                state: RefCell::new(StageState {
                    is_dark_mode: false,
                    theme_name: config.theme.clone(),
                    theme,
                }),
                rng: RefCell::new(rng),
                transition_secs: config.transition_secs,
                toggle_tint,
                initialized: Cell::new(false),
            }),
        })
    }

    pub fn scene(&self) -> &SharedScene {
        &self.inner.scene
    }

    pub fn layout(&self) -> &StageLayout {
        &self.inner.layout
    }

    pub fn liveness(&self) -> &Liveness {
        &self.inner.liveness
    }

    pub fn state(&self) -> Ref<'_, StageState> {
        self.inner.state.borrow()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.inner.state.borrow().is_dark_mode
    }

    pub fn mode(&self) -> ThemeMode {
        self.inner.state.borrow().mode()
    }

    /// Colour the current branch assigns to `layer_id`.
    pub fn layer_target_color(&self, layer_id: &str) -> Option<Rgb> {
        let layer = self.inner.layout.layer(layer_id)?;
        self.inner.layer_color(layer)
    }

    /// Build the layers, scatter vegetation and register the mode toggle.
    /// Texture-backed objects appear once their textures resolve.
    pub fn initialize(&self) {
        if self.inner.initialized.replace(true) {
            log::warn!("[stage] already initialized");
            return;
        }
        self.inner.build_layers();
        self.inner.populate_vegetation();
        self.inner.add_mode_toggle();
        log::info!(
            "[stage] initialized theme={} layers={}",
            self.inner.state.borrow().theme_name,
            self.inner.layout.layers.len()
        );
    }

    /// Window-level parallax. `client` and `viewport` are in CSS pixels.
    pub fn handle_pointer_move(&self, client: Vec2, viewport: Vec2) {
        self.inner.handle_pointer_move(client, viewport);
    }

    pub fn toggle_mode(&self) {
        self.inner.toggle_mode();
    }

    /// Switch to another registered theme, keeping the day/night mode.
    pub fn switch_theme(&self, name: &str) -> Result<(), ThemeError> {
        let theme = self.inner.themes.get(name)?.clone();
        {
            let mut state = self.inner.state.borrow_mut();
            state.theme = theme;
            state.theme_name = name.to_string();
        }
        self.inner.animate_to_branch();
        Ok(())
    }

    pub fn dispose(&self) {
        if self.inner.liveness.is_alive() {
            self.inner.liveness.revoke();
            log::info!("[stage] disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        !self.inner.liveness.is_alive()
    }
}

impl StageInner {
    fn layer_color(&self, layer: &LayerLayout) -> Option<Rgb> {
        let state = self.state.borrow();
        let hex = state.branch().layer_color(layer)?;
        match Rgb::from_hex(hex) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("[stage] layer `{}`: {}", layer.id, e);
                None
            }
        }
    }

    fn build_layers(&self) {
        let state = self.state.borrow();
        let branch = state.branch();
        let mut scene = self.scene.borrow_mut();
        for layer in &self.layout.layers {
            let color = branch.layer_color(layer).unwrap_or_default();
            log::debug!("[stage] plane {} color={}", layer.id, color);
            scene.add_colored_plane(
                color,
                layer.base_position(),
                self.layout.plane_size,
                &layer.id,
            );
        }
    }

    fn populate_vegetation(&self) {
        let assets = &self.layout.decorative_assets;
        if assets.is_empty() {
            log::warn!("[stage] no decorative assets configured");
            return;
        }
        let lo = self.layout.min_items.min(self.layout.max_items);
        let hi = self.layout.min_items.max(self.layout.max_items);
        let mut requests = Vec::new();
        {
            let mut rng = self.rng.borrow_mut();
            for veg in &self.layout.vegetation {
                let tint = self
                    .layout
                    .layer(&veg.layer)
                    .and_then(|l| self.layer_color(l))
                    .unwrap_or_else(|| parse_or(&veg.color, Rgb::WHITE, "vegetation colour"));
                let count = rng.gen_range(lo..=hi);
                for _ in 0..count {
                    let Some(asset) = assets.choose(&mut *rng) else {
                        continue;
                    };
                    let x = (rng.gen::<f32>() - 0.5) * self.layout.scatter_width;
                    requests.push(DecorativeRequest {
                        texture_url: asset.url.clone(),
                        position: Vec3::new(x, asset.y_offset + veg.y_offset, veg.z_offset),
                        size: Vec2::new(veg.scale * VEGETATION_ASPECT, veg.scale),
                        tint,
                        parent: veg.layer.clone(),
                    });
                }
            }
        }
        log::info!("[stage] scattering {} decorative items", requests.len());
        for req in requests {
            let scene = self.scene.clone();
            let cache = self.cache.clone();
            let liveness = self.liveness.clone();
            spawn_scene_task(&*self.spawner, async move {
                let child = add_decorative_plane(scene.clone(), cache, liveness, req).await?;
                // A toggle may have landed while the texture was loading.
                scene.borrow_mut().sync_tint_with_parent(child);
                Ok::<_, SceneError>(child)
            });
        }
    }

    /// Replace the mode toggle with one showing the current mode's icon.
    fn add_mode_toggle(self: &Rc<Self>) {
        let dark = self.state.borrow().is_dark_mode;
        let toggle = &self.layout.toggle;
        self.scene.borrow_mut().remove_object(&toggle.name);

        let liveness = {
            let mut current = self.toggle_liveness.borrow_mut();
            current.revoke();
            *current = self.liveness.child();
            current.clone()
        };
        let weak = Rc::downgrade(self);
        let on_click: ClickHandler = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.toggle_mode();
            }
        });
        let req = ControlRequest {
            name: toggle.name.clone(),
            texture_url: toggle.texture_for(dark).to_string(),
            tint: self.toggle_tint,
            position: toggle.position,
            on_click,
            parent: None,
        };
        spawn_scene_task(
            &*self.spawner,
            create_interactive_control(self.scene.clone(), self.cache.clone(), liveness, req),
        );
    }

    fn handle_pointer_move(&self, client: Vec2, viewport: Vec2) {
        if !self.liveness.is_alive() {
            return;
        }
        let pointer = normalize_pointer(client, viewport);
        let mut scene = self.scene.borrow_mut();
        for layer in &self.layout.layers {
            scene.move_object(&layer.id, parallax_position(layer, pointer, self.layout.parallax));
        }
    }

    fn toggle_mode(self: &Rc<Self>) {
        if !self.liveness.is_alive() {
            return;
        }
        let dark = {
            let mut state = self.state.borrow_mut();
            state.is_dark_mode = !state.is_dark_mode;
            state.is_dark_mode
        };
        log::info!("[stage] toggling theme to {}", if dark { "dark" } else { "light" });
        self.animate_to_branch();
        self.add_mode_toggle();
    }

    /// Fade every layer to the current branch; ground layers carry their
    /// decorative children along.
    fn animate_to_branch(&self) {
        let targets: Vec<Option<Rgb>> = self
            .layout
            .layers
            .iter()
            .map(|l| self.layer_color(l))
            .collect();
        let mut scene = self.scene.borrow_mut();
        for (layer, target) in self.layout.layers.iter().zip(targets) {
            let (Some(target), Some(id)) = (target, scene.lookup(&layer.id)) else {
                continue;
            };
            scene.animate_tint(id, target, self.transition_secs);
            if !layer.is_sky() {
                for child in scene.children(id).to_vec() {
                    scene.animate_tint(child, target, self.transition_secs);
                }
            }
        }
    }
}

fn parse_or(hex: &str, fallback: Rgb, what: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_else(|e| {
        log::warn!("[stage] {}: {}", what, e);
        fallback
    })
}
