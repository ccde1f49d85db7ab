//! Pointer hover/click over the interactive-object registry.

use crate::camera::{Camera, Ray, SurfaceRect};
use crate::constants::{BASE_SCALE, HOVER_SCALE};
use crate::scene::{NodeId, SceneGraph};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::cell::RefCell;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub id: NodeId,
    pub t: f32,
}

/// Ray parameter where `ray` crosses the +Z-facing rectangle, if it does.
#[inline]
pub fn ray_quad(ray: &Ray, center: Vec3, half_size: Vec2) -> Option<f32> {
    if ray.dir.z.abs() < 1e-6 {
        return None;
    }
    let t = (center.z - ray.origin.z) / ray.dir.z;
    if t < 0.0 {
        return None;
    }
    let p = ray.origin + ray.dir * t;
    let inside = (p.x - center.x).abs() <= half_size.x && (p.y - center.y).abs() <= half_size.y;
    inside.then_some(t)
}

/// All interactive hits along `ray`, nearest first. Children of registered
/// objects are tested too.
pub fn intersect_interactive(scene: &SceneGraph, ray: &Ray) -> SmallVec<[Hit; 4]> {
    let mut hits: SmallVec<[Hit; 4]> = SmallVec::new();
    for root in scene.interactive_ids() {
        for id in scene.subtree(*root) {
            if hits.iter().any(|h| h.id == id) {
                continue;
            }
            if let Some(t) = scene
                .world_quad(id)
                .and_then(|(center, half)| ray_quad(ray, center, half))
            {
                hits.push(Hit { id, t });
            }
        }
    }
    hits.sort_by(|a, b| a.t.total_cmp(&b.t));
    hits
}

pub struct PointerInteractionController {
    camera: Option<Camera>,
    surface: Option<SurfaceRect>,
    hovered: Option<NodeId>,
    cursor: Cursor,
    hover_scale: f32,
}

impl Default for PointerInteractionController {
    fn default() -> Self {
        Self::new(HOVER_SCALE)
    }
}

impl PointerInteractionController {
    /// Inert until [`PointerInteractionController::setup`] succeeds.
    pub fn new(hover_scale: f32) -> Self {
        Self {
            camera: None,
            surface: None,
            hovered: None,
            cursor: Cursor::Default,
            hover_scale,
        }
    }

    pub fn setup(&mut self, camera: Option<Camera>, surface: Option<SurfaceRect>) -> bool {
        match (camera, surface) {
            (Some(camera), Some(surface)) => {
                self.camera = Some(camera);
                self.surface = Some(surface);
                true
            }
            (camera, surface) => {
                log::warn!(
                    "[input] interaction setup skipped (camera: {}, surface: {})",
                    camera.is_some(),
                    surface.is_some()
                );
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.camera.is_some() && self.surface.is_some()
    }

    /// Keep the surface rect current after layout changes. Ignored while inert.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        if self.is_ready() {
            self.surface = Some(surface);
        }
    }

    pub fn set_camera(&mut self, camera: Camera) {
        if self.is_ready() {
            self.camera = Some(camera);
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Nearest interactive hit under a client-space point.
    pub fn pick(&self, client: Vec2, scene: &SceneGraph) -> Option<Hit> {
        let (camera, surface) = (self.camera.as_ref()?, self.surface.as_ref()?);
        let ndc = surface.client_to_ndc(client)?;
        let ray = camera.ray_from_ndc(ndc);
        intersect_interactive(scene, &ray).first().copied()
    }

    pub fn pointer_move(&mut self, client: Vec2, scene: &mut SceneGraph) -> Cursor {
        if !self.is_ready() {
            return self.cursor;
        }
        // The hovered object may have been removed since the last event.
        if self.hovered.is_some_and(|id| !scene.contains(id)) {
            self.hovered = None;
        }
        let hit = self.pick(client, scene).map(|h| h.id);
        match hit {
            Some(id) if self.hovered != Some(id) => {
                if let Some(prev) = self.hovered {
                    scene.set_scale(prev, BASE_SCALE);
                }
                scene.set_scale(id, self.hover_scale);
                self.hovered = Some(id);
                self.cursor = Cursor::Pointer;
            }
            Some(_) => {}
            None => self.clear_hover(scene),
        }
        self.cursor
    }

    /// Clears hover regardless of what is under the pointer.
    pub fn pointer_leave(&mut self, scene: &mut SceneGraph) -> Cursor {
        self.clear_hover(scene);
        self.cursor
    }

    /// Hit-test and run the hit's click handler. The scene borrow is released
    /// before the handler runs because handlers mutate the scene. Hover is
    /// re-checked afterwards against whatever the handler left behind.
    pub fn dispatch_click(&mut self, client: Vec2, scene: &RefCell<SceneGraph>) -> bool {
        let graph = scene.borrow();
        let handler = self
            .pick(client, &graph)
            .and_then(|hit| graph.get(hit.id))
            .and_then(|obj| obj.kind.click_handler().cloned());
        drop(graph);
        match handler {
            Some(on_click) => {
                on_click();
                self.pointer_move(client, &mut scene.borrow_mut());
                true
            }
            None => false,
        }
    }

    fn clear_hover(&mut self, scene: &mut SceneGraph) {
        if let Some(prev) = self.hovered.take() {
            scene.set_scale(prev, BASE_SCALE);
        }
        self.cursor = Cursor::Default;
    }
}
