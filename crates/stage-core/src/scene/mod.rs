//! Named-object scene graph.
//!
//! Objects live in a generational arena; the public contract stays
//! name-based through a `name -> NodeId` index. The interactive registry and
//! the per-object colour transitions are kept consistent with the arena on
//! every removal.

mod animation;
mod object;
mod tasks;

pub use animation::*;
pub use object::*;
pub use tasks::*;

use crate::assets::{AssetError, TextureHandle};
use crate::color::Rgb;
use crate::constants::FALLBACK_COLOR;
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("parent `{0}` not found")]
    ParentNotFound(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("stage torn down before `{0}` resolved")]
    Cancelled(String),
}

/// One quad for the renderer, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadDraw {
    pub id: NodeId,
    pub center: Vec3,
    pub half_size: Vec2,
    pub color: [f32; 4],
    pub texture: Option<TextureHandle>,
}

struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    names: FnvHashMap<String, NodeId>,
    roots: Vec<NodeId>,
    interactive: Vec<NodeId>,
    transitions: FnvHashMap<NodeId, ColorTransition>,
    fallback_color: Rgb,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Rgb::from_hex(FALLBACK_COLOR).unwrap_or(Rgb::WHITE))
    }
}

fn object_mut(slots: &mut [Slot], id: NodeId) -> Option<&mut SceneObject> {
    slots
        .get_mut(id.index as usize)
        .filter(|s| s.generation == id.generation)
        .and_then(|s| s.object.as_mut())
}

impl SceneGraph {
    pub fn new(fallback_color: Rgb) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            names: FnvHashMap::default(),
            roots: Vec::new(),
            interactive: Vec::new(),
            transitions: FnvHashMap::default(),
            fallback_color,
        }
    }

    // ---------------- Arena ----------------

    pub fn get(&self, id: NodeId) -> Option<&SceneObject> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.object.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneObject> {
        object_mut(&mut self.slots, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|o| o.children()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Interactive objects in registration order.
    pub fn interactive_ids(&self) -> &[NodeId] {
        &self.interactive
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(obj) = self.get(cur) {
                out.push(cur);
                stack.extend(obj.children.iter().rev().copied());
            }
        }
        out
    }

    fn insert(&mut self, mut object: SceneObject, parent: Option<NodeId>) -> NodeId {
        if let Some(name) = object.name.clone() {
            if let Some(existing) = self.lookup(&name) {
                log::warn!("[scene] replacing existing object `{}`", name);
                self.remove_id(existing);
            }
        }
        let parent = parent.filter(|p| self.contains(*p));
        object.parent = parent;

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(object),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        if let Some(name) = self.get(id).and_then(|o| o.name.clone()) {
            self.names.insert(name, id);
        }
        match parent.and_then(|p| self.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn remove_id(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.get(id).map(|o| o.parent) else {
            return false;
        };
        match parent.and_then(|p| self.get_mut(p)) {
            Some(p) => p.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        for node in self.subtree(id) {
            let slot = &mut self.slots[node.index as usize];
            let Some(obj) = slot.object.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
            if let Some(name) = obj.name {
                if self.names.get(&name) == Some(&node) {
                    self.names.remove(&name);
                }
            }
            self.interactive.retain(|i| *i != node);
            self.transitions.remove(&node);
        }
        true
    }

    // ---------------- Named operations ----------------

    /// Solid rectangle registered under `name`. A missing or malformed colour
    /// falls back to the configured fallback colour.
    pub fn add_colored_plane(
        &mut self,
        color: &str,
        position: Vec3,
        size: Vec2,
        name: &str,
    ) -> NodeId {
        let color = match Rgb::from_hex(color) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("[scene] plane `{}`: {}; using fallback colour", name, e);
                self.fallback_color
            }
        };
        self.insert(
            SceneObject::new(
                Some(name.to_string()),
                ObjectKind::PlainPlane { color },
                position,
                size,
            ),
            None,
        )
    }

    /// Tinted textured rectangle under the plane named `parent_name`. A child
    /// added while its parent is fading joins that fade.
    pub fn attach_decorative(
        &mut self,
        texture: TextureHandle,
        position: Vec3,
        size: Vec2,
        tint: Rgb,
        parent_name: &str,
    ) -> Result<NodeId, SceneError> {
        let parent = self
            .lookup(parent_name)
            .ok_or_else(|| SceneError::ParentNotFound(parent_name.to_string()))?;
        let id = self.insert(
            SceneObject::new(None, ObjectKind::TexturedPlane { texture, tint }, position, size),
            Some(parent),
        );
        if let Some(fade) = self.transitions.get(&parent).copied() {
            self.transitions.insert(id, fade.joined_from(tint));
        }
        Ok(id)
    }

    /// Unit-sized interactive control carrying `on_click`, registered for
    /// hit-testing and attached to `parent_name` or the scene root.
    pub fn attach_interactive(
        &mut self,
        name: &str,
        texture: TextureHandle,
        tint: Rgb,
        position: Vec3,
        on_click: ClickHandler,
        parent_name: Option<&str>,
    ) -> Result<NodeId, SceneError> {
        let parent = match parent_name {
            Some(p) => Some(
                self.lookup(p)
                    .ok_or_else(|| SceneError::ParentNotFound(p.to_string()))?,
            ),
            None => None,
        };
        let id = self.insert(
            SceneObject::new(
                Some(name.to_string()),
                ObjectKind::InteractiveControl {
                    texture,
                    tint,
                    on_click,
                },
                position,
                Vec2::ONE,
            ),
            parent,
        );
        self.interactive.push(id);
        Ok(id)
    }

    pub fn move_object(&mut self, name: &str, position: Vec3) -> bool {
        match self.lookup(name).and_then(|id| self.get_mut(id)) {
            Some(obj) => {
                obj.position = position;
                true
            }
            None => false,
        }
    }

    /// Removes `name` and its subtree from the scene and the interactive
    /// registry. Missing names are ignored.
    pub fn remove_object(&mut self, name: &str) -> bool {
        match self.lookup(name) {
            Some(id) => self.remove_id(id),
            None => false,
        }
    }

    pub fn set_scale(&mut self, id: NodeId, scale: f32) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                obj.scale = scale;
                true
            }
            None => false,
        }
    }

    // ---------------- Transforms ----------------

    /// World position and accumulated scale. Rectangles never rotate, so a
    /// parent only translates and scales its children.
    pub fn world_transform(&self, id: NodeId) -> Option<(Vec3, f32)> {
        let obj = self.get(id)?;
        match obj.parent.and_then(|p| self.world_transform(p)) {
            Some((parent_pos, parent_scale)) => Some((
                parent_pos + obj.position * parent_scale,
                parent_scale * obj.scale,
            )),
            None => Some((obj.position, obj.scale)),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_transform(id).map(|(p, _)| p)
    }

    pub fn world_scale(&self, id: NodeId) -> Option<f32> {
        self.world_transform(id).map(|(_, s)| s)
    }

    /// Centre and half extents in world space.
    pub fn world_quad(&self, id: NodeId) -> Option<(Vec3, Vec2)> {
        let obj = self.get(id)?;
        let (center, scale) = self.world_transform(id)?;
        Some((center, obj.size * 0.5 * scale))
    }

    // ---------------- Colour transitions ----------------

    /// Fade `id` from its current tint to `target`. Any fade already running
    /// on the same object is superseded and continues from where it stood.
    pub fn animate_tint(&mut self, id: NodeId, target: Rgb, duration_secs: f32) -> bool {
        let Some(from) = self.get(id).map(Tinted::tint) else {
            return false;
        };
        self.transitions
            .insert(id, ColorTransition::new(from, target, duration_secs));
        true
    }

    pub fn transition(&self, id: NodeId) -> Option<&ColorTransition> {
        self.transitions.get(&id)
    }

    pub fn is_animating(&self, id: NodeId) -> bool {
        self.transitions.contains_key(&id)
    }

    pub fn active_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Colour `id` will show once any running fade completes.
    pub fn settled_tint(&self, id: NodeId) -> Option<Rgb> {
        match self.transitions.get(&id) {
            Some(t) => Some(t.to),
            None => self.get(id).map(Tinted::tint),
        }
    }

    /// Snap an idle child to its parent's settled tint.
    pub fn sync_tint_with_parent(&mut self, child: NodeId) -> bool {
        if self.is_animating(child) {
            return false;
        }
        let Some(parent) = self.get(child).and_then(|c| c.parent) else {
            return false;
        };
        if let Some(fade) = self.transitions.get(&parent).copied() {
            let from = self.get(child).map(Tinted::tint).unwrap_or(fade.from);
            self.transitions.insert(child, fade.joined_from(from));
            return true;
        }
        match (self.settled_tint(parent), self.get_mut(child)) {
            (Some(color), Some(obj)) => {
                obj.set_tint(color);
                true
            }
            _ => false,
        }
    }

    /// Sample every running fade at `now` (seconds) and drop finished ones.
    pub fn advance(&mut self, now: f64) {
        let slots = &mut self.slots;
        self.transitions.retain(|id, fade| {
            let Some(obj) = object_mut(slots, *id) else {
                return false;
            };
            let (color, done) = fade.sample(now);
            obj.set_tint(color);
            !done
        });
    }

    // ---------------- Rendering ----------------

    /// Every object as a world-space quad, sorted back to front.
    pub fn draw_list(&self) -> Vec<QuadDraw> {
        let mut out = Vec::with_capacity(self.slots.len());
        for root in &self.roots {
            for id in self.subtree(*root) {
                let (Some(obj), Some((center, half_size))) = (self.get(id), self.world_quad(id))
                else {
                    continue;
                };
                out.push(QuadDraw {
                    id,
                    center,
                    half_size,
                    color: obj.tint().to_rgba(1.0),
                    texture: obj.kind.texture(),
                });
            }
        }
        out.sort_by(|a, b| a.center.z.total_cmp(&b.center.z));
        out
    }
}
