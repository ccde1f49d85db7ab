use crate::assets::TextureHandle;
use crate::color::Rgb;
use crate::constants::BASE_SCALE;
use glam::{Vec2, Vec3};
use std::fmt;
use std::rc::Rc;

/// Callback attached to an interactive control, invoked on click.
pub type ClickHandler = Rc<dyn Fn()>;

/// Generational handle into the scene arena. Stale handles never alias a
/// newer object that reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

pub enum ObjectKind {
    PlainPlane {
        color: Rgb,
    },
    TexturedPlane {
        texture: TextureHandle,
        tint: Rgb,
    },
    InteractiveControl {
        texture: TextureHandle,
        tint: Rgb,
        on_click: ClickHandler,
    },
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::PlainPlane { color } => {
                f.debug_struct("PlainPlane").field("color", color).finish()
            }
            ObjectKind::TexturedPlane { texture, tint } => f
                .debug_struct("TexturedPlane")
                .field("texture", texture)
                .field("tint", tint)
                .finish(),
            ObjectKind::InteractiveControl { texture, tint, .. } => f
                .debug_struct("InteractiveControl")
                .field("texture", texture)
                .field("tint", tint)
                .finish_non_exhaustive(),
        }
    }
}

/// Objects that own a colour the theme can drive.
pub trait Tinted {
    fn tint(&self) -> Rgb;
    fn set_tint(&mut self, color: Rgb);
}

impl Tinted for ObjectKind {
    fn tint(&self) -> Rgb {
        match self {
            ObjectKind::PlainPlane { color } => *color,
            ObjectKind::TexturedPlane { tint, .. }
            | ObjectKind::InteractiveControl { tint, .. } => *tint,
        }
    }

    fn set_tint(&mut self, color: Rgb) {
        match self {
            ObjectKind::PlainPlane { color: c } => *c = color,
            ObjectKind::TexturedPlane { tint, .. }
            | ObjectKind::InteractiveControl { tint, .. } => *tint = color,
        }
    }
}

impl ObjectKind {
    pub fn texture(&self) -> Option<TextureHandle> {
        match self {
            ObjectKind::PlainPlane { .. } => None,
            ObjectKind::TexturedPlane { texture, .. }
            | ObjectKind::InteractiveControl { texture, .. } => Some(*texture),
        }
    }

    pub fn click_handler(&self) -> Option<&ClickHandler> {
        match self {
            ObjectKind::InteractiveControl { on_click, .. } => Some(on_click),
            _ => None,
        }
    }
}

/// A flat rectangle facing +Z. `position` is relative to the parent.
#[derive(Debug)]
pub struct SceneObject {
    pub name: Option<String>,
    pub kind: ObjectKind,
    pub position: Vec3,
    pub size: Vec2,
    pub scale: f32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneObject {
    pub fn new(name: Option<String>, kind: ObjectKind, position: Vec3, size: Vec2) -> Self {
        Self {
            name,
            kind,
            position,
            size,
            scale: BASE_SCALE,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl Tinted for SceneObject {
    fn tint(&self) -> Rgb {
        self.kind.tint()
    }

    fn set_tint(&mut self, color: Rgb) {
        self.kind.set_tint(color)
    }
}
