//! Fire-and-forget scene population that waits on texture resolution.
//!
//! Each continuation checks its [`Liveness`] token before touching the scene,
//! so work that lands after teardown is discarded instead of applied.

use super::{ClickHandler, NodeId, SceneError, SceneGraph};
use crate::assets::AssetTextureCache;
use crate::color::Rgb;
use crate::lifecycle::Liveness;
use futures::future::FutureExt;
use futures::task::{LocalSpawn, LocalSpawnExt};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

pub type SharedScene = Rc<RefCell<SceneGraph>>;

#[derive(Clone, Debug)]
pub struct DecorativeRequest {
    pub texture_url: String,
    pub position: Vec3,
    pub size: Vec2,
    pub tint: Rgb,
    pub parent: String,
}

#[derive(Clone)]
pub struct ControlRequest {
    pub name: String,
    pub texture_url: String,
    pub tint: Rgb,
    pub position: Vec3,
    pub on_click: ClickHandler,
    pub parent: Option<String>,
}

pub async fn add_decorative_plane(
    scene: SharedScene,
    cache: Rc<AssetTextureCache>,
    liveness: Liveness,
    req: DecorativeRequest,
) -> Result<NodeId, SceneError> {
    let texture = cache.load_texture(&req.texture_url).await?;
    if !liveness.is_alive() {
        return Err(SceneError::Cancelled(req.texture_url));
    }
    let attached = scene.borrow_mut().attach_decorative(
        texture,
        req.position,
        req.size,
        req.tint,
        &req.parent,
    );
    if let Err(e) = &attached {
        log::warn!("[scene] dropping decorative `{}`: {}", req.texture_url, e);
    }
    attached
}

pub async fn create_interactive_control(
    scene: SharedScene,
    cache: Rc<AssetTextureCache>,
    liveness: Liveness,
    req: ControlRequest,
) -> Result<NodeId, SceneError> {
    let texture = cache.load_texture(&req.texture_url).await?;
    if !liveness.is_alive() {
        return Err(SceneError::Cancelled(req.name));
    }
    let attached = scene.borrow_mut().attach_interactive(
        &req.name,
        texture,
        req.tint,
        req.position,
        req.on_click,
        req.parent.as_deref(),
    );
    match &attached {
        Ok(_) => log::info!("[scene] control `{}` ready", req.name),
        Err(e) => log::warn!("[scene] dropping control `{}`: {}", req.name, e),
    }
    attached
}

/// Run a scene task without waiting for it; the outcome has already been
/// logged by the task itself.
pub fn spawn_scene_task<F>(spawner: &dyn LocalSpawn, task: F)
where
    F: Future<Output = Result<NodeId, SceneError>> + 'static,
{
    if let Err(e) = spawner.spawn_local(task.map(|_| ())) {
        log::error!("[scene] could not spawn task: {}", e);
    }
}
