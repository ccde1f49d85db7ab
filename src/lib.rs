#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts a canvas, renders the stage with WebGPU and
//! wires pointer input to the core coordinator.

use futures::task::LocalSpawn;
use instant::Instant;
use stage_core::{
    AssetTextureCache, Camera, PointerInteractionController, StageConfig, StageCoordinator,
    TARGET_ASPECT,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("parallax-stage loaded");
    Ok(())
}

/// Handle returned to JavaScript for a mounted stage.
#[wasm_bindgen]
pub struct StageHandle {
    stage: Rc<StageCoordinator>,
    canvas: web::HtmlCanvasElement,
    listeners: RefCell<Vec<events::ListenerGuard>>,
    frame: frame::FrameLoop,
}

#[wasm_bindgen]
impl StageHandle {
    #[wasm_bindgen(js_name = isDarkMode)]
    pub fn is_dark_mode(&self) -> bool {
        self.stage.is_dark_mode()
    }

    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&self) {
        self.stage.toggle_mode();
    }

    #[wasm_bindgen(js_name = switchTheme)]
    pub fn switch_theme(&self, name: &str) -> Result<(), JsValue> {
        self.stage
            .switch_theme(name)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn canvas(&self) -> web::HtmlCanvasElement {
        self.canvas.clone()
    }

    /// Stop rendering, remove every listener and the canvas. Textures still
    /// in flight are discarded when they land.
    pub fn dispose(&self) {
        if self.stage.is_disposed() {
            return;
        }
        self.stage.dispose();
        self.frame.stop();
        self.listeners.borrow_mut().clear();
        self.canvas.remove();
    }
}

/// `free()` from JavaScript without `dispose()` must still stop the frame loop.
impl Drop for StageHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Mount a stage into the element with id `container_id`. `config_json`
/// overrides any part of the reference stage.
#[wasm_bindgen(js_name = mountStage)]
pub async fn mount_stage(
    container_id: String,
    config_json: Option<String>,
) -> Result<StageHandle, JsValue> {
    mount(&container_id, config_json.as_deref())
        .await
        .map_err(|e| {
            log::error!("mount error: {:?}", e);
            JsValue::from_str(&format!("{:#}", e))
        })
}

async fn mount(container_id: &str, config_json: Option<&str>) -> anyhow::Result<StageHandle> {
    let config = match config_json {
        Some(json) => StageConfig::from_json(json)?,
        None => StageConfig::default(),
    };
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", container_id))?;

    let canvas = dom::mount_canvas(&document, &container)?;
    dom::fit_canvas(&canvas, &container, TARGET_ASPECT);

    let camera = Camera::default();
    let gpu = frame::init_gpu(&canvas, &camera).await;

    let textures = assets::TextureStore::default();
    let cache = Rc::new(AssetTextureCache::new(assets::FetchTextureLoader::new(
        textures.clone(),
    )));
    let spawner: Rc<dyn LocalSpawn> = Rc::new(assets::WasmSpawner);
    let stage = Rc::new(StageCoordinator::new(&config, cache, spawner)?);

    let mut controller = PointerInteractionController::new(config.hover_scale);
    controller.setup(Some(camera), dom::surface_rect(&canvas));
    let controller = Rc::new(RefCell::new(controller));

    stage.initialize();

    let listeners = events::wire_stage_events(&events::StageWiring {
        canvas: canvas.clone(),
        container,
        stage: stage.clone(),
        controller,
    })?;

    let frame = frame::start_loop(frame::FrameContext {
        stage: stage.clone(),
        gpu,
        textures,
        canvas: canvas.clone(),
        started: Instant::now(),
    });

    log::info!("[stage] mounted into #{}", container_id);
    Ok(StageHandle {
        stage,
        canvas,
        listeners: RefCell::new(listeners),
        frame,
    })
}
