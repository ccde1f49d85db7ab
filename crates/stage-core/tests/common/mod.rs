// Shared fakes for host-side tests: texture loaders and a stage harness
// driven by a single-threaded executor.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::LocalSpawn;
use stage_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

/// Resolves every URL on the next poll. Handles are numbered in first-request
/// order, so `handle_for` tells which texture an object received.
#[derive(Clone, Default)]
pub struct ReadyLoader {
    pub requested: Rc<RefCell<Vec<String>>>,
    pub failing: Rc<RefCell<Vec<String>>>,
    pub calls: Rc<Cell<usize>>,
}

impl ReadyLoader {
    pub fn handle_for(&self, url: &str) -> Option<TextureHandle> {
        self.requested
            .borrow()
            .iter()
            .position(|u| u == url)
            .map(|i| TextureHandle::new(i as u32))
    }

    pub fn fail(&self, url: &str) {
        self.failing.borrow_mut().push(url.to_string());
    }
}

impl TextureLoader for ReadyLoader {
    fn load(&self, url: &str) -> LocalBoxFuture<'static, TextureResult> {
        self.calls.set(self.calls.get() + 1);
        if self.failing.borrow().iter().any(|f| f == url) {
            let err = AssetError::Fetch {
                url: url.to_string(),
                reason: "404".to_string(),
            };
            return futures::future::ready(Err(err)).boxed_local();
        }
        let mut requested = self.requested.borrow_mut();
        let id = match requested.iter().position(|u| u == url) {
            Some(i) => i,
            None => {
                requested.push(url.to_string());
                requested.len() - 1
            }
        };
        futures::future::ready(Ok(TextureHandle::new(id as u32))).boxed_local()
    }
}

/// Holds every load open until the test completes it.
#[derive(Clone, Default)]
pub struct DeferredLoader {
    pending: Rc<RefCell<Vec<(String, oneshot::Sender<TextureResult>)>>>,
    next_id: Rc<Cell<u32>>,
}

impl DeferredLoader {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn complete_all(&self) {
        for (_, tx) in self.pending.borrow_mut().drain(..) {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let _ = tx.send(Ok(TextureHandle::new(id)));
        }
    }

    pub fn fail_all(&self) {
        for (url, tx) in self.pending.borrow_mut().drain(..) {
            let _ = tx.send(Err(AssetError::Decode {
                url,
                reason: "corrupt".to_string(),
            }));
        }
    }
}

impl TextureLoader for DeferredLoader {
    fn load(&self, url: &str) -> LocalBoxFuture<'static, TextureResult> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((url.to_string(), tx));
        let url = url.to_string();
        rx.map(move |r| {
            r.unwrap_or_else(|_| {
                Err(AssetError::Fetch {
                    url,
                    reason: "dropped".to_string(),
                })
            })
        })
        .boxed_local()
    }
}

pub struct Harness {
    pub pool: LocalPool,
    pub loader: ReadyLoader,
    pub cache: Rc<AssetTextureCache>,
    pub stage: StageCoordinator,
}

impl Harness {
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn color_of(&self, name: &str) -> Option<String> {
        self.stage
            .scene()
            .borrow()
            .object(name)
            .map(|o| o.tint().to_hex())
    }
}

pub fn stage_with(config: StageConfig) -> Harness {
    let pool = LocalPool::new();
    let spawner: Rc<dyn LocalSpawn> = Rc::new(pool.spawner());
    let loader = ReadyLoader::default();
    let cache = Rc::new(AssetTextureCache::new(loader.clone()));
    let stage = StageCoordinator::new(&config, cache.clone(), spawner).expect("theme exists");
    Harness {
        pool,
        loader,
        cache,
        stage,
    }
}

pub fn meadow_stage() -> Harness {
    stage_with(StageConfig {
        seed: Some(7),
        ..StageConfig::default()
    })
}

pub fn surface() -> SurfaceRect {
    SurfaceRect::new(0.0, 0.0, 1600.0, 900.0)
}

pub fn ready_controller() -> PointerInteractionController {
    let mut controller = PointerInteractionController::default();
    assert!(controller.setup(Some(Camera::default()), Some(surface())));
    controller
}

/// Client position at which `world` appears on the test surface.
pub fn client_for(world: glam::Vec3) -> glam::Vec2 {
    surface().ndc_to_client(Camera::default().project(world))
}

/// Records log lines per test thread. Executors here are single-threaded, so
/// everything a test triggers lands in its own buffer.
struct CaptureLogger;

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = record.args().to_string();
        CAPTURED.with(|c| c.borrow_mut().push((record.level(), line)));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Install the capturing logger and clear this thread's buffer.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Warnings logged on this thread since the last `capture_logs`.
pub fn warnings() -> Vec<String> {
    CAPTURED.with(|c| {
        c.borrow()
            .iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, line)| line.clone())
            .collect()
    })
}
