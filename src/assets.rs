//! Browser texture loading: `fetch`, decode to RGBA8 and park the pixels until
//! the renderer uploads them.

use fnv::FnvHashMap;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use stage_core::{AssetError, TextureHandle, TextureLoader, TextureResult};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Default)]
struct StoreInner {
    next_id: u32,
    pending: FnvHashMap<TextureHandle, DecodedTexture>,
}

/// Decoded textures waiting for GPU upload, keyed by the handle the cache
/// hands out.
#[derive(Clone, Default)]
pub struct TextureStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl TextureStore {
    fn insert(&self, texture: DecodedTexture) -> TextureHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = TextureHandle::new(inner.next_id);
        inner.next_id += 1;
        inner.pending.insert(handle, texture);
        handle
    }

    /// Pixels for `handle`, handed out once.
    pub fn take(&self, handle: TextureHandle) -> Option<DecodedTexture> {
        self.inner.borrow_mut().pending.remove(&handle)
    }
}

pub struct FetchTextureLoader {
    store: TextureStore,
}

impl FetchTextureLoader {
    pub fn new(store: TextureStore) -> Self {
        Self { store }
    }
}

impl TextureLoader for FetchTextureLoader {
    fn load(&self, url: &str) -> LocalBoxFuture<'static, TextureResult> {
        let store = self.store.clone();
        let url = url.to_string();
        async move {
            let bytes = fetch_bytes(&url).await.map_err(|reason| AssetError::Fetch {
                url: url.clone(),
                reason,
            })?;
            let image = image::load_from_memory(&bytes)
                .map_err(|e| AssetError::Decode {
                    url: url.clone(),
                    reason: e.to_string(),
                })?
                .to_rgba8();
            let (width, height) = image.dimensions();
            log::debug!("[assets] decoded {} ({}x{})", url, width, height);
            Ok(store.insert(DecodedTexture {
                width,
                height,
                rgba: image.into_raw(),
            }))
        }
        .boxed_local()
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let window = web::window().ok_or_else(|| "no window".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("{:?}", e))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|_| "fetch did not yield a Response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body = response.array_buffer().map_err(|e| format!("{:?}", e))?;
    let buffer = JsFuture::from(body).await.map_err(|e| format!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Runs scene tasks on the browser microtask queue.
pub struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
