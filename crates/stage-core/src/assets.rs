//! Texture resolution contract and the URL-memoised cache in front of it.
//!
//! The core never sees pixels: a loader hands back an opaque
//! [`TextureHandle`] and the renderer maps handles to GPU textures.

use fnv::FnvHashMap;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("failed to fetch `{url}`: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode `{url}`: {reason}")]
    Decode { url: String, reason: String },
}

pub type TextureResult = Result<TextureHandle, AssetError>;

pub trait TextureLoader {
    /// Start loading `url`. The returned future must not borrow the loader.
    fn load(&self, url: &str) -> LocalBoxFuture<'static, TextureResult>;
}

type PendingTexture = Shared<LocalBoxFuture<'static, TextureResult>>;

pub struct AssetTextureCache {
    loader: Box<dyn TextureLoader>,
    entries: RefCell<FnvHashMap<String, PendingTexture>>,
}

impl AssetTextureCache {
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            entries: RefCell::new(FnvHashMap::default()),
        }
    }

    /// Resolve `url`, sharing one underlying load between all callers.
    /// Failed loads are evicted so a later call can try again.
    pub async fn load_texture(&self, url: &str) -> TextureResult {
        let pending = {
            let mut entries = self.entries.borrow_mut();
            entries
                .entry(url.to_string())
                .or_insert_with(|| self.loader.load(url).shared())
                .clone()
        };
        let result = pending.clone().await;
        if let Err(e) = &result {
            log::warn!("[assets] {}", e);
            let mut entries = self.entries.borrow_mut();
            if entries.get(url).is_some_and(|p| p.ptr_eq(&pending)) {
                entries.remove(url);
            }
        }
        result
    }

    /// Handle for `url` if its load already completed successfully.
    pub fn cached(&self, url: &str) -> Option<TextureHandle> {
        self.entries
            .borrow()
            .get(url)
            .and_then(|p| p.peek().cloned())
            .and_then(Result::ok)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
