//! Per-kind default images.
//!
//! Each kind has its own publish-once cell. Readers see either nothing
//! (loading still pending) or a complete entry, never a partial one.

use std::sync::OnceLock;

use bytes::Bytes;

use crate::{AssetBody, AssetKind, AssetSource, NotFoundReason};

#[derive(Debug)]
enum DefaultSlot {
    Loaded(Bytes),
    Unavailable,
}

/// Snapshot of one kind's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAsset {
    pub media_type: &'static str,
    pub body: AssetBody,
}

/// Registry of the three compiled-in defaults.
#[derive(Debug, Default)]
pub struct DefaultAssets {
    favicon: OnceLock<DefaultSlot>,
    thumb: OnceLock<DefaultSlot>,
    cover: OnceLock<DefaultSlot>,
}

impl DefaultAssets {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, kind: AssetKind) -> &OnceLock<DefaultSlot> {
        match kind {
            AssetKind::Favicon => &self.favicon,
            AssetKind::Thumb => &self.thumb,
            AssetKind::Cover => &self.cover,
        }
    }

    /// Publish the default for `kind`. `None` marks it unavailable.
    ///
    /// Returns false if the kind was already published; the first value wins.
    pub fn publish(&self, kind: AssetKind, bytes: Option<Bytes>) -> bool {
        let slot = match bytes {
            Some(bytes) => DefaultSlot::Loaded(bytes),
            None => DefaultSlot::Unavailable,
        };
        self.cell(kind).set(slot).is_ok()
    }

    pub fn is_published(&self, kind: AssetKind) -> bool {
        self.cell(kind).get().is_some()
    }

    /// Current default for `kind`. Never blocks.
    pub fn get(&self, kind: AssetKind) -> DefaultAsset {
        let body = match self.cell(kind).get() {
            Some(DefaultSlot::Loaded(bytes)) => AssetBody::Bytes(bytes.clone()),
            Some(DefaultSlot::Unavailable) => AssetBody::NotFound(NotFoundReason::DefaultUnavailable),
            None => AssetBody::NotFound(NotFoundReason::DefaultPending),
        };
        DefaultAsset { media_type: kind.default_media_type(), body }
    }

    /// Load every kind from `source` concurrently and publish each as it
    /// completes. Failures are logged and leave that kind unavailable.
    pub async fn load_from(&self, source: &dyn AssetSource) {
        tokio::join!(
            self.load_one(source, AssetKind::Favicon),
            self.load_one(source, AssetKind::Thumb),
            self.load_one(source, AssetKind::Cover),
        );
    }

    async fn load_one(&self, source: &dyn AssetSource, kind: AssetKind) {
        let bytes = match source.load_default(kind).await {
            Ok(Some(bytes)) => {
                tracing::debug!(%kind, len = bytes.len(), "loaded default asset");
                Some(bytes)
            }
            Ok(None) => {
                tracing::error!(%kind, "default asset file not found");
                None
            }
            Err(e) => {
                tracing::error!(%kind, error = %e, "failed to load default asset");
                None
            }
        };
        self.publish(kind, bytes);
    }
}
