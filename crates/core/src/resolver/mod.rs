//! Layered asset resolution.
//!
//! For a parsed [`AssetRequest`] the resolver tries, in order:
//!
//! 1. the built-in icon set, for locators under the internal scheme
//! 2. the site asset store, for everything else
//! 3. the compiled-in default for the requested kind
//!
//! Resolution never fails. Collaborator errors are logged and the next layer
//! is used instead, so a missing icon cannot break the page that shows it.

pub mod builtin;

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinHandle;

use crate::asset::data_url;
use crate::{AssetBody, AssetKind, AssetRequest, AssetSource, DefaultAssets, Error, NotFoundReason, SiteAssetStore};

pub use builtin::DEFAULT_INTERNAL_SCHEME;

/// Media type of every built-in icon.
const BUILTIN_MEDIA_TYPE: &str = "image/png";

/// Which branch of the resolver produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    InvalidKind,
    Builtin,
    BuiltinFallback,
    Cache,
    CacheFallback,
}

impl ResolvedFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedFrom::InvalidKind => "invalid_kind",
            ResolvedFrom::Builtin => "builtin",
            ResolvedFrom::BuiltinFallback => "builtin_fallback",
            ResolvedFrom::Cache => "cache",
            ResolvedFrom::CacheFallback => "cache_fallback",
        }
    }
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// None only when the kind was not recognized.
    pub media_type: Option<String>,
    pub body: AssetBody,
    /// Requested size after density adjustment. Advisory.
    pub size: u32,
    pub source: ResolvedFrom,
}

impl Resolution {
    pub fn bytes(&self) -> Option<&Bytes> {
        self.body.bytes()
    }

    pub fn is_found(&self) -> bool {
        !self.body.is_not_found()
    }
}

/// Resolves asset requests against built-ins, the store and defaults.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn AssetSource>,
    store: Arc<dyn SiteAssetStore>,
    defaults: Arc<DefaultAssets>,
    internal_scheme: Arc<str>,
}

impl Resolver {
    /// Create a resolver with empty defaults and the default internal scheme.
    pub fn new(source: Arc<dyn AssetSource>, store: Arc<dyn SiteAssetStore>) -> Self {
        Self {
            source,
            store,
            defaults: Arc::new(DefaultAssets::new()),
            internal_scheme: Arc::from(DEFAULT_INTERNAL_SCHEME),
        }
    }

    pub fn with_internal_scheme(mut self, scheme: &str) -> Self {
        self.internal_scheme = Arc::from(scheme);
        self
    }

    pub fn with_defaults(mut self, defaults: Arc<DefaultAssets>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    pub fn defaults(&self) -> &DefaultAssets {
        &self.defaults
    }

    /// Start loading the compiled-in defaults in the background.
    ///
    /// Requests served before a kind is published get the pending sentinel.
    pub fn spawn_default_loading(&self) -> JoinHandle<()> {
        let defaults = Arc::clone(&self.defaults);
        let source = Arc::clone(&self.source);
        tokio::spawn(async move { defaults.load_from(source.as_ref()).await })
    }

    /// Parse `reference` and resolve it.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedReference` if the reference cannot be parsed.
    /// Everything after parsing degrades instead of failing.
    pub async fn resolve_reference(&self, reference: &str, high_density: bool) -> Result<Resolution, Error> {
        let request = AssetRequest::parse(reference)?;
        Ok(self.resolve(&request, high_density).await)
    }

    /// Resolve a parsed request.
    pub async fn resolve(&self, request: &AssetRequest, high_density: bool) -> Resolution {
        let Some(kind) = request.asset_kind() else {
            tracing::debug!(kind = request.kind(), "unrecognized asset kind");
            return Resolution {
                media_type: None,
                body: AssetBody::NotFound(NotFoundReason::UnknownKind),
                size: request.size(),
                source: ResolvedFrom::InvalidKind,
            };
        };

        let size = if high_density { request.size().saturating_mul(2) } else { request.size() };
        let locator = request.site_locator();

        if locator.starts_with(&*self.internal_scheme) {
            self.resolve_builtin(kind, locator, size).await
        } else {
            self.resolve_cached(kind, locator, size).await
        }
    }

    async fn resolve_builtin(&self, kind: AssetKind, locator: &str, size: u32) -> Resolution {
        let Some(name) = builtin::builtin_name(locator, &self.internal_scheme) else {
            tracing::debug!(locator, "no built-in icon name for locator");
            return self.fallback(kind, size, ResolvedFrom::BuiltinFallback);
        };

        match self.source.load_builtin(name).await {
            Ok(Some(bytes)) => Resolution {
                media_type: Some(BUILTIN_MEDIA_TYPE.to_string()),
                body: AssetBody::Bytes(bytes),
                size,
                source: ResolvedFrom::Builtin,
            },
            Ok(None) => {
                tracing::debug!(name, "built-in icon not found");
                self.fallback(kind, size, ResolvedFrom::BuiltinFallback)
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "failed to load built-in icon");
                self.fallback(kind, size, ResolvedFrom::BuiltinFallback)
            }
        }
    }

    async fn resolve_cached(&self, kind: AssetKind, locator: &str, size: u32) -> Resolution {
        match self.store.get(locator, kind).await {
            Ok(Some(encoded)) => match data_url::decode(&encoded) {
                Ok(decoded) => {
                    tracing::debug!(%kind, locator, "site asset cache hit");
                    return Resolution {
                        media_type: Some(decoded.media_type),
                        body: AssetBody::Bytes(decoded.bytes),
                        size,
                        source: ResolvedFrom::Cache,
                    };
                }
                Err(e) => tracing::warn!(%kind, locator, error = %e, "discarding undecodable site asset"),
            },
            Ok(None) => tracing::debug!(%kind, locator, "site asset cache miss"),
            Err(e) => tracing::warn!(%kind, locator, error = %e, "site asset store lookup failed"),
        }

        self.fallback(kind, size, ResolvedFrom::CacheFallback)
    }

    fn fallback(&self, kind: AssetKind, size: u32, source: ResolvedFrom) -> Resolution {
        let default = self.defaults.get(kind);
        Resolution { media_type: Some(default.media_type.to_string()), body: default.body, size, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSource {
        builtins: HashMap<String, Bytes>,
        fail_builtins: bool,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AssetSource for FakeSource {
        async fn load_builtin(&self, name: &str) -> Result<Option<Bytes>, Error> {
            self.requested.lock().unwrap().push(name.to_string());
            if self.fail_builtins {
                return Err(Error::Io(std::io::Error::other("unreadable")));
            }
            Ok(self.builtins.get(name).cloned())
        }

        async fn load_default(&self, kind: AssetKind) -> Result<Option<Bytes>, Error> {
            Ok(Some(default_bytes(kind)))
        }

        async fn list_builtins(&self) -> Result<Vec<String>, Error> {
            Ok(self.builtins.keys().cloned().collect())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        entries: HashMap<(String, AssetKind), String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeStore {
        fn with(locator: &str, kind: AssetKind, data_url: &str) -> Self {
            let mut store = Self::default();
            store.entries.insert((locator.to_string(), kind), data_url.to_string());
            store
        }
    }

    #[async_trait]
    impl SiteAssetStore for FakeStore {
        async fn get(&self, locator: &str, kind: AssetKind) -> Result<Option<String>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::InvalidInput("store offline".into()));
            }
            Ok(self.entries.get(&(locator.to_string(), kind)).cloned())
        }
    }

    fn default_bytes(kind: AssetKind) -> Bytes {
        Bytes::from(format!("default-{kind}"))
    }

    async fn loaded(source: Arc<FakeSource>, store: Arc<FakeStore>) -> Resolver {
        let resolver = Resolver::new(source, store);
        resolver.spawn_default_loading().await.unwrap();
        resolver
    }

    #[tokio::test]
    async fn test_cache_hit_decodes_data_url() {
        let store = Arc::new(FakeStore::with("https://x.com", AssetKind::Favicon, "data:image/png;base64,aGVsbG8="));
        let resolver = loaded(Arc::default(), store).await;

        let res = resolver.resolve_reference("asset:favicon:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::Cache);
        assert_eq!(res.media_type.as_deref(), Some("image/png"));
        assert_eq!(res.bytes().map(|b| b.as_ref()), Some(&b"hello"[..]));
    }

    #[tokio::test]
    async fn test_invalid_kind_skips_store() {
        let store = Arc::new(FakeStore::default());
        let source = Arc::new(FakeSource::default());
        let resolver = loaded(source.clone(), store.clone()).await;

        let res = resolver.resolve_reference("asset:banner:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::InvalidKind);
        assert_eq!(res.media_type, None);
        assert_eq!(res.body, AssetBody::NotFound(NotFoundReason::UnknownKind));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_miss_returns_default_for_kind() {
        let resolver = loaded(Arc::default(), Arc::default()).await;

        for kind in AssetKind::ALL {
            assert!(resolver.defaults().is_published(kind));
            let request = AssetRequest::new(kind, 16, "https://x.com");
            let res = resolver.resolve(&request, false).await;
            assert_eq!(res.source, ResolvedFrom::CacheFallback);
            assert_eq!(res.media_type.as_deref(), Some(kind.default_media_type()));
            assert_eq!(res.bytes(), Some(&default_bytes(kind)));
        }
    }

    #[tokio::test]
    async fn test_defaults_pending_returns_sentinel() {
        let resolver = Resolver::new(Arc::new(FakeSource::default()), Arc::new(FakeStore::default()));

        let res = resolver.resolve_reference("asset:cover:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::CacheFallback);
        assert_eq!(res.media_type.as_deref(), Some("image/jpeg"));
        assert_eq!(res.body, AssetBody::NotFound(NotFoundReason::DefaultPending));
    }

    #[tokio::test]
    async fn test_malformed_entry_falls_back() {
        let store = Arc::new(FakeStore::with("https://x.com", AssetKind::Thumb, "data:image/png;base64aGVsbG8="));
        let resolver = loaded(Arc::default(), store).await;

        let res = resolver.resolve_reference("asset:thumb:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::CacheFallback);
        assert_eq!(res.bytes(), Some(&default_bytes(AssetKind::Thumb)));
    }

    #[tokio::test]
    async fn test_empty_payload_falls_back() {
        let store = Arc::new(FakeStore::with("https://x.com", AssetKind::Favicon, "data:image/png;base64,"));
        let resolver = loaded(Arc::default(), store).await;

        let res = resolver.resolve_reference("asset:favicon:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::CacheFallback);
    }

    #[tokio::test]
    async fn test_store_error_falls_back() {
        let store = Arc::new(FakeStore { fail: true, ..Default::default() });
        let resolver = loaded(Arc::default(), store.clone()).await;

        let res = resolver.resolve_reference("asset:favicon:https://x.com", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::CacheFallback);
        assert_eq!(res.bytes(), Some(&default_bytes(AssetKind::Favicon)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_override_precedence_end_to_end() {
        let mut source = FakeSource::default();
        source.builtins.insert("bookmarks".into(), Bytes::from_static(b"bookmarks-icon"));
        let source = Arc::new(source);
        let store = Arc::new(FakeStore::default());
        let resolver = loaded(source.clone(), store.clone()).await;

        let request = AssetRequest::parse("asset:favicon:beaker://library/?view=bookmarks").unwrap();
        let res = resolver.resolve(&request, false).await;

        assert_eq!(*source.requested.lock().unwrap(), vec!["bookmarks".to_string()]);
        assert_eq!(res.source, ResolvedFrom::Builtin);
        assert_eq!(res.media_type.as_deref(), Some("image/png"));
        assert_eq!(res.bytes().map(|b| b.as_ref()), Some(&b"bookmarks-icon"[..]));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_builtin_falls_back_without_store() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(FakeStore::default());
        let resolver = loaded(source.clone(), store.clone()).await;

        let res = resolver.resolve_reference("asset:thumb:beaker://settings", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::BuiltinFallback);
        assert_eq!(res.media_type.as_deref(), Some("image/jpeg"));
        assert_eq!(res.bytes(), Some(&default_bytes(AssetKind::Thumb)));
        assert_eq!(*source.requested.lock().unwrap(), vec!["settings".to_string()]);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_builtin_error_falls_back() {
        let source = Arc::new(FakeSource { fail_builtins: true, ..Default::default() });
        let resolver = loaded(source, Arc::default()).await;

        let res = resolver.resolve_reference("asset:favicon:beaker://history", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::BuiltinFallback);
        assert_eq!(res.bytes(), Some(&default_bytes(AssetKind::Favicon)));
    }

    #[tokio::test]
    async fn test_underivable_builtin_name_never_loads() {
        let source = Arc::new(FakeSource::default());
        let resolver = loaded(source.clone(), Arc::default()).await;

        let res = resolver.resolve_reference("asset:favicon:beaker://", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::BuiltinFallback);
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_internal_scheme() {
        let mut source = FakeSource::default();
        source.builtins.insert("settings".into(), Bytes::from_static(b"gear"));
        let resolver = Resolver::new(Arc::new(source), Arc::new(FakeStore::default())).with_internal_scheme("app://");

        let res = resolver.resolve_reference("asset:favicon:app://settings", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::Builtin);

        let res = resolver.resolve_reference("asset:favicon:beaker://settings", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::CacheFallback);
    }

    #[tokio::test]
    async fn test_high_density_doubles_size() {
        let resolver = loaded(Arc::default(), Arc::default()).await;

        let res = resolver.resolve_reference("asset:thumb-32:https://x.com", true).await.unwrap();
        assert_eq!(res.size, 64);

        let res = resolver.resolve_reference("asset:favicon:https://x.com", true).await.unwrap();
        assert_eq!(res.size, 32);

        let res = resolver.resolve_reference("asset:favicon:https://x.com", false).await.unwrap();
        assert_eq!(res.size, 16);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let store = Arc::new(FakeStore::with("https://x.com", AssetKind::Cover, "data:image/webp;base64,UklGRg=="));
        let resolver = loaded(Arc::default(), store).await;

        let first = resolver.resolve_reference("asset:cover-64:https://x.com", true).await.unwrap();
        let second = resolver.resolve_reference("asset:cover-64:https://x.com", true).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_reference_surfaces() {
        let resolver = loaded(Arc::default(), Arc::default()).await;
        let result = resolver.resolve_reference("favicon:https://x.com", false).await;
        assert!(matches!(result, Err(Error::MalformedReference(_))));
    }

    #[tokio::test]
    async fn test_with_cache_db_store() {
        let db = crate::CacheDb::open_in_memory().await.unwrap();
        db.put_site_asset("dat://site", AssetKind::Favicon, "data:image/png;base64,aGVsbG8=")
            .await
            .unwrap();
        let defaults = Arc::new(DefaultAssets::new());
        let resolver = Resolver::new(Arc::new(FakeSource::default()), Arc::new(db)).with_defaults(defaults.clone());

        let res = resolver.resolve_reference("asset:cover:dat://site", false).await.unwrap();
        assert_eq!(res.body, AssetBody::NotFound(NotFoundReason::DefaultPending));

        defaults.publish(AssetKind::Cover, None);
        let res = resolver.resolve_reference("asset:cover:dat://site", false).await.unwrap();
        assert_eq!(res.body, AssetBody::NotFound(NotFoundReason::DefaultUnavailable));

        let res = resolver.resolve_reference("asset:favicon:dat://site", false).await.unwrap();
        assert_eq!(res.source, ResolvedFrom::Cache);
        assert_eq!(res.bytes().map(|b| b.as_ref()), Some(&b"hello"[..]));
    }
}
