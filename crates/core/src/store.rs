//! Lookup contract between the resolver and the site asset cache.

use async_trait::async_trait;

use crate::{AssetKind, CacheDb, Error};

/// Read side of a site asset store.
///
/// Returns the stored `data:` URL for `(locator, kind)`, if any. The resolver
/// treats `Err` the same as `Ok(None)` after logging it.
#[async_trait]
pub trait SiteAssetStore: Send + Sync {
    async fn get(&self, locator: &str, kind: AssetKind) -> Result<Option<String>, Error>;
}

#[async_trait]
impl SiteAssetStore for CacheDb {
    async fn get(&self, locator: &str, kind: AssetKind) -> Result<Option<String>, Error> {
        Ok(self.get_site_asset(locator, kind).await?.map(|asset| asset.data_url))
    }
}
