//! asset_purge tool implementation.
//!
//! Purges site asset cache entries by site or by count.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use siteasset_core::CacheDb;

use crate::error::ToolError;

/// Parameters for the asset_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetPurgeParams {
    /// Remove every cached kind for this site locator.
    pub site: Option<String>,

    /// Keep only the newest N entries.
    pub max_entries: Option<usize>,
}

/// Output from the asset_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetPurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the asset_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: AssetPurgeParams) -> Result<CallToolResult, McpError> {
    if params.site.is_none() && params.max_entries.is_none() {
        return Err(ToolError::InvalidInput("At least one of site or max_entries must be specified".into()).into());
    }

    let mut deleted_total = 0u64;

    if let Some(site) = params.site {
        deleted_total += cache.purge_site_assets(&site).await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += cache.purge_lru_site_assets(max_entries).await?;
    }

    tracing::info!(deleted = deleted_total, "purged site assets");

    let output = AssetPurgeOutput { deleted: deleted_total };
    let json = serde_json::to_string_pretty(&output).map_err(ToolError::from)?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::first_text;
    use siteasset_core::AssetKind;

    const PNG: &str = "data:image/png;base64,aGVsbG8=";

    async fn seeded() -> CacheDb {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache.put_site_asset("https://example.com", AssetKind::Favicon, PNG).await.unwrap();
        cache.put_site_asset("https://example.com", AssetKind::Cover, PNG).await.unwrap();
        cache.put_site_asset("https://other.com", AssetKind::Favicon, PNG).await.unwrap();
        cache
    }

    #[tokio::test]
    async fn test_purge_by_site() {
        let cache = seeded().await;
        let params = AssetPurgeParams { site: Some("https://example.com".into()), max_entries: None };

        let result = purge_impl(&cache, params).await.unwrap();
        let output: AssetPurgeOutput = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(output.deleted, 2);
    }

    #[tokio::test]
    async fn test_purge_lru() {
        let cache = seeded().await;
        let params = AssetPurgeParams { site: None, max_entries: Some(1) };

        let result = purge_impl(&cache, params).await.unwrap();
        let output: AssetPurgeOutput = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(output.deleted, 2);
        assert!(cache.get_site_asset("https://other.com", AssetKind::Favicon).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_u64_max_entries_deletes_nothing() {
        let cache = seeded().await;
        let params: AssetPurgeParams = serde_json::from_str(r#"{"max_entries": 18446744073709551615}"#).unwrap();

        let result = purge_impl(&cache, params).await.unwrap();
        let output: AssetPurgeOutput = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(output.deleted, 0);
        assert!(cache.get_site_asset("https://example.com", AssetKind::Favicon).await.unwrap().is_some());
        assert!(cache.get_site_asset("https://other.com", AssetKind::Favicon).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_no_params() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let params = AssetPurgeParams { site: None, max_entries: None };

        let result = purge_impl(&cache, params).await;
        assert!(result.is_err());
    }
}
