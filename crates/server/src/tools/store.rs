//! asset_store tool implementation.
//!
//! Validates a `data:` URL, or wraps raw base64 bytes in one, and writes it
//! to the site asset cache.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use siteasset_core::asset::data_url;
use siteasset_core::{AssetKind, CacheDb, Error};

use crate::error::ToolError;

/// Parameters for the asset_store tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetStoreParams {
    /// Site locator the asset belongs to.
    pub site: String,

    /// One of `favicon`, `thumb`, `cover`.
    pub kind: String,

    /// Image as `data:<media-type>;base64,<payload>`.
    #[serde(default)]
    pub data_url: Option<String>,

    /// Raw image bytes in standard base64. Used instead of `data_url`.
    #[serde(default)]
    pub bytes_base64: Option<String>,

    /// Media type for `bytes_base64`. Defaults to the kind's default media type.
    #[serde(default)]
    pub media_type: Option<String>,
}

/// Output from the asset_store tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetStoreOutput {
    pub key_hash: String,
    pub media_type: String,
    pub byte_len: usize,
    pub updated_at: String,
}

/// Implementation of the asset_store tool.
pub async fn store_impl(cache: &CacheDb, params: AssetStoreParams) -> Result<CallToolResult, McpError> {
    if params.site.trim().is_empty() {
        return Err(ToolError::InvalidInput("site must not be empty".into()).into());
    }

    let kind = AssetKind::from_token(&params.kind)
        .ok_or_else(|| ToolError::InvalidInput(format!("unsupported asset kind: {}", params.kind)))?;

    let encoded = match (params.data_url, params.bytes_base64) {
        (Some(url), None) => url,
        (None, Some(raw)) => {
            let bytes = STANDARD
                .decode(raw.trim())
                .map_err(|e| ToolError::InvalidInput(format!("invalid base64 bytes: {e}")))?;
            let media_type = params.media_type.as_deref().unwrap_or(kind.default_media_type());
            data_url::encode(media_type, &bytes)
        }
        _ => return Err(ToolError::InvalidInput("exactly one of data_url or bytes_base64 is required".into()).into()),
    };

    let decoded = data_url::decode(&encoded).map_err(Error::from)?;
    let stored = cache.put_site_asset(&params.site, kind, &encoded).await?;
    tracing::info!(site = %params.site, %kind, len = decoded.bytes.len(), "stored site asset");

    let output = AssetStoreOutput {
        key_hash: stored.key_hash,
        media_type: decoded.media_type,
        byte_len: decoded.bytes.len(),
        updated_at: stored.updated_at,
    };
    let json = serde_json::to_string_pretty(&output).map_err(ToolError::from)?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
