//! asset_resolve tool implementation.
//!
//! Resolves an `asset:` reference to image bytes, falling back through
//! built-ins, the site asset cache and the per-kind defaults.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use siteasset_core::{AssetBody, Resolution, Resolver};

use crate::error::ToolError;

/// Parameters for the asset_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetResolveParams {
    /// Reference of the form `asset:<kind>[-<size>]:<locator>`.
    pub reference: String,

    /// Request high-density variants. Defaults to the configured display.
    #[serde(default)]
    pub high_density: Option<bool>,
}

/// Summary returned alongside the image content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetResolveOutput {
    pub found: bool,
    pub media_type: Option<String>,
    pub size: u32,
    pub source: String,
    pub byte_len: usize,
    pub not_found_reason: Option<String>,
}

impl From<&Resolution> for AssetResolveOutput {
    fn from(res: &Resolution) -> Self {
        let not_found_reason = match &res.body {
            AssetBody::NotFound(reason) => Some(reason.as_str().to_string()),
            AssetBody::Bytes(_) => None,
        };
        Self {
            found: res.is_found(),
            media_type: res.media_type.clone(),
            size: res.size,
            source: res.source.as_str().to_string(),
            byte_len: res.bytes().map_or(0, |b| b.len()),
            not_found_reason,
        }
    }
}

/// Implementation of the asset_resolve tool.
pub async fn resolve_impl(
    resolver: &Resolver, default_high_density: bool, params: AssetResolveParams,
) -> Result<CallToolResult, McpError> {
    let high_density = params.high_density.unwrap_or(default_high_density);
    let resolution = resolver.resolve_reference(&params.reference, high_density).await?;

    let output = AssetResolveOutput::from(&resolution);
    let json = serde_json::to_string_pretty(&output).map_err(ToolError::from)?;

    let mut content = vec![Content::text(json)];
    if let (Some(bytes), Some(media_type)) = (resolution.bytes(), resolution.media_type.as_deref()) {
        content.push(Content::image(STANDARD.encode(bytes), media_type));
    }

    Ok(CallToolResult::success(content))
}
