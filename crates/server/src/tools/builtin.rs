//! builtin_list tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use siteasset_core::AssetSource;

use crate::error::ToolError;

/// Output from the builtin_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuiltinListOutput {
    pub names: Vec<String>,
}

/// Implementation of the builtin_list tool.
pub async fn list_impl(source: &dyn AssetSource) -> Result<CallToolResult, McpError> {
    let names = source.list_builtins().await?;
    let json = serde_json::to_string_pretty(&BuiltinListOutput { names }).map_err(ToolError::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
