//! MCP tool implementations.
//!
//! This module contains all tools exposed by the siteasset server.

pub mod builtin;
pub mod purge;
pub mod resolve;
pub mod store;

pub use builtin::list_impl;
pub use purge::{AssetPurgeParams, purge_impl};
pub use resolve::{AssetResolveParams, resolve_impl};
pub use store::{AssetStoreParams, store_impl};

/// Text content of the first item in a tool result, for assertions.
#[cfg(test)]
pub(crate) fn first_text(result: &rmcp::model::CallToolResult) -> String {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}
