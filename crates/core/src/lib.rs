//! Core types and shared functionality for siteasset.
//!
//! This crate provides:
//! - `asset:` reference parsing and `data:` URL decoding
//! - The layered asset resolver (built-ins, site asset cache, defaults)
//! - Site asset cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod asset;
pub mod cache;
pub mod config;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod store;

pub use asset::{AssetBody, AssetKind, AssetRequest, NotFoundReason};
pub use cache::{CacheDb, SiteAsset};
pub use config::AppConfig;
pub use defaults::DefaultAssets;
pub use error::Error;
pub use loader::{AssetSource, FsAssetSource};
pub use resolver::{Resolution, ResolvedFrom, Resolver};
pub use store::SiteAssetStore;
