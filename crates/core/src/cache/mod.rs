//! SQLite-backed cache of per-site image assets.
//!
//! Each row holds one `data:` URL for a `(site, kind)` pair. Rows are keyed
//! by a SHA-256 content address over that pair. Access is async via
//! tokio-rusqlite, and the database runs in WAL mode so the resolver can read
//! while maintenance tools write.

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod site_assets;

pub use crate::Error;

pub use connection::CacheDb;
pub use site_assets::SiteAsset;
