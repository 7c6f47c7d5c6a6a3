//! Site asset rows: one `data:` URL per `(site, kind)`.

use super::connection::CacheDb;
use super::hash::compute_asset_key;
use crate::{AssetKind, Error};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached site asset.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SiteAsset {
    pub key_hash: String,
    pub url: String,
    pub kind: String,
    pub data_url: String,
    pub updated_at: String,
}

impl CacheDb {
    /// Insert or replace the asset of `kind` for `url`.
    ///
    /// The data URL is stored as given; callers validate it first.
    pub async fn put_site_asset(&self, url: &str, kind: AssetKind, data_url: &str) -> Result<SiteAsset, Error> {
        let asset = SiteAsset {
            key_hash: compute_asset_key(url, kind),
            url: url.to_string(),
            kind: kind.as_str().to_string(),
            data_url: data_url.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        };

        let row = asset.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO site_assets (key_hash, url, kind, data_url, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        data_url = excluded.data_url,
                        updated_at = excluded.updated_at",
                    params![row.key_hash, row.url, row.kind, row.data_url, row.updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(asset)
    }

    /// Get the asset of `kind` for `url`.
    ///
    /// Returns None if nothing is cached for the pair.
    pub async fn get_site_asset(&self, url: &str, kind: AssetKind) -> Result<Option<SiteAsset>, Error> {
        let key_hash = compute_asset_key(url, kind);
        self.conn
            .call(move |conn| -> Result<Option<SiteAsset>, Error> {
                let mut stmt =
                    conn.prepare("SELECT key_hash, url, kind, data_url, updated_at FROM site_assets WHERE key_hash = ?1")?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok(SiteAsset {
                        key_hash: row.get(0)?,
                        url: row.get(1)?,
                        kind: row.get(2)?,
                        data_url: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                });

                match result {
                    Ok(asset) => Ok(Some(asset)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every kind cached for `url`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_site_assets(&self, url: &str) -> Result<u64, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM site_assets WHERE url = ?1", params![url])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge least recently written entries until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_lru_site_assets(&self, max_entries: usize) -> Result<u64, Error> {
        let max = i64::try_from(max_entries).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM site_assets", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM site_assets WHERE key_hash IN (
                    SELECT key_hash FROM site_assets ORDER BY updated_at ASC, rowid ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}
