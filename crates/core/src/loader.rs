//! Static image assets shipped with the host: built-in favicons for
//! internal pages and the per-kind defaults.
//!
//! Layout under the assets root:
//!
//! ```text
//! <root>/default-favicon.png
//! <root>/default-user-thumb.jpg
//! <root>/default-cover.jpg
//! <root>/favicons/<name>.png
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{AssetKind, Error};

/// Source of built-in and default image bytes.
///
/// A missing asset is `Ok(None)`; `Err` is reserved for failures worth logging.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Load the built-in icon `<name>.png`.
    async fn load_builtin(&self, name: &str) -> Result<Option<Bytes>, Error>;

    /// Load the default image for `kind`.
    async fn load_default(&self, kind: AssetKind) -> Result<Option<Bytes>, Error>;

    /// Names of all built-in icons, sorted.
    async fn list_builtins(&self) -> Result<Vec<String>, Error>;
}

/// Built-in icon names are plain file stems.
pub fn is_valid_builtin_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// [`AssetSource`] reading from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn builtin_dir(&self) -> PathBuf {
        self.root.join("favicons")
    }

    fn default_file_name(kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Favicon => "default-favicon.png",
            AssetKind::Thumb => "default-user-thumb.jpg",
            AssetKind::Cover => "default-cover.jpg",
        }
    }
}

async fn read_optional(path: &Path) -> Result<Option<Bytes>, Error> {
    match tokio::fs::read(path).await {
        Ok(buf) => Ok(Some(Bytes::from(buf))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn load_builtin(&self, name: &str) -> Result<Option<Bytes>, Error> {
        if !is_valid_builtin_name(name) {
            return Ok(None);
        }
        read_optional(&self.builtin_dir().join(format!("{name}.png"))).await
    }

    async fn load_default(&self, kind: AssetKind) -> Result<Option<Bytes>, Error> {
        read_optional(&self.root.join(Self::default_file_name(kind))).await
    }

    async fn list_builtins(&self) -> Result<Vec<String>, Error> {
        let mut dir = match tokio::fs::read_dir(self.builtin_dir()).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && is_valid_builtin_name(stem)
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
