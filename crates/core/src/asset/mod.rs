//! Asset vocabulary shared by the parser, resolver and store.
//!
//! An asset is one image attached to a site: its favicon, a thumbnail, or a
//! cover image. Resolution always ends in an [`AssetBody`], which is either
//! image bytes or a distinguished "not found" marker.

pub mod data_url;
pub mod request;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use data_url::{DataUrlError, DecodedAsset};
pub use request::{AssetRequest, DEFAULT_SIZE};

/// The categories of image the resolver knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Favicon,
    Thumb,
    Cover,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Favicon, AssetKind::Thumb, AssetKind::Cover];

    /// Map a reference token to a kind. Tokens are case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "favicon" => Some(AssetKind::Favicon),
            "thumb" => Some(AssetKind::Thumb),
            "cover" => Some(AssetKind::Cover),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Favicon => "favicon",
            AssetKind::Thumb => "thumb",
            AssetKind::Cover => "cover",
        }
    }

    /// Media type of the compiled-in default for this kind.
    pub fn default_media_type(&self) -> &'static str {
        match self {
            AssetKind::Favicon => "image/png",
            AssetKind::Thumb | AssetKind::Cover => "image/jpeg",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a resolution produced no image.
///
/// All variants play the same "not found" role for callers; they differ only
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The reference named a kind outside [`AssetKind`].
    UnknownKind,
    /// Startup loading of the default for this kind has not finished.
    DefaultPending,
    /// The default for this kind could not be loaded.
    DefaultUnavailable,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundReason::UnknownKind => "unknown_kind",
            NotFoundReason::DefaultPending => "default_pending",
            NotFoundReason::DefaultUnavailable => "default_unavailable",
        }
    }
}

/// Payload of a resolution.
///
/// `NotFound` is distinct from `Bytes` with a zero-length buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetBody {
    Bytes(Bytes),
    NotFound(NotFoundReason),
}

impl AssetBody {
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            AssetBody::Bytes(b) => Some(b),
            AssetBody::NotFound(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetBody::NotFound(_))
    }
}
