//! `asset:` reference parsing.
//!
//! Grammar: `asset:<kind>[-<size>]:<locator>`
//!
//! - `asset:favicon:https://example.com`
//! - `asset:thumb-32:https://example.com`
//!
//! The kind token is captured as written. Whether it names a servable kind is
//! decided by the resolver.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::AssetKind;
use crate::Error;

/// Size used when a reference carries no `-<size>` segment.
pub const DEFAULT_SIZE: u32 = 16;

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^asset:([a-z]+)(?:-(\d+))?:(.*)$").unwrap());

/// A parsed asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    kind: String,
    size: u32,
    site_locator: String,
}

impl AssetRequest {
    /// Build a request for a known kind.
    pub fn new(kind: AssetKind, size: u32, site_locator: impl Into<String>) -> Self {
        let size = if size == 0 { DEFAULT_SIZE } else { size };
        Self { kind: kind.as_str().to_string(), size, site_locator: site_locator.into() }
    }

    /// Parse an `asset:` reference.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedReference` when the string does not match the
    /// grammar or the size does not fit in a `u32`.
    pub fn parse(reference: &str) -> Result<Self, Error> {
        let caps = REFERENCE_RE
            .captures(reference)
            .ok_or_else(|| Error::MalformedReference(reference.to_string()))?;

        let size = match caps.get(2) {
            Some(digits) => digits
                .as_str()
                .parse::<u32>()
                .map_err(|_| Error::MalformedReference(reference.to_string()))?,
            None => DEFAULT_SIZE,
        };

        Ok(Self {
            kind: caps[1].to_string(),
            size: if size == 0 { DEFAULT_SIZE } else { size },
            site_locator: caps[3].to_string(),
        })
    }

    /// The kind token exactly as it appeared in the reference.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The kind, if the token names one the resolver can serve.
    pub fn asset_kind(&self) -> Option<AssetKind> {
        AssetKind::from_token(&self.kind)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn site_locator(&self) -> &str {
        &self.site_locator
    }
}

impl FromStr for AssetRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == DEFAULT_SIZE {
            write!(f, "asset:{}:{}", self.kind, self.site_locator)
        } else {
            write!(f, "asset:{}-{}:{}", self.kind, self.size, self.site_locator)
        }
    }
}
