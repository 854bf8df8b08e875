//! Track identifier newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ResolveError;

/// Opaque upstream track identifier.
///
/// The value is caller-supplied and treated as opaque, but since it is
/// also used as a cache file stem it must not contain path separators
/// or traversal sequences. [`TrackRef::parse`] enforces that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRef(String);

impl TrackRef {
    /// Validate and wrap a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if raw.is_empty() || raw.len() > 128 {
            return Err(ResolveError::InvalidTrack(raw.to_owned()));
        }
        if raw.contains('/') || raw.contains('\\') || raw.contains("..") {
            return Err(ResolveError::InvalidTrack(raw.to_owned()));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Upstream watch-page URL for this track.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://music.youtube.com/watch?v={}", self.0)
    }
}

impl AsRef<str> for TrackRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_id() {
        let track = TrackRef::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(track.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(TrackRef::parse("").is_err());
    }

    #[test]
    fn parse_rejects_path_separators() {
        assert!(TrackRef::parse("a/b").is_err());
        assert!(TrackRef::parse("a\\b").is_err());
    }

    #[test]
    fn parse_rejects_traversal() {
        assert!(TrackRef::parse("..").is_err());
        assert!(TrackRef::parse("a..b").is_err());
    }

    #[test]
    fn parse_rejects_oversized() {
        let long = "x".repeat(129);
        assert!(TrackRef::parse(&long).is_err());
    }

    #[test]
    fn watch_url_embeds_id() {
        let track = TrackRef::parse("abc123").unwrap();
        assert_eq!(
            track.watch_url(),
            "https://music.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn serde_is_transparent() {
        let track = TrackRef::parse("abc123").unwrap();
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn display_is_inner_value() {
        let track = TrackRef::parse("abc123").unwrap();
        assert_eq!(track.to_string(), "abc123");
    }
}
