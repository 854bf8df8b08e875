//! # lyra-resolver
//!
//! Upstream media extraction for the lyra backend.
//!
//! Turns an opaque [`TrackRef`] into a playable, time-limited media URL
//! by shelling out to the extractor binary (yt-dlp) and applying an
//! audio-format selection policy over its JSON info dump. Also exposes
//! catalog search and audio download on top of the same binary.
//!
//! Resolved URLs embed short-lived authorization and are never cached —
//! every streaming request re-resolves.
//!
//! ## Crate position
//!
//! Standalone (no lyra crate dependencies).
//! Depended on by: lyra-transcription, lyra-server.

#![deny(unsafe_code)]

pub mod errors;
pub mod extractor;
pub mod formats;
pub mod track;

pub use errors::ResolveError;
pub use extractor::{Extractor, SearchEntry};
pub use formats::{InfoDump, ResolvedStream};
pub use track::TrackRef;
