//! HTTP client for the remote lesson backend.
//!
//! The backend does the real work (lesson storage, slide parsing, PDF and
//! mind-map rendering, profile persistence). Every response is decoded into
//! the typed entities of this crate; a body that does not match is reported
//! as `LessonKitError::Decode` instead of being passed through.

mod client;
mod types;

pub use client::{BackendClient, PendingGeneration};
pub(crate) use types::lenient_string;
pub use types::{artifact_filename, ArtifactKind, GenerationResult, LegacyLessonResult};
