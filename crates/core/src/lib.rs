//! Conversation-matching and pronunciation-scoring core for Japanese
//! speaking practice.
//!
//! Two halves:
//! - [`matching`]: fuzzy similarity between utterances and a catalog of
//!   cached conversational responses.
//! - [`pronunciation`]: rule-based mora diagnostics and rhythm/timing
//!   analysis against native reference recordings.
//!
//! Everything here is synchronous and pure over its inputs; the only
//! mutable object is the caller-owned [`matching::catalog::ResponseCache`].

pub mod error;
pub mod matching;
pub mod pronunciation;
pub mod types;

pub use error::{KaiwaError, Result};
pub use types::{AudioFeatures, Mora};
