//! Domain models for StudyHub.
//!
//! # Core Concepts
//!
//! ## Durable Entities
//!
//! - [`User`]: An account identified by a unique username. Owns notes.
//! - [`Note`]: A study note with title, content, and tags. Always scoped to
//!   its owning user; a note is never visible outside its owner.
//!
//! ## Session-bound Entities
//!
//! These live in memory for the duration of a login session and are
//! discarded at logout:
//!
//! - [`ChatMessage`]: One entry in the append-only chat transcript.
//! - Timer state, held by the timer engine rather than a model struct
//!   (see [`crate::timer`]).

mod chat;
mod note;
mod user;

pub use chat::*;
pub use note::*;
pub use user::*;
