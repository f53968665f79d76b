//! Rule-based study assistant.
//!
//! No NLP and no network: an ordered table of keyword rules is evaluated
//! top to bottom against the lowercased input, and the first match wins.
//! A rule produces a canned reply and optionally one [`Command`] for the
//! session coordinator to execute (timer control or note creation).

mod responder;

pub use responder::*;
