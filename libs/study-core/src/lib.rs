//! Core study-session library for vocabulary flashcards.
//!
//! Provides:
//! - Deck building (display filter and card order)
//! - Per-session swipe outcome recording
//! - The session state machine (loading, ready, complete, empty, error)
//! - An async runner that drives a session from a word source
//! - Shared types (WordItem, Outcome, StudySettings, etc.)

pub mod deck;
pub mod error;
pub mod recorder;
pub mod runtime;
pub mod session;
pub mod source;
pub mod types;

pub use deck::{build_deck, build_deck_with_rng, Deck};
pub use error::{FetchError, SessionError};
pub use recorder::OutcomeRecorder;
pub use runtime::{spawn_session, SessionConfig, SessionHandle};
pub use session::{Effect, SessionEvent, SessionState, SessionStatus, StudySession};
pub use source::{OutcomeHistory, PresentationAdapter, WordSource};
pub use types::{
    DisplayFilter, Order, Outcome, Outcomes, StudySettings, Unit, WordId, WordItem,
};
