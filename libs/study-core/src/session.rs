//! Study session state machine.
//!
//! ```text
//! Loading --FetchSucceeded--> Ready | Empty
//! Loading --FetchFailed-----> Error
//! Ready   --Swipe-----------> Ready (next card) | Complete (last card)
//! Error   --Retry-----------> Loading (fetch again)
//! Complete|Empty --Restart--> Loading (rebuild from cached words)
//! ```
//!
//! `ChangeSettings` is accepted everywhere: it stores the settings and, once
//! words are available, rebuilds the deck.

use crate::deck::{build_deck, Deck};
use crate::error::SessionError;
use crate::recorder::OutcomeRecorder;
use crate::types::{Outcome, Outcomes, StudySettings, WordItem};

/// Position within a non-empty deck plus the outcomes of this run.
///
/// `current_index` always points into the deck; the swipe on the last card
/// leaves `Ready` instead of advancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    deck: Deck,
    current_index: usize,
    outcomes: OutcomeRecorder,
}

impl SessionState {
    fn new(deck: Deck) -> Self {
        Self {
            deck,
            current_index: 0,
            outcomes: OutcomeRecorder::new(),
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_card(&self) -> &WordItem {
        &self.deck[self.current_index]
    }

    pub fn outcomes(&self) -> &OutcomeRecorder {
        &self.outcomes
    }

    /// Number of cards not yet swiped, including the current one.
    pub fn remaining(&self) -> usize {
        self.deck.len() - self.current_index
    }

    /// Fraction of the deck already swiped, in `0.0..1.0`.
    pub fn progress(&self) -> f32 {
        self.current_index as f32 / self.deck.len() as f32
    }
}

/// Observable state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready(SessionState),
    Complete(Outcomes),
    Empty,
    Error(String),
}

impl SessionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Complete(_) => "complete",
            Self::Empty => "empty",
            Self::Error(_) => "error",
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FetchSucceeded(Vec<WordItem>),
    FetchFailed(String),
    Swipe(Outcome),
    Retry,
    Restart,
    /// Build a new deck from the cached words.
    Rebuild,
    ChangeSettings(StudySettings),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchSucceeded(_) => "fetch_succeeded",
            Self::FetchFailed(_) => "fetch_failed",
            Self::Swipe(_) => "swipe",
            Self::Retry => "retry",
            Self::Restart => "restart",
            Self::Rebuild => "rebuild",
            Self::ChangeSettings(_) => "change_settings",
        }
    }
}

/// Follow-up work the driver of the state machine must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Issue the word fetch, with unchanged arguments.
    Fetch,
    /// Apply [`SessionEvent::Rebuild`] after refreshing prior outcomes.
    Rebuild,
    /// The run finished; hand these outcomes to the completion callback.
    Completed(Outcomes),
}

/// Session state machine for one unit.
#[derive(Debug, Clone)]
pub struct StudySession {
    status: SessionStatus,
    settings: StudySettings,
    prior: Outcomes,
    words: Option<Vec<WordItem>>,
}

impl StudySession {
    pub fn new(settings: StudySettings) -> Self {
        Self {
            status: SessionStatus::Loading,
            settings,
            prior: Outcomes::new(),
            words: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn settings(&self) -> StudySettings {
        self.settings
    }

    /// Outcomes from earlier sessions, used by the display filter.
    pub fn set_prior_outcomes(&mut self, prior: Outcomes) {
        self.prior = prior;
    }

    /// Apply an event. Refused events leave the state untouched.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Effect, SessionError> {
        let status = std::mem::replace(&mut self.status, SessionStatus::Loading);

        match (status, event) {
            (SessionStatus::Loading, SessionEvent::FetchSucceeded(words)) => {
                self.words = Some(words);
                self.build();
                Ok(Effect::None)
            }
            (SessionStatus::Loading, SessionEvent::FetchFailed(reason)) => {
                self.status = SessionStatus::Error(reason);
                Ok(Effect::None)
            }
            (SessionStatus::Loading, SessionEvent::Rebuild) if self.words.is_some() => {
                self.build();
                Ok(Effect::None)
            }
            (SessionStatus::Ready(state), SessionEvent::Swipe(outcome)) => {
                Ok(self.swipe(state, outcome))
            }
            (SessionStatus::Error(_), SessionEvent::Retry) => Ok(Effect::Fetch),
            (SessionStatus::Complete(_) | SessionStatus::Empty, SessionEvent::Restart) => {
                Ok(self.reload_effect())
            }
            (status, SessionEvent::ChangeSettings(settings)) => {
                self.settings = settings;
                match status {
                    SessionStatus::Ready(_) | SessionStatus::Complete(_) | SessionStatus::Empty => {
                        Ok(self.reload_effect())
                    }
                    other => {
                        self.status = other;
                        Ok(Effect::None)
                    }
                }
            }
            (status, event) => {
                let err = SessionError::InvalidTransition {
                    state: status.name(),
                    event: event.name(),
                };
                self.status = status;
                Err(err)
            }
        }
    }

    fn swipe(&mut self, mut state: SessionState, outcome: Outcome) -> Effect {
        let word_id = state.current_card().id;
        state.outcomes.record(word_id, outcome);

        if state.current_index + 1 < state.deck.len() {
            state.current_index += 1;
            self.status = SessionStatus::Ready(state);
            Effect::None
        } else {
            let outcomes = state.outcomes.into_outcomes();
            self.status = SessionStatus::Complete(outcomes.clone());
            Effect::Completed(outcomes)
        }
    }

    /// Status is already `Loading`; decide how to leave it.
    fn reload_effect(&self) -> Effect {
        if self.words.is_some() {
            Effect::Rebuild
        } else {
            Effect::Fetch
        }
    }

    fn build(&mut self) {
        let words = self.words.as_deref().unwrap_or(&[]);
        let deck = build_deck(words, self.settings.filter, self.settings.order, &self.prior);
        self.status = if deck.is_empty() {
            SessionStatus::Empty
        } else {
            SessionStatus::Ready(SessionState::new(deck))
        };
    }
}
