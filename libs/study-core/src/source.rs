//! Collaborator seams of a study session.

use async_trait::async_trait;

use crate::error::{FetchError, SessionError};
use crate::session::SessionStatus;
use crate::types::{Outcomes, WordItem};

/// Provider of the words of a unit.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch(&self, auth_token: &str, unit_id: i64) -> Result<Vec<WordItem>, FetchError>;
}

/// Consumer of session transitions.
pub trait PresentationAdapter: Send {
    /// Called after every transition with the new state.
    fn on_state(&mut self, status: &SessionStatus);

    /// Called once per completed run, after the `Complete` state.
    ///
    /// Persisting outcomes beyond the session belongs here.
    fn on_complete(&mut self, outcomes: &Outcomes);

    /// Called when a control event does not apply to the current state.
    fn on_rejected(&mut self, error: &SessionError) {
        tracing::warn!(%error, "session event rejected");
    }
}

/// Outcomes from earlier sessions, read once per deck build.
pub trait OutcomeHistory: Send {
    fn prior_outcomes(&mut self) -> Outcomes;
}

impl OutcomeHistory for Outcomes {
    fn prior_outcomes(&mut self) -> Outcomes {
        self.clone()
    }
}
