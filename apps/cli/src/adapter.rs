//! Terminal presentation of a study session.

use std::io::Write;
use std::sync::{Arc, Mutex};

use study_core::error::SessionError;
use study_core::session::SessionStatus;
use study_core::source::{OutcomeHistory, PresentationAdapter};
use study_core::types::{Outcome, Outcomes, WordItem};
use tokio::sync::watch;
use tracing::warn;

use crate::db::{OutcomeRepository, SqliteRepository};

/// Snapshot of what the terminal currently shows, shared with the input loop.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub state: &'static str,
    pub card: Option<WordItem>,
    pub completed_runs: usize,
    /// Bumped on every transition and every refused event.
    pub revision: u64,
}

/// Renders session states as text and persists completed runs.
pub struct TerminalAdapter<W> {
    out: W,
    repository: Arc<Mutex<SqliteRepository>>,
    view: watch::Sender<SessionView>,
}

impl<W: Write + Send> TerminalAdapter<W> {
    pub fn new(out: W, repository: Arc<Mutex<SqliteRepository>>) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            out,
            repository,
            view,
        }
    }

    /// Subscribe to the current card and state.
    pub fn view(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    fn render(&mut self, status: &SessionStatus) -> std::io::Result<()> {
        match status {
            SessionStatus::Loading => writeln!(self.out, "Loading words..."),
            SessionStatus::Ready(state) => {
                let card = state.current_card();
                writeln!(
                    self.out,
                    "\n[{}/{}] {:>3.0}%  {} left",
                    state.current_index() + 1,
                    state.deck().len(),
                    state.progress() * 100.0,
                    state.remaining()
                )?;
                if !card.reading.is_empty() {
                    writeln!(self.out, "  {}", card.reading)?;
                }
                writeln!(self.out, "  {}", card.text)?;
                writeln!(
                    self.out,
                    "(y) remembered  (n) not yet  (t) translation  (q) quit"
                )
            }
            SessionStatus::Complete(outcomes) => {
                let remembered = outcomes
                    .values()
                    .filter(|o| **o == Outcome::Remembered)
                    .count();
                writeln!(
                    self.out,
                    "\nFinished! remembered {}, not yet {}.",
                    remembered,
                    outcomes.len() - remembered
                )?;
                writeln!(self.out, "(a) study again  (q) quit")
            }
            SessionStatus::Empty => {
                writeln!(self.out, "No cards match the current filter.")?;
                writeln!(
                    self.out,
                    "(f all|remembered|not_remembered) change filter  (q) quit"
                )
            }
            SessionStatus::Error(reason) => {
                writeln!(self.out, "Could not load words: {reason}")?;
                writeln!(self.out, "(r) retry  (q) quit")
            }
        }
    }
}

impl<W: Write + Send> PresentationAdapter for TerminalAdapter<W> {
    fn on_state(&mut self, status: &SessionStatus) {
        if let Err(e) = self.render(status) {
            warn!(error = %e, "failed to write to terminal");
        }
        self.view.send_modify(|view| {
            view.state = status.name();
            view.card = match status {
                SessionStatus::Ready(state) => Some(state.current_card().clone()),
                _ => None,
            };
            view.revision += 1;
        });
    }

    fn on_complete(&mut self, outcomes: &Outcomes) {
        let saved = {
            let repo = self.repository.lock().expect("repository lock");
            repo.save_outcomes(outcomes)
        };
        match saved {
            Ok(count) => tracing::info!(count, "session outcomes saved"),
            Err(e) => {
                warn!(error = %e, "failed to save session outcomes");
                let _ = writeln!(self.out, "Warning: results were not saved ({e})");
            }
        }
        self.view.send_modify(|view| view.completed_runs += 1);
    }

    fn on_rejected(&mut self, error: &SessionError) {
        let _ = writeln!(self.out, "Not available right now: {error}");
        self.view.send_modify(|view| view.revision += 1);
    }
}

/// Prior outcomes read from the local database.
pub struct RepositoryHistory {
    repository: Arc<Mutex<SqliteRepository>>,
}

impl RepositoryHistory {
    pub fn new(repository: Arc<Mutex<SqliteRepository>>) -> Self {
        Self { repository }
    }
}

impl OutcomeHistory for RepositoryHistory {
    fn prior_outcomes(&mut self) -> Outcomes {
        let repo = self.repository.lock().expect("repository lock");
        match repo.get_outcomes() {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!(error = %e, "failed to read outcome history, filtering without it");
                Outcomes::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::session::{SessionEvent, StudySession};
    use study_core::types::StudySettings;

    fn repo() -> Arc<Mutex<SqliteRepository>> {
        Arc::new(Mutex::new(SqliteRepository::open_in_memory().unwrap()))
    }

    fn word(id: i64) -> WordItem {
        WordItem {
            id,
            text: "看護師".to_string(),
            reading: "かんごし".to_string(),
            translation: "y tá".to_string(),
        }
    }

    fn ready_status() -> SessionStatus {
        let mut session = StudySession::new(StudySettings::default());
        session
            .apply(SessionEvent::FetchSucceeded(vec![word(1), word(2)]))
            .unwrap();
        session.status().clone()
    }

    #[test]
    fn ready_shows_card_without_translation() {
        let mut adapter = TerminalAdapter::new(Vec::new(), repo());
        adapter.on_state(&ready_status());

        let text = String::from_utf8(adapter.out.clone()).unwrap();
        assert!(text.contains("[1/2]"));
        assert!(text.contains("かんごし"));
        assert!(text.contains("看護師"));
        assert!(!text.contains("y tá"));

        let view = adapter.view();
        let view = view.borrow();
        assert_eq!(view.state, "ready");
        assert_eq!(view.card.as_ref().map(|c| c.id), Some(1));
        assert_eq!(view.revision, 1);
    }

    #[test]
    fn error_offers_retry() {
        let mut adapter = TerminalAdapter::new(Vec::new(), repo());
        adapter.on_state(&SessionStatus::Error("Network error: offline".to_string()));
        let text = String::from_utf8(adapter.out.clone()).unwrap();
        assert!(text.contains("Network error: offline"));
        assert!(text.contains("(r) retry"));
        assert!(adapter.view().borrow().card.is_none());
    }

    #[test]
    fn completion_persists_outcomes_once() {
        let repository = repo();
        let mut adapter = TerminalAdapter::new(Vec::new(), Arc::clone(&repository));
        let outcomes = Outcomes::from([(1, Outcome::Remembered), (2, Outcome::NotRemembered)]);

        adapter.on_state(&SessionStatus::Complete(outcomes.clone()));
        adapter.on_complete(&outcomes);

        let text = String::from_utf8(adapter.out.clone()).unwrap();
        assert!(text.contains("remembered 1, not yet 1"));
        assert_eq!(repository.lock().unwrap().get_outcomes().unwrap(), outcomes);
        assert_eq!(adapter.view().borrow().completed_runs, 1);
    }

    #[test]
    fn refused_event_bumps_revision_only() {
        let mut adapter = TerminalAdapter::new(Vec::new(), repo());
        let view = adapter.view();
        adapter.on_state(&SessionStatus::Empty);
        adapter.on_rejected(&SessionError::InvalidTransition {
            state: "empty",
            event: "swipe",
        });

        let text = String::from_utf8(adapter.out.clone()).unwrap();
        assert!(text.contains("Not available right now: cannot apply swipe while empty"));
        let view = view.borrow();
        assert_eq!(view.state, "empty");
        assert_eq!(view.revision, 2);
    }

    #[test]
    fn history_reads_repository() {
        let repository = repo();
        repository
            .lock()
            .unwrap()
            .save_outcomes(&Outcomes::from([(4, Outcome::Remembered)]))
            .unwrap();
        let mut history = RepositoryHistory::new(repository);
        assert_eq!(
            history.prior_outcomes(),
            Outcomes::from([(4, Outcome::Remembered)])
        );
    }
}
