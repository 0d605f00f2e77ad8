//! Async session runner.
//!
//! One task owns the [`StudySession`] and applies commands strictly in
//! arrival order. Fetches run on their own tasks and report back through
//! the same channel, tagged with a generation so stale results are dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{FetchError, SessionError};
use crate::session::{Effect, SessionEvent, StudySession};
use crate::source::{OutcomeHistory, PresentationAdapter, WordSource};
use crate::types::{Outcome, StudySettings, WordItem};

/// Parameters of one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub auth_token: String,
    pub unit_id: i64,
    pub settings: StudySettings,
    /// Upper bound on a single fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

enum Command {
    Swipe(Outcome),
    Retry,
    Restart,
    ChangeSettings(StudySettings),
    Dismiss,
    FetchResolved {
        generation: u64,
        result: Result<Vec<WordItem>, FetchError>,
    },
}

/// Control surface of a running session.
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn swipe(&self, outcome: Outcome) -> Result<(), SessionError> {
        self.send(Command::Swipe(outcome))
    }

    pub fn retry(&self) -> Result<(), SessionError> {
        self.send(Command::Retry)
    }

    /// Study the unit again with the current settings.
    pub fn restart(&self) -> Result<(), SessionError> {
        self.send(Command::Restart)
    }

    pub fn change_settings(&self, settings: StudySettings) -> Result<(), SessionError> {
        self.send(Command::ChangeSettings(settings))
    }

    /// Tear the session down. Later fetch results are ignored.
    pub fn dismiss(&self) -> Result<(), SessionError> {
        self.send(Command::Dismiss)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Wait for the runner to exit.
    pub async fn join(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!(error = %e, "session runner panicked");
        }
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.tx.send(command).map_err(|_| SessionError::Disposed)
    }
}

/// Start a session on the current tokio runtime and issue the first fetch.
pub fn spawn_session<S, A, H>(
    config: SessionConfig,
    source: Arc<S>,
    adapter: A,
    history: H,
) -> SessionHandle
where
    S: WordSource + ?Sized + 'static,
    A: PresentationAdapter + 'static,
    H: OutcomeHistory + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let runner = SessionRunner {
        session: StudySession::new(config.settings),
        config,
        source,
        adapter,
        history,
        tx: tx.downgrade(),
        generation: 0,
        fetch: None,
    };
    let task = tokio::spawn(runner.run(rx));
    SessionHandle { tx, task }
}

struct SessionRunner<S: ?Sized, A, H> {
    config: SessionConfig,
    session: StudySession,
    source: Arc<S>,
    adapter: A,
    history: H,
    tx: mpsc::WeakUnboundedSender<Command>,
    generation: u64,
    fetch: Option<JoinHandle<()>>,
}

impl<S, A, H> SessionRunner<S, A, H>
where
    S: WordSource + ?Sized + 'static,
    A: PresentationAdapter,
    H: OutcomeHistory,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        info!(unit_id = self.config.unit_id, "session started");
        self.adapter.on_state(self.session.status());
        self.start_fetch();

        while let Some(command) = rx.recv().await {
            let event = match command {
                Command::Dismiss => break,
                Command::FetchResolved { generation, result } => {
                    if generation != self.generation {
                        debug!(
                            generation,
                            current = self.generation,
                            "dropping stale fetch result"
                        );
                        continue;
                    }
                    match result {
                        Ok(words) => {
                            debug!(count = words.len(), "words fetched");
                            self.refresh_prior();
                            SessionEvent::FetchSucceeded(words)
                        }
                        Err(e) => {
                            warn!(error = %e, unit_id = self.config.unit_id, "fetch failed");
                            SessionEvent::FetchFailed(e.to_string())
                        }
                    }
                }
                Command::Swipe(outcome) => SessionEvent::Swipe(outcome),
                Command::Retry => SessionEvent::Retry,
                Command::Restart => SessionEvent::Restart,
                Command::ChangeSettings(settings) => SessionEvent::ChangeSettings(settings),
            };
            self.dispatch(event);
        }

        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        info!(unit_id = self.config.unit_id, "session dismissed");
    }

    fn dispatch(&mut self, event: SessionEvent) {
        let event_name = event.name();
        match self.session.apply(event) {
            Ok(effect) => {
                info!(
                    event = event_name,
                    state = self.session.status().name(),
                    "session transition"
                );
                self.adapter.on_state(self.session.status());
                self.handle_effect(effect);
            }
            Err(e) => {
                warn!(error = %e, "session event rejected");
                self.adapter.on_rejected(&e);
            }
        }
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Fetch => self.start_fetch(),
            Effect::Rebuild => {
                self.refresh_prior();
                self.dispatch(SessionEvent::Rebuild);
            }
            Effect::Completed(outcomes) => self.adapter.on_complete(&outcomes),
        }
    }

    fn refresh_prior(&mut self) {
        let prior = self.history.prior_outcomes();
        self.session.set_prior_outcomes(prior);
    }

    fn start_fetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let auth_token = self.config.auth_token.clone();
        let unit_id = self.config.unit_id;
        let limit = self.config.fetch_timeout;

        debug!(generation, unit_id, "fetching words");
        let task = tokio::spawn(async move {
            let result = match limit {
                Some(limit) => {
                    match tokio::time::timeout(limit, source.fetch(&auth_token, unit_id)).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout(limit)),
                    }
                }
                None => source.fetch(&auth_token, unit_id).await,
            };

            // The runner is gone once dismissed; the result is dropped.
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::FetchResolved { generation, result });
            }
        });
        if let Some(previous) = self.fetch.replace(task) {
            previous.abort();
        }
    }
}
