//! Interactive study loop: keyboard input to session controls.

use std::sync::{Arc, Mutex};

use study_core::runtime::SessionHandle;
use study_core::types::{DisplayFilter, Order, Outcome, StudySettings};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::warn;

use crate::adapter::SessionView;
use crate::db::{SettingsRepository, SqliteRepository};

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Swipe(Outcome),
    ShowTranslation,
    Retry,
    StudyAgain,
    Filter(DisplayFilter),
    Order(Order),
    Quit,
}

/// Parse a line of input. Unknown input yields `None`.
pub fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let arg = parts.next();

    match (command, arg) {
        ("y", None) => Some(Input::Swipe(Outcome::Remembered)),
        ("n", None) => Some(Input::Swipe(Outcome::NotRemembered)),
        ("t", None) => Some(Input::ShowTranslation),
        ("r", None) => Some(Input::Retry),
        ("a", None) => Some(Input::StudyAgain),
        ("q", None) => Some(Input::Quit),
        ("f", Some(value)) => DisplayFilter::from_str(value).map(Input::Filter),
        ("o", Some(value)) => Order::from_str(value).map(Input::Order),
        _ => None,
    }
}

/// Feed user input into a running session until quit or end of input.
///
/// Input is read only once the session has settled: after the first fetch,
/// and again after each command has been applied or refused. Filter and
/// order changes are saved and applied to the running session.
pub async fn run_input_loop<R, W>(
    handle: SessionHandle,
    input: R,
    mut out: W,
    mut view: watch::Receiver<SessionView>,
    repository: Arc<Mutex<SqliteRepository>>,
    mut settings: StudySettings,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut open = settle(&mut view, 0).await;

    while open {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(input) = parse_input(&line) else {
            out.write_all(b"Unknown command\n").await?;
            out.flush().await?;
            continue;
        };

        let seen = view.borrow_and_update().revision;
        let sent = match input {
            Input::Quit => break,
            Input::ShowTranslation => {
                let card = view.borrow().card.clone();
                let message = match card {
                    Some(card) => format!("  -> {}\n", card.translation),
                    None => "No card shown\n".to_string(),
                };
                out.write_all(message.as_bytes()).await?;
                out.flush().await?;
                continue;
            }
            Input::Swipe(outcome) => handle.swipe(outcome),
            Input::Retry => handle.retry(),
            Input::StudyAgain => handle.restart(),
            Input::Filter(filter) => {
                settings.filter = filter;
                save_settings(&repository, &settings);
                handle.change_settings(settings)
            }
            Input::Order(order) => {
                settings.order = order;
                save_settings(&repository, &settings);
                handle.change_settings(settings)
            }
        };

        if sent.is_err() {
            break;
        }
        open = settle(&mut view, seen).await;
    }

    if handle.dismiss().is_err() {
        warn!("session already closed before quit");
    }
    handle.join().await;

    let runs = view.borrow().completed_runs;
    out.write_all(format!("Completed {runs} run(s).\n").as_bytes()).await?;
    out.flush().await
}

/// Wait until the view moved past `seen` and is no longer loading.
/// Returns `false` once the session has shut down.
async fn settle(view: &mut watch::Receiver<SessionView>, seen: u64) -> bool {
    view.wait_for(|v| v.revision > seen && v.state != "loading").await.is_ok()
}

fn save_settings(repository: &Arc<Mutex<SqliteRepository>>, settings: &StudySettings) {
    let repo = repository.lock().expect("repository lock");
    if let Err(e) = repo.save_study_settings(settings) {
        warn!(error = %e, "failed to save study settings");
    }
}
