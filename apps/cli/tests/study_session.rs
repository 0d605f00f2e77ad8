//! End-to-end study session tests: fake word source, terminal adapter and
//! an in-memory database.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use study_core::error::FetchError;
use study_core::runtime::{spawn_session, SessionConfig};
use study_core::types::{DisplayFilter, Order, Outcome, Outcomes, StudySettings};
use vocab_cards_cli::adapter::{RepositoryHistory, TerminalAdapter};
use vocab_cards_cli::db::OutcomeRepository;

use common::{repository, showing, unit_words, wait_for, FakeSource, SharedBuf};

fn session_config(settings: StudySettings) -> SessionConfig {
    SessionConfig {
        auth_token: "secret".to_string(),
        unit_id: 2,
        settings,
        fetch_timeout: None,
    }
}

/// A full pass saves outcomes once; switching to the not-remembered filter
/// then rebuilds the deck from them.
#[tokio::test]
async fn completed_session_feeds_next_deck() {
    let repo = repository();
    let out = SharedBuf::default();
    let adapter = TerminalAdapter::new(out.clone(), Arc::clone(&repo));
    let view = adapter.view();
    let source = FakeSource::new(vec![Ok(unit_words())]);

    let handle = spawn_session(
        session_config(StudySettings::default()),
        source.clone(),
        adapter,
        RepositoryHistory::new(Arc::clone(&repo)),
    );

    wait_for(&view, showing(1)).await;
    handle.swipe(Outcome::Remembered).unwrap();
    wait_for(&view, showing(2)).await;
    handle.swipe(Outcome::NotRemembered).unwrap();
    wait_for(&view, showing(3)).await;
    handle.swipe(Outcome::Remembered).unwrap();
    wait_for(&view, |v| v.completed_runs == 1).await;

    assert_eq!(
        repo.lock().unwrap().get_outcomes().unwrap(),
        Outcomes::from([
            (1, Outcome::Remembered),
            (2, Outcome::NotRemembered),
            (3, Outcome::Remembered),
        ])
    );
    assert!(out.text().contains("remembered 2, not yet 1"));

    handle
        .change_settings(StudySettings {
            filter: DisplayFilter::NotRemembered,
            order: Order::Sequential,
        })
        .unwrap();
    wait_for(&view, showing(2)).await;
    assert!(out.text().contains("[1/1]"));

    handle.dismiss().unwrap();
    handle.join().await;

    assert_eq!(source.calls.lock().unwrap().len(), 1);
    assert_eq!(view.borrow().completed_runs, 1);
}

/// A failed fetch is shown with its reason and recovers on retry.
#[tokio::test]
async fn failed_fetch_recovers_on_retry() {
    let repo = repository();
    let out = SharedBuf::default();
    let adapter = TerminalAdapter::new(out.clone(), Arc::clone(&repo));
    let view = adapter.view();
    let source = FakeSource::new(vec![
        Err(FetchError::Backend {
            status: 502,
            message: "bad gateway".to_string(),
        }),
        Ok(unit_words()),
    ]);

    let handle = spawn_session(
        session_config(StudySettings::default()),
        source.clone(),
        adapter,
        RepositoryHistory::new(Arc::clone(&repo)),
    );

    wait_for(&view, |v| v.state == "error").await;
    assert!(out.text().contains("Backend error: 502 - bad gateway"));

    handle.retry().unwrap();
    wait_for(&view, showing(1)).await;

    handle.dismiss().unwrap();
    handle.join().await;

    let calls = source.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![("secret".to_string(), 2), ("secret".to_string(), 2)]
    );
    assert!(repo.lock().unwrap().get_outcomes().unwrap().is_empty());
}

/// With nothing remembered yet, the remembered filter yields no cards.
#[tokio::test]
async fn remembered_filter_without_history_is_empty() {
    let repo = repository();
    let out = SharedBuf::default();
    let adapter = TerminalAdapter::new(out.clone(), Arc::clone(&repo));
    let view = adapter.view();

    let handle = spawn_session(
        session_config(StudySettings {
            filter: DisplayFilter::Remembered,
            order: Order::Random,
        }),
        FakeSource::new(vec![Ok(unit_words())]),
        adapter,
        RepositoryHistory::new(Arc::clone(&repo)),
    );

    wait_for(&view, |v| v.state == "empty").await;
    handle.swipe(Outcome::Remembered).unwrap();
    handle.dismiss().unwrap();
    handle.join().await;

    let text = out.text();
    assert!(text.contains("No cards match the current filter."));
    assert!(text.contains("Not available right now: cannot apply swipe while empty"));
}
