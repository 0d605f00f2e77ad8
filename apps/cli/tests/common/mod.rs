//! Common test utilities for session integration tests.
//!
//! Provides an in-memory word source, a shareable output buffer and a helper
//! that waits for the terminal view to reach a condition.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use study_core::error::FetchError;
use study_core::source::WordSource;
use study_core::types::WordItem;
use tokio::sync::watch;
use vocab_cards_cli::adapter::SessionView;
use vocab_cards_cli::db::SqliteRepository;

/// Word source returning scripted results; the last result repeats.
pub struct FakeSource {
    results: Mutex<VecDeque<Result<Vec<WordItem>, FetchError>>>,
    pub calls: Mutex<Vec<(String, i64)>>,
}

impl FakeSource {
    pub fn new(results: Vec<Result<Vec<WordItem>, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl WordSource for FakeSource {
    async fn fetch(&self, auth_token: &str, unit_id: i64) -> Result<Vec<WordItem>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((auth_token.to_string(), unit_id));
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            results.pop_front().unwrap()
        } else {
            results.front().cloned().unwrap()
        }
    }
}

/// Output sink that can be inspected after the adapter took ownership.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn repository() -> Arc<Mutex<SqliteRepository>> {
    Arc::new(Mutex::new(SqliteRepository::open_in_memory().unwrap()))
}

pub fn word(id: i64, text: &str, translation: &str) -> WordItem {
    WordItem {
        id,
        text: text.to_string(),
        reading: String::new(),
        translation: translation.to_string(),
    }
}

pub fn unit_words() -> Vec<WordItem> {
    vec![
        word(1, "看護師", "y tá"),
        word(2, "病院", "bệnh viện"),
        word(3, "患者", "bệnh nhân"),
    ]
}

/// Wait until the view satisfies `pred`.
///
/// # Panics
/// Panics if the condition is not reached within five seconds or the
/// session shuts down first.
pub async fn wait_for<F>(view: &watch::Receiver<SessionView>, pred: F)
where
    F: FnMut(&SessionView) -> bool,
{
    let mut view = view.clone();
    let reached = tokio::time::timeout(Duration::from_secs(5), view.wait_for(pred))
        .await
        .expect("view never reached expected state")
        .is_ok();
    assert!(reached, "session closed before reaching expected state");
}

pub fn showing(id: i64) -> impl Fn(&SessionView) -> bool {
    move |v| v.state == "ready" && v.card.as_ref().map(|c| c.id) == Some(id)
}
