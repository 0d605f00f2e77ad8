//! Per-session swipe outcome recording.

use crate::types::{Outcome, Outcomes, WordId};

/// Outcomes recorded during the current run.
///
/// The last write for an id wins. The map is handed over whole when the
/// session completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeRecorder {
    entries: Outcomes,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, word_id: WordId, outcome: Outcome) {
        self.entries.insert(word_id, outcome);
    }

    pub fn get(&self, word_id: WordId) -> Option<Outcome> {
        self.entries.get(&word_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_outcomes(self) -> Outcomes {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut recorder = OutcomeRecorder::new();
        recorder.record(7, Outcome::NotRemembered);
        recorder.record(7, Outcome::Remembered);
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.get(7), Some(Outcome::Remembered));
    }

    #[test]
    fn hands_over_every_recorded_word() {
        let mut recorder = OutcomeRecorder::new();
        recorder.record(1, Outcome::Remembered);
        recorder.record(2, Outcome::NotRemembered);
        recorder.record(1, Outcome::NotRemembered);
        assert_eq!(
            recorder.into_outcomes(),
            Outcomes::from([(1, Outcome::NotRemembered), (2, Outcome::NotRemembered)])
        );
    }

    #[test]
    fn starts_empty() {
        let recorder = OutcomeRecorder::new();
        assert!(recorder.is_empty());
        assert_eq!(recorder.get(1), None);
    }
}
