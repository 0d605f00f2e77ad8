//! Deck building: filter words by prior outcome, then order them.

use crate::types::{DisplayFilter, Order, Outcomes, WordId, WordItem};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Ordered, immutable sequence of words for one session.
///
/// Cloning shares the underlying slice. A deck is never edited; settings
/// changes build a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    words: Arc<[WordItem]>,
}

impl Deck {
    pub fn new(words: Vec<WordItem>) -> Self {
        Self {
            words: words.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordItem> {
        self.words.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordItem> {
        self.words.iter()
    }

    pub fn ids(&self) -> Vec<WordId> {
        self.words.iter().map(|w| w.id).collect()
    }
}

impl std::ops::Index<usize> for Deck {
    type Output = WordItem;

    fn index(&self, index: usize) -> &WordItem {
        &self.words[index]
    }
}

/// Build a deck using the thread-local RNG for random order.
pub fn build_deck(
    all_words: &[WordItem],
    filter: DisplayFilter,
    order: Order,
    prior_outcomes: &Outcomes,
) -> Deck {
    build_deck_with_rng(all_words, filter, order, prior_outcomes, &mut rand::rng())
}

/// Build a deck with an explicit random source.
pub fn build_deck_with_rng<R: Rng + ?Sized>(
    all_words: &[WordItem],
    filter: DisplayFilter,
    order: Order,
    prior_outcomes: &Outcomes,
    rng: &mut R,
) -> Deck {
    let mut words: Vec<WordItem> = all_words
        .iter()
        .filter(|w| filter.admits(prior_outcomes.get(&w.id).copied()))
        .cloned()
        .collect();

    if order == Order::Random {
        words.shuffle(rng);
    }

    Deck::new(words)
}
