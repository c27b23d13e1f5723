// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store: ordered, in-memory turn history.
//!
//! Turns are immutable once appended. Alternation of roles is not enforced
//! here; the session orchestrator always appends user-then-assistant pairs.

use std::iter::FusedIterator;
use std::slice;

use parley_core::Turn;
use tracing::debug;

/// Ordered turn history for one session.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the history.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The most recent `max_turns` turns (all turns for `None`), oldest first.
    ///
    /// The returned iterator borrows the store, never mutates it, and can be
    /// cloned to walk the same window again.
    pub fn context(&self, max_turns: Option<usize>) -> ContextWindow<'_> {
        let start = max_turns.map_or(0, |n| self.turns.len().saturating_sub(n));
        ContextWindow {
            inner: self.turns[start..].iter(),
        }
    }

    /// Discard every turn and return how many were removed.
    pub fn clear(&mut self) -> usize {
        let cleared = self.turns.len();
        self.turns.clear();
        debug!(cleared, "conversation cleared");
        cleared
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Every turn, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

/// A lazy view over the tail of a [`ConversationStore`].
#[derive(Debug, Clone)]
pub struct ContextWindow<'a> {
    inner: slice::Iter<'a, Turn>,
}

impl<'a> Iterator for ContextWindow<'a> {
    type Item = &'a Turn;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for ContextWindow<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for ContextWindow<'_> {}

impl FusedIterator for ContextWindow<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{Role, TokenUsage};
    use proptest::prelude::*;

    fn store_with(n: usize) -> ConversationStore {
        let mut store = ConversationStore::new();
        for i in 0..n {
            if i % 2 == 0 {
                store.append(Turn::user(format!("q{i}")));
            } else {
                store.append(Turn::assistant(
                    format!("a{i}"),
                    &TokenUsage::reported(1, 1),
                ));
            }
        }
        store
    }

    #[test]
    fn append_preserves_order() {
        let store = store_with(4);
        let contents: Vec<_> = store.context(None).map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["q0", "a1", "q2", "a3"]);
    }

    #[test]
    fn context_takes_most_recent() {
        let store = store_with(5);
        let contents: Vec<_> = store
            .context(Some(2))
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, ["a3", "q4"]);
    }

    #[test]
    fn context_larger_than_history_returns_everything() {
        let store = store_with(3);
        assert_eq!(store.context(Some(100)).len(), 3);
    }

    #[test]
    fn context_is_restartable() {
        let store = store_with(3);
        let window = store.context(None);
        let first: Vec<_> = window.clone().collect();
        let second: Vec<_> = window.collect();
        assert_eq!(first, second);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn out_of_turn_appends_are_accepted() {
        let mut store = ConversationStore::new();
        store.append(Turn::user("one"));
        store.append(Turn::user("two"));
        assert!(store.context(None).all(|t| t.role == Role::User));
    }

    #[test]
    fn clear_on_empty_store_returns_zero() {
        let mut store = ConversationStore::new();
        assert_eq!(store.clear(), 0);
    }

    proptest! {
        #[test]
        fn clear_returns_count_and_empties_context(n in 0usize..64) {
            let mut store = store_with(n);
            prop_assert_eq!(store.clear(), n);
            prop_assert_eq!(store.context(None).count(), 0);
            prop_assert!(store.is_empty());
        }

        #[test]
        fn window_length_is_min_of_cap_and_len(n in 0usize..64, cap in 0usize..80) {
            let store = store_with(n);
            prop_assert_eq!(store.context(Some(cap)).len(), n.min(cap));
        }
    }
}
