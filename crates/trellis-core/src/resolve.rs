//! Candidate state resolution against the compiled trie.

use crate::token::TokenId;
use crate::trie::{Trie, TrieNode};

/// Where a candidate stands relative to the constrained region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State<'a> {
    /// The delimiter has not been produced yet; no constraint is active.
    Free,
    /// The post-delimiter tokens match a (possibly empty) path in the
    /// trie; `Live` holds the node reached.
    Live(&'a TrieNode),
    /// The post-delimiter tokens left the trie. Sticky for the rest of
    /// generation, since the offending token stays in the suffix.
    Deviated,
}

impl<'a> State<'a> {
    /// Check for the unconstrained state.
    pub fn is_free(&self) -> bool {
        matches!(self, State::Free)
    }

    /// Check for the deviated state.
    pub fn is_deviated(&self) -> bool {
        matches!(self, State::Deviated)
    }

    /// The occupied trie node, if the candidate is live.
    pub fn node(&self) -> Option<&'a TrieNode> {
        match self {
            State::Live(node) => Some(node),
            _ => None,
        }
    }
}

/// Recompute a candidate's automaton state from its full token history.
///
/// The *last* occurrence of `delimiter` anchors the constrained region;
/// everything at or before it is irrelevant. The tokens strictly after it
/// are walked from the trie root, and the first token without a matching
/// edge deviates the candidate immediately; there is no partial matching
/// past that point.
///
/// Resolution never caches across calls: the external search loop may
/// reorder, duplicate, or discard candidates between steps, so the only
/// trustworthy input is the complete history handed in each time.
pub fn resolve<'a>(history: &[TokenId], delimiter: TokenId, trie: &'a Trie) -> State<'a> {
    let anchor = match history.iter().rposition(|&token| token == delimiter) {
        Some(index) => index,
        None => return State::Free,
    };

    let mut node = trie.root();
    for &token in &history[anchor + 1..] {
        match node.child(token) {
            Some(child) => node = child,
            None => return State::Deviated,
        }
    }
    State::Live(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    const END: TokenId = 9;
    const DELIM: TokenId = 1;

    fn trie() -> Trie {
        Trie::compile(&[vec![2, 3], vec![2, 4]], END).unwrap()
    }

    #[test]
    fn test_no_delimiter_is_free() {
        let trie = trie();
        assert_eq!(resolve(&[2, 3], DELIM, &trie), State::Free);
        assert_eq!(resolve(&[], DELIM, &trie), State::Free);
    }

    #[test]
    fn test_empty_suffix_is_live_at_root() {
        let trie = trie();
        let state = resolve(&[42, DELIM], DELIM, &trie);
        let node = state.node().expect("should be live");
        assert!(std::ptr::eq(node, trie.root()));
    }

    #[test]
    fn test_matching_suffix_is_live() {
        let trie = trie();
        let state = resolve(&[DELIM, 2], DELIM, &trie);
        let node = state.node().expect("should be live");
        assert!(node.has_child(3));
        assert!(node.has_child(4));
    }

    #[test]
    fn test_complete_sequence_ends_at_terminal_node() {
        let trie = trie();
        let state = resolve(&[DELIM, 2, 3], DELIM, &trie);
        let node = state.node().expect("should be live");
        assert!(node.has_child(END));
    }

    #[test]
    fn test_unmatched_token_deviates() {
        let trie = trie();
        assert_eq!(resolve(&[DELIM, 5], DELIM, &trie), State::Deviated);
        assert_eq!(resolve(&[DELIM, 2, 5], DELIM, &trie), State::Deviated);
    }

    #[test]
    fn test_deviation_is_sticky() {
        let trie = trie();
        // Even a would-be-valid token after the offending one cannot
        // recover the candidate.
        assert_eq!(resolve(&[DELIM, 5, 2], DELIM, &trie), State::Deviated);
    }

    #[test]
    fn test_last_delimiter_wins() {
        let trie = trie();
        // The garbage before the second delimiter is discarded.
        let state = resolve(&[DELIM, 5, 5, DELIM, 2], DELIM, &trie);
        let node = state.node().expect("should be live");
        assert!(node.has_child(3));

        // And conversely: a valid first region does not save a deviated
        // suffix after the newest delimiter.
        assert_eq!(resolve(&[DELIM, 2, DELIM, 5], DELIM, &trie), State::Deviated);
    }

    #[test]
    fn test_empty_trie_deviates_on_any_token() {
        let trie = Trie::compile(&[], END).unwrap();
        assert_eq!(resolve(&[DELIM, 2], DELIM, &trie), State::Deviated);
        // The root itself is still a legal position.
        assert!(resolve(&[DELIM], DELIM, &trie).node().is_some());
    }
}
