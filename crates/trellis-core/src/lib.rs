//! Trellis: trie-constrained decoding for autoregressive generators.
//!
//! Past a designated delimiter token, only continuations drawn from a
//! fixed, pre-declared set of allowed token sequences may be produced.
//! This crate holds the automaton side of that contract:
//!
//! - **No model, no search loop** — the generator and its beam search
//!   stay external; this crate only answers "which tokens are legal here"
//! - **Compile once** — the allowed set becomes an immutable prefix tree
//!   shared read-only across every candidate and every thread
//! - **Stateless between steps** — each call re-resolves a candidate's
//!   position from its full history, so the search loop is free to
//!   reorder, duplicate, or discard candidates
//!
//! # Example
//!
//! ```
//! use trellis_core::{resolve, State, Trie};
//!
//! // Two allowed continuations after the delimiter: [7 8] and [7 9].
//! // Token 2 is the model's end-of-sequence marker.
//! let sequences = vec![vec![7, 8], vec![7, 9]];
//! let trie = Trie::compile(&sequences, 2).unwrap();
//!
//! // A candidate that has produced "... 5 7", with 5 as the delimiter.
//! let state = resolve(&[42, 5, 7], 5, &trie);
//! let node = match state {
//!     State::Live(node) => node,
//!     _ => unreachable!(),
//! };
//!
//! // Both branches remain open; the end marker does not, because
//! // neither allowed sequence is complete yet.
//! assert!(node.has_child(8));
//! assert!(node.has_child(9));
//! assert!(!node.has_child(2));
//! ```
//!
//! # Deviation
//!
//! A candidate whose post-delimiter tokens leave the trie resolves to
//! [`State::Deviated`]. That is an expected state, not an error: the
//! scoring side (the `trellis-mask` crate) turns it into a score row the
//! search loop will never extend.
//!
//! ```
//! use trellis_core::{resolve, State, Trie};
//!
//! let trie = Trie::compile(&[vec![7, 8]], 2).unwrap();
//! assert_eq!(resolve(&[5, 7, 99], 5, &trie), State::Deviated);
//!
//! // No delimiter yet: the constrained region has not begun.
//! assert_eq!(resolve(&[7, 8], 5, &trie), State::Free);
//! ```

pub mod error;
pub mod limits;
pub mod resolve;
pub mod token;
pub mod trie;

pub use error::CompileError;
pub use limits::Limits;
pub use resolve::{resolve, State};
pub use token::{Sequence, TokenId};
pub use trie::{Trie, TrieNode};
