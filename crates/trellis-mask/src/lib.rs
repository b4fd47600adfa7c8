//! Score masking for trie-constrained decoding.
//!
//! This crate turns the automaton states of `trellis-core` into adjusted
//! score rows for a beam-structured search loop: allowed continuations
//! keep their raw scores, everything else is forced to a large negative
//! sentinel, and rows are padded so the search always sees enough
//! rankable columns.
//!
//! # Example
//!
//! ```
//! use trellis_core::Trie;
//! use trellis_mask::TrieProcessor;
//!
//! // Vocabulary of 8 tokens; 7 is the end marker, 0 the delimiter.
//! let trie = Trie::compile(&[vec![2, 3], vec![2, 4]], 7).unwrap();
//! let processor = TrieProcessor::new(trie, 0, 2, 8);
//!
//! // One candidate, one matching token past the delimiter.
//! let mut scores = vec![0.5_f32; 8];
//! processor.process_row(&[1, 0, 2], &mut scores);
//!
//! // Only the continuations 3 and 4 keep their real scores.
//! assert_eq!(scores[3], 0.5);
//! assert_eq!(scores[4], 0.5);
//! assert!(scores[5] < -1.0e9);
//! ```

pub use trellis_core;

pub mod mask;
pub mod processor;
pub mod source;
pub mod tokenizer;

pub use mask::{MaskPolicy, StepMask, MASKED_SCORE, STRUCTURAL_SCORE};
pub use processor::{SetupError, TrieProcessor};
pub use source::{AllowedSequences, SourceError};
pub use tokenizer::Tokenizer;
