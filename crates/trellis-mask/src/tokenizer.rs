//! Capability interface onto the external tokenizer.

use trellis_core::{Sequence, TokenId};

/// The two capabilities the engine needs from the tokenizer/model pair.
///
/// Implementations wrap whatever runtime owns the vocabulary; the engine
/// never performs text encoding itself and never depends on anything
/// beyond these two methods. Both must be resolved before the trie is
/// compiled — token ids are fixed for the lifetime of a run.
///
/// `encode` must return content tokens only: any BOS-style prefix the
/// underlying tokenizer inserts has to be stripped before the ids reach
/// the engine.
pub trait Tokenizer {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Sequence;

    /// The designated end-of-sequence token id.
    fn end_marker(&self) -> TokenId;
}
