//! Error types for trie compilation.

use thiserror::Error;

use crate::token::TokenId;

/// Errors that can occur while compiling the allowed-sequence set.
///
/// All of these are fatal configuration failures surfaced before
/// generation starts. Runtime deviation from the trie is *not* an error;
/// it is an ordinary resolver state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// More input sequences than the configured limit.
    #[error("maximum sequences exceeded ({0})")]
    TooManySequences(usize),

    /// One input sequence is longer than the configured limit.
    #[error("maximum sequence length exceeded ({0})")]
    SequenceTooLong(usize),

    /// The trie grew past the configured node limit.
    #[error("maximum trie nodes exceeded ({0})")]
    MaxNodesExceeded(usize),

    /// An input sequence contains the end marker token.
    ///
    /// The end marker is reserved as a terminal child; allowing it inside
    /// a sequence would make a non-leaf node look complete.
    #[error("end marker token {0} present in an allowed sequence")]
    EndMarkerInSequence(TokenId),
}
