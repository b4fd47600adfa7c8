//! Per-step batch processor for the external search loop.

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use trellis_core::{resolve, CompileError, Sequence, TokenId, Trie};

use crate::mask::{MaskPolicy, StepMask};
use crate::source::{AllowedSequences, SourceError};
use crate::tokenizer::Tokenizer;

/// The per-step decision filter handed to the external search loop.
///
/// Owns the compiled trie plus the run configuration, and rewrites one
/// score row per candidate per step. The processor itself carries no
/// mutable state: every call resolves each candidate from its full
/// history, so steps impose no ordering on one another.
///
/// # Example
///
/// ```ignore
/// let source = AllowedSequences::from_json(&std::fs::read_to_string(path)?)?;
/// let processor = TrieProcessor::from_source(&source, &tokenizer, ":", beam_width, vocab_size)?;
///
/// loop {
///     let rows = model.step_scores(&histories);
///     let mut rows = rows;
///     processor.process_batch(&histories, &mut rows);
///     histories = search.extend(histories, rows);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TrieProcessor {
    trie: Trie,
    delimiter: TokenId,
    beam_width: usize,
    vocab_size: usize,
    policy: MaskPolicy,
}

impl TrieProcessor {
    /// Create a processor with the default [`MaskPolicy`].
    pub fn new(trie: Trie, delimiter: TokenId, beam_width: usize, vocab_size: usize) -> Self {
        Self::with_policy(trie, delimiter, beam_width, vocab_size, MaskPolicy::default())
    }

    /// Create a processor with a custom masking policy.
    pub fn with_policy(
        trie: Trie,
        delimiter: TokenId,
        beam_width: usize,
        vocab_size: usize,
        policy: MaskPolicy,
    ) -> Self {
        Self {
            trie,
            delimiter,
            beam_width,
            vocab_size,
            policy,
        }
    }

    /// Build a processor from the structured source record.
    ///
    /// Encodes the delimiter text and every allowed sequence through the
    /// tokenizer collaborator, then compiles the trie against the
    /// tokenizer's end marker. All failures here are fatal and surface
    /// before generation starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter does not encode to exactly one
    /// token, or if trie compilation fails.
    pub fn from_source<T: Tokenizer>(
        source: &AllowedSequences,
        tokenizer: &T,
        delimiter_text: &str,
        beam_width: usize,
        vocab_size: usize,
    ) -> Result<Self, SetupError> {
        let delimiter_ids = tokenizer.encode(delimiter_text);
        if delimiter_ids.len() != 1 {
            return Err(SetupError::DelimiterWidth {
                text: delimiter_text.to_string(),
                token_count: delimiter_ids.len(),
            });
        }
        let delimiter = delimiter_ids[0];

        let encoded: Vec<Sequence> = source
            .sequences
            .iter()
            .map(|text| tokenizer.encode(text))
            .collect();
        let trie = Trie::compile(&encoded, tokenizer.end_marker())?;

        debug!(
            sequences = encoded.len(),
            nodes = trie.node_count(),
            beam_width,
            vocab_size,
            "compiled constraint trie"
        );

        Ok(Self::new(trie, delimiter, beam_width, vocab_size))
    }

    /// The compiled automaton.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// The delimiter token anchoring the constrained region.
    pub fn delimiter(&self) -> TokenId {
        self.delimiter
    }

    /// The search loop's configured beam width.
    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    /// The vocabulary size every score row must have.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// The active masking policy.
    pub fn policy(&self) -> MaskPolicy {
        self.policy
    }

    /// Resolve one candidate and build its step mask without applying it.
    pub fn mask_for(&self, history: &[TokenId]) -> StepMask {
        let state = resolve(history, self.delimiter, &self.trie);
        StepMask::for_state(
            &state,
            self.vocab_size,
            self.beam_width,
            self.trie.end_marker(),
            self.policy,
        )
    }

    /// Resolve one candidate and rewrite its score row in place.
    ///
    /// # Panics
    ///
    /// Panics if `scores.len()` differs from the configured vocab size.
    pub fn process_row(&self, history: &[TokenId], scores: &mut [f32]) {
        self.mask_for(history).apply_to_scores(scores);
    }

    /// Rewrite one score row per candidate, same shape in and out.
    ///
    /// Rows are independent and the trie is read-only, so the batch is
    /// processed in parallel.
    ///
    /// # Panics
    ///
    /// Panics if the batch sizes differ, or if any row's length differs
    /// from the configured vocab size.
    pub fn process_batch(&self, histories: &[Sequence], rows: &mut [Vec<f32>]) {
        assert_eq!(
            histories.len(),
            rows.len(),
            "batch size mismatch: {} histories, {} score rows",
            histories.len(),
            rows.len()
        );

        histories
            .par_iter()
            .zip(rows.par_iter_mut())
            .for_each(|(history, row)| self.process_row(history, row));
    }
}

/// Errors building a [`TrieProcessor`] from configuration inputs.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The delimiter text did not encode to exactly one token.
    #[error("delimiter {text:?} must encode to exactly one token, got {token_count}")]
    DelimiterWidth { text: String, token_count: usize },

    /// The allowed-sequence source could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The encoded sequences could not be compiled into a trie.
    #[error(transparent)]
    Compile(#[from] CompileError),
}
