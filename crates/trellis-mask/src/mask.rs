//! Per-step score mask construction and application.

use trellis_core::{State, TokenId};

/// Score written into masked-out columns.
///
/// Finite and orderable: downstream normalization must stay
/// arithmetically safe, so neither NaN nor negative infinity is usable
/// here.
pub const MASKED_SCORE: f32 = -1.0e12;

/// Score written into structurally-present columns: beam-width padding,
/// and the end marker of a deviated candidate.
///
/// One order of magnitude above [`MASKED_SCORE`], so structural columns
/// outrank masked ones without ever competing with a real score.
pub const STRUCTURAL_SCORE: f32 = -1.0e10;

/// Masking policy: the two sentinel levels and the deviation quirk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskPolicy {
    /// Score assigned to tokens with no valid continuation.
    pub masked_score: f32,
    /// Score assigned to structurally-selectable tokens.
    pub structural_score: f32,
    /// When a candidate has deviated, force even the end marker down to
    /// `structural_score` instead of leaving its raw score intact.
    ///
    /// The default reproduces the historical behavior: a deviated row
    /// carries no real score at all, and the end marker is the only
    /// column above `masked_score`, so the search loop drains the
    /// candidate through it. Set to `false` to let deviated candidates
    /// terminate at an honest score instead.
    pub suppress_end_on_deviation: bool,
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            masked_score: MASKED_SCORE,
            structural_score: STRUCTURAL_SCORE,
            suppress_end_on_deviation: true,
        }
    }
}

impl MaskPolicy {
    /// Policy variant that lets deviated candidates terminate with the
    /// end marker's raw score.
    pub fn terminating() -> Self {
        Self {
            suppress_end_on_deviation: false,
            ..Self::default()
        }
    }
}

/// The adjusted-score recipe for one candidate at one decoding step.
///
/// Holds sorted token-id lists rather than a dense vocabulary map: the
/// allowed set is the child list of one trie node and is tiny compared to
/// any real vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct StepMask {
    vocab_size: usize,
    policy: MaskPolicy,
    passthrough: bool,
    /// Tokens that keep their raw score, sorted.
    allowed: Vec<TokenId>,
    /// Tokens forced to the structural score, sorted, disjoint from
    /// `allowed`.
    structural: Vec<TokenId>,
}

impl StepMask {
    /// A mask that leaves the row untouched (the `Free` state).
    pub fn passthrough(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            policy: MaskPolicy::default(),
            passthrough: true,
            allowed: Vec::new(),
            structural: Vec::new(),
        }
    }

    /// Build the mask for a resolved candidate state.
    ///
    /// - `Free`: passthrough.
    /// - `Live(node)`: the node's child tokens keep their raw scores,
    ///   everything else is masked. If fewer than `beam_width` tokens are
    ///   allowed, the lowest-numbered ids outside the allowed set are
    ///   marked structurally selectable until `beam_width` columns rank.
    /// - `Deviated`: every column is masked; the end marker is handled
    ///   per [`MaskPolicy::suppress_end_on_deviation`]. No padding — a
    ///   deviated candidate gets no extra live columns.
    pub fn for_state(
        state: &State<'_>,
        vocab_size: usize,
        beam_width: usize,
        end_marker: TokenId,
        policy: MaskPolicy,
    ) -> Self {
        match state {
            State::Free => Self::passthrough(vocab_size),
            State::Live(node) => {
                let mut allowed: Vec<TokenId> = node.tokens().collect();
                allowed.sort_unstable();
                let needed = beam_width.saturating_sub(allowed.len());
                let structural = padding_ids(&allowed, needed, vocab_size);
                Self {
                    vocab_size,
                    policy,
                    passthrough: false,
                    allowed,
                    structural,
                }
            }
            State::Deviated => {
                let (allowed, structural) = if policy.suppress_end_on_deviation {
                    (Vec::new(), vec![end_marker])
                } else {
                    (vec![end_marker], Vec::new())
                };
                Self {
                    vocab_size,
                    policy,
                    passthrough: false,
                    allowed,
                    structural,
                }
            }
        }
    }

    /// Check if this mask leaves the row untouched.
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Tokens that keep their raw scores.
    pub fn allowed_ids(&self) -> &[TokenId] {
        &self.allowed
    }

    /// Tokens forced to the structural score.
    pub fn structural_ids(&self) -> &[TokenId] {
        &self.structural
    }

    /// Check if a token keeps its raw score under this mask.
    pub fn is_allowed(&self, token: TokenId) -> bool {
        self.passthrough || self.allowed.binary_search(&token).is_ok()
    }

    /// Number of columns with a real (raw) score after application.
    pub fn allowed_count(&self) -> usize {
        if self.passthrough {
            self.vocab_size
        } else {
            self.allowed.len()
        }
    }

    /// Number of finite, rankable columns after application: real scores
    /// plus structural padding.
    pub fn rankable_count(&self) -> usize {
        self.allowed_count() + self.structural.len()
    }

    /// The vocabulary size this mask was built for.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Apply the mask to one score row in place.
    ///
    /// # Panics
    ///
    /// Panics if `scores.len() != vocab_size`.
    pub fn apply_to_scores(&self, scores: &mut [f32]) {
        assert_eq!(
            scores.len(),
            self.vocab_size,
            "scores length {} != vocab_size {}",
            scores.len(),
            self.vocab_size
        );

        if self.passthrough {
            return;
        }

        // Save the raw scores of the allowed columns, flood the row with
        // the masked sentinel, then restore them.
        let kept: Vec<f32> = self.allowed.iter().map(|&id| scores[id as usize]).collect();
        scores.fill(self.policy.masked_score);
        for (i, &id) in self.allowed.iter().enumerate() {
            scores[id as usize] = kept[i];
        }
        for &id in &self.structural {
            scores[id as usize] = self.policy.structural_score;
        }
    }

    /// Apply the mask and return a new score row.
    pub fn apply_to_scores_cloned(&self, scores: &[f32]) -> Vec<f32> {
        let mut result = scores.to_vec();
        self.apply_to_scores(&mut result);
        result
    }
}

/// The `needed` lowest-numbered token ids not present in `allowed`.
///
/// `allowed` must be sorted. Deterministic by construction; callers must
/// not rely on this exact selection beyond determinism.
fn padding_ids(allowed: &[TokenId], needed: usize, vocab_size: usize) -> Vec<TokenId> {
    let mut out = Vec::with_capacity(needed);
    let mut id: TokenId = 0;
    while out.len() < needed && (id as usize) < vocab_size {
        if allowed.binary_search(&id).is_err() {
            out.push(id);
        }
        id += 1;
    }
    out
}
