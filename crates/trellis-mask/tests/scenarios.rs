//! End-to-end scenario tests for the full resolve-then-mask pipeline.
//!
//! Each scenario drives the processor exactly as the external search
//! loop would: a candidate history in, an adjusted score row out.

use trellis_core::{TokenId, Trie};
use trellis_mask::{MaskPolicy, TrieProcessor, MASKED_SCORE, STRUCTURAL_SCORE};

const DELIM: TokenId = 1;
const END: TokenId = 9;
const VOCAB: usize = 10;

const A: TokenId = 2;
const B: TokenId = 3;
const C: TokenId = 4;
const Z: TokenId = 5;
const X: TokenId = 6;

fn uniform_row() -> Vec<f32> {
    vec![0.125; VOCAB]
}

fn real_columns(row: &[f32]) -> Vec<usize> {
    row.iter()
        .enumerate()
        .filter(|(_, &score)| score > STRUCTURAL_SCORE)
        .map(|(i, _)| i)
        .collect()
}

/// Allowed "a b" and "a c"; after the delimiter and one `a`, only `b`
/// and `c` keep real scores.
#[test]
fn scenario_branching_continuation() {
    let trie = Trie::compile(&[vec![A, B], vec![A, C]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 2, VOCAB);

    let mut row = uniform_row();
    processor.process_row(&[DELIM, A], &mut row);

    assert_eq!(real_columns(&row), vec![B as usize, C as usize]);
    assert_eq!(row[B as usize], 0.125);
    assert_eq!(row[C as usize], 0.125);
    assert_eq!(row[A as usize], MASKED_SCORE);
    assert_eq!(row[END as usize], MASKED_SCORE);
}

/// A token outside the trie kills the candidate: every column, the end
/// marker included, drops below any real score.
#[test]
fn scenario_deviation_kills_candidate() {
    let trie = Trie::compile(&[vec![A, B], vec![A, C]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 2, VOCAB);

    let mut row = uniform_row();
    processor.process_row(&[DELIM, A, Z], &mut row);

    assert!(real_columns(&row).is_empty());
    // The end marker is the single structurally-ranked column the
    // candidate drains through.
    assert_eq!(row[END as usize], STRUCTURAL_SCORE);
    for (i, &score) in row.iter().enumerate() {
        if i != END as usize {
            assert_eq!(score, MASKED_SCORE);
        }
    }
}

/// No delimiter in the history: the constrained region has not begun and
/// the row passes through bit-identical.
#[test]
fn scenario_unconstrained_history() {
    let trie = Trie::compile(&[vec![A, B], vec![A, C]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 2, VOCAB);

    let raw: Vec<f32> = (0..VOCAB).map(|i| (i as f32) - 4.5).collect();
    let mut row = raw.clone();
    processor.process_row(&[A, B], &mut row);

    assert_eq!(row, raw);
}

/// One allowed token with beam width 3: the row is padded with exactly
/// two structural columns so the search still sees three rankable ones.
#[test]
fn scenario_beam_width_padding() {
    let trie = Trie::compile(&[vec![X]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 3, VOCAB);

    let mut row = uniform_row();
    processor.process_row(&[DELIM], &mut row);

    assert_eq!(real_columns(&row), vec![X as usize]);
    let structural: Vec<usize> = row
        .iter()
        .enumerate()
        .filter(|(_, &score)| score == STRUCTURAL_SCORE)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(structural, vec![0, 1]);

    let rankable = row.iter().filter(|&&score| score > MASKED_SCORE).count();
    assert_eq!(rankable, 3);
}

/// A candidate that walked a complete allowed sequence may stop: the end
/// marker is among the real-score columns.
#[test]
fn scenario_complete_sequence_may_terminate() {
    let trie = Trie::compile(&[vec![A, B]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 1, VOCAB);

    let mut row = uniform_row();
    processor.process_row(&[7, DELIM, A, B], &mut row);

    assert_eq!(real_columns(&row), vec![END as usize]);
}

/// Multi-step walk: masks stay consistent as the search loop extends a
/// candidate token by token until termination.
#[test]
fn scenario_full_walk() {
    let trie = Trie::compile(&[vec![A, B], vec![A, C]], END).unwrap();
    let processor = TrieProcessor::new(trie, DELIM, 2, VOCAB);

    let mut history = vec![8, 7, DELIM];

    // Step 1: at the root, only `a` is real.
    let mask = processor.mask_for(&history);
    assert_eq!(mask.allowed_ids(), &[A]);
    history.push(A);

    // Step 2: branch point.
    let mask = processor.mask_for(&history);
    assert_eq!(mask.allowed_ids(), &[B, C]);
    history.push(C);

    // Step 3: only termination remains.
    let mask = processor.mask_for(&history);
    assert_eq!(mask.allowed_ids(), &[END]);
}

/// The overridable deviation policy: a deviated candidate keeps the end
/// marker's raw score and can terminate honestly.
#[test]
fn scenario_terminating_deviation_policy() {
    let trie = Trie::compile(&[vec![A, B]], END).unwrap();
    let processor =
        TrieProcessor::with_policy(trie, DELIM, 2, VOCAB, MaskPolicy::terminating());

    let mut row = uniform_row();
    processor.process_row(&[DELIM, Z], &mut row);

    assert_eq!(row[END as usize], 0.125);
    assert_eq!(real_columns(&row), vec![END as usize]);
}
