//! Prefix tree over the allowed-sequence set.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::limits::Limits;
use crate::token::{Sequence, TokenId};

/// One node of the compiled prefix tree.
///
/// A node owns its children outright; there are no parent links because
/// resolution always walks root-to-node forward. The root represents
/// "zero tokens consumed since the constrained region began", and a node
/// whose children include the end marker represents a position where a
/// complete allowed sequence ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    children: HashMap<TokenId, TrieNode>,
}

impl TrieNode {
    /// Follow the edge labeled `token`, if it exists.
    pub fn child(&self, token: TokenId) -> Option<&TrieNode> {
        self.children.get(&token)
    }

    /// Check whether an edge labeled `token` exists.
    pub fn has_child(&self, token: TokenId) -> bool {
        self.children.contains_key(&token)
    }

    /// Iterate over the tokens with outgoing edges, in no intrinsic order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.children.keys().copied()
    }

    /// Number of outgoing edges.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check whether this node has no outgoing edges.
    ///
    /// Inside a compiled trie only end-marker children are leaves; the
    /// root is also a leaf when the allowed set is empty.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The compiled automaton over the allowed-sequence set.
///
/// Built once at startup, then immutable for the lifetime of the run and
/// safely shared by any number of concurrent readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie {
    root: TrieNode,
    end_marker: TokenId,
    node_count: usize,
}

impl Trie {
    /// Compile the allowed-sequence set with default [`Limits`].
    ///
    /// Sequences sharing a prefix share the corresponding node chain, one
    /// edge per token. Every sequence is terminated by a leaf child keyed
    /// by `end_marker`, so a prefix that is also a complete sequence stays
    /// distinguishable from a merely partial one. Duplicate sequences are
    /// idempotent no-ops. An empty input set yields a childless root.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is exceeded or if a sequence contains
    /// the end marker.
    pub fn compile(sequences: &[Sequence], end_marker: TokenId) -> Result<Self, CompileError> {
        Self::compile_with_limits(sequences, end_marker, Limits::default())
    }

    /// Compile the allowed-sequence set with custom limits.
    pub fn compile_with_limits(
        sequences: &[Sequence],
        end_marker: TokenId,
        limits: Limits,
    ) -> Result<Self, CompileError> {
        if sequences.len() > limits.max_sequences {
            return Err(CompileError::TooManySequences(limits.max_sequences));
        }

        let mut root = TrieNode::default();
        let mut node_count = 0usize;

        for sequence in sequences {
            if sequence.len() > limits.max_sequence_len {
                return Err(CompileError::SequenceTooLong(limits.max_sequence_len));
            }
            if sequence.contains(&end_marker) {
                return Err(CompileError::EndMarkerInSequence(end_marker));
            }

            let mut node = &mut root;
            for &token in sequence {
                if !node.children.contains_key(&token) {
                    node_count += 1;
                    if node_count > limits.max_nodes {
                        return Err(CompileError::MaxNodesExceeded(limits.max_nodes));
                    }
                }
                node = node.children.entry(token).or_default();
            }

            // Terminal marker: this prefix is a complete allowed sequence.
            if !node.children.contains_key(&end_marker) {
                node_count += 1;
                if node_count > limits.max_nodes {
                    return Err(CompileError::MaxNodesExceeded(limits.max_nodes));
                }
                node.children.insert(end_marker, TrieNode::default());
            }
        }

        Ok(Self {
            root,
            end_marker,
            node_count,
        })
    }

    /// The root node: zero tokens consumed since the constrained region
    /// began.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// The end-of-sequence marker this trie was compiled with.
    pub fn end_marker(&self) -> TokenId {
        self.end_marker
    }

    /// Number of nodes below the root, terminal markers included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Check whether the allowed set compiled to nothing.
    ///
    /// An empty trie still constrains: once the delimiter is seen, no
    /// token has a matching edge.
    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }
}
