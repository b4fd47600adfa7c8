//! Token identifiers shared across the engine.

/// Integer index into the model's vocabulary, identifying one generation
/// unit.
///
/// The value is opaque to the engine: only identity and equality matter,
/// never ordering or adjacency. This matches the id type LLM runtimes
/// use for vocabulary entries.
pub type TokenId = u32;

/// An ordered run of token ids.
///
/// At compile time a sequence is one allowed continuation; at decode time
/// it is a candidate's generated-so-far history. The engine only ever
/// reads histories — they are owned and extended by the external search
/// loop.
pub type Sequence = Vec<TokenId>;
