//! Structured source of allowed sequences.

use serde::Deserialize;
use thiserror::Error;

/// The allowed-sequence record: an ordered list of raw strings.
///
/// Each string is encoded into token ids by the `Tokenizer` collaborator
/// on the way into trie compilation; the record itself never holds ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllowedSequences {
    /// Allowed continuations, in source order.
    pub sequences: Vec<String>,
}

impl AllowedSequences {
    /// Parse the record from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or does not
    /// carry the `sequences` field. This is fatal configuration input:
    /// there is no partial or degraded mode.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Errors reading the allowed-sequence source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source document does not have the expected shape.
    #[error("malformed allowed-sequence source: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_source() {
        let source = AllowedSequences::from_json(r#"{"sequences": ["a b", "a c"]}"#).unwrap();
        assert_eq!(source.sequences, vec!["a b", "a c"]);
    }

    #[test]
    fn test_empty_list_is_accepted() {
        let source = AllowedSequences::from_json(r#"{"sequences": []}"#).unwrap();
        assert!(source.sequences.is_empty());
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let result = AllowedSequences::from_json(r#"{"entries": ["a"]}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_wrong_shape_is_fatal() {
        let result = AllowedSequences::from_json(r#"{"sequences": "a b"}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));

        let result = AllowedSequences::from_json("not json at all");
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }
}
