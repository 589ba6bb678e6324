//! Response Shape Decoding
//!
//! The generation service has answered in more than one layout over time.
//! Rather than probing attributes reflectively, each known layout is a
//! variant of [`ResponseShape`] and a body is decoded by trying them in a
//! fixed order:
//!
//! 1. `{"generations": [{"text": ..} | {"content": ..}]}`
//! 2. `{"candidates": [{"content": {"parts": [{"text": ..}]}}]}`
//! 3. `{"text": ..}`
//!
//! The first shape that yields non-empty text wins.

use serde::Deserialize;

/// A recognised response layout
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseShape {
    /// Generation list, each entry carrying text or content
    Generations(Vec<Generation>),
    /// Candidate list, each candidate carrying content parts
    Candidates(Vec<Candidate>),
    /// Bare text field
    Text(String),
}

/// One entry of a generation list
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Generation {
    /// Direct text
    #[serde(default)]
    pub text: Option<String>,
    /// Nested content (used when `text` is absent)
    #[serde(default)]
    pub content: Option<GenerationContent>,
}

/// Content attached to a generation
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GenerationContent {
    /// Object with a text field
    Structured {
        /// The text
        text: String,
    },
    /// Plain string content
    Raw(String),
    /// Anything else, rendered as JSON
    Other(serde_json::Value),
}

impl GenerationContent {
    fn text(&self) -> String {
        match self {
            Self::Structured { text } | Self::Raw(text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// One entry of a candidate list
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Candidate {
    /// Candidate content
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

/// Content of a candidate
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CandidateContent {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Part {
    /// Part text (absent for non-text parts)
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct GenerationsBody {
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct CandidatesBody {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct TextBody {
    text: String,
}

impl ResponseShape {
    /// Decode every shape the body matches, in probe order
    pub fn decode_all(body: &serde_json::Value) -> Vec<Self> {
        let mut shapes = Vec::new();

        if let Ok(parsed) = GenerationsBody::deserialize(body) {
            shapes.push(Self::Generations(parsed.generations));
        }
        if let Ok(parsed) = CandidatesBody::deserialize(body) {
            shapes.push(Self::Candidates(parsed.candidates));
        }
        if let Ok(parsed) = TextBody::deserialize(body) {
            shapes.push(Self::Text(parsed.text));
        }

        shapes
    }

    /// Text carried by this shape, if any and non-empty
    pub fn text(&self) -> Option<String> {
        let raw = match self {
            Self::Generations(generations) => {
                let first = generations.first()?;
                match (&first.text, &first.content) {
                    (Some(text), _) if !text.trim().is_empty() => text.clone(),
                    (_, Some(content)) => content.text(),
                    _ => return None,
                }
            }
            Self::Candidates(candidates) => candidates
                .first()?
                .content
                .as_ref()?
                .parts
                .first()?
                .text
                .clone()?,
            Self::Text(text) => text.clone(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Extract the first non-empty text from a response body
    pub fn extract_text(body: &serde_json::Value) -> Option<String> {
        Self::decode_all(body).iter().find_map(Self::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_candidates_shape() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello there"}], "role": "model"},
                "finishReason": "STOP"
            }]
        });
        assert_eq!(ResponseShape::extract_text(&body).as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_generations_shape_with_text() {
        let body = json!({"generations": [{"text": "From generations"}]});
        assert_eq!(
            ResponseShape::extract_text(&body).as_deref(),
            Some("From generations")
        );
    }

    #[test]
    fn test_generations_shape_with_structured_content() {
        let body = json!({"generations": [{"content": {"text": "nested"}}]});
        assert_eq!(ResponseShape::extract_text(&body).as_deref(), Some("nested"));
    }

    #[test]
    fn test_generations_shape_with_raw_content() {
        let body = json!({"generations": [{"content": "raw string"}]});
        assert_eq!(ResponseShape::extract_text(&body).as_deref(), Some("raw string"));
    }

    #[test]
    fn test_bare_text_shape() {
        let body = json!({"text": "  just text  "});
        assert_eq!(ResponseShape::extract_text(&body).as_deref(), Some("just text"));
    }

    #[test]
    fn test_generations_probed_before_candidates() {
        let body = json!({
            "generations": [{"text": "first"}],
            "candidates": [{"content": {"parts": [{"text": "second"}]}}]
        });
        assert_eq!(ResponseShape::extract_text(&body).as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_shape_falls_through_to_next() {
        let body = json!({
            "candidates": [],
            "text": "fallback text"
        });
        let shapes = ResponseShape::decode_all(&body);
        assert_eq!(shapes.len(), 2);
        assert_eq!(
            ResponseShape::extract_text(&body).as_deref(),
            Some("fallback text")
        );
    }

    #[test]
    fn test_no_text_anywhere() {
        assert_eq!(ResponseShape::extract_text(&json!({})), None);
        assert_eq!(ResponseShape::extract_text(&json!({"text": "   "})), None);
        assert_eq!(
            ResponseShape::extract_text(&json!({"candidates": [{"finishReason": "SAFETY"}]})),
            None
        );
        assert_eq!(ResponseShape::extract_text(&json!(["not", "an", "object"])), None);
    }
}
