//! Recommendation candidates and the provider seam.
//!
//! A [`Candidate`] mirrors the wire shape the generative-language API
//! returns (`content` → `parts` → `text`), with every level optional so a
//! partially-shaped response degrades to an empty display string instead of
//! failing.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One recommendation entry returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
}

/// The content block of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// One text fragment within a candidate's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CandidatePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Candidate {
    /// Builds a candidate holding a single text fragment.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(CandidateContent {
                parts: vec![CandidatePart {
                    text: Some(text.into()),
                }],
            }),
        }
    }

    /// The first text fragment of this candidate, or empty.
    ///
    /// Only the first part is rendered; missing content, parts, or text at
    /// any level produce an empty string.
    pub fn display_text(&self) -> String {
        self.content
            .as_ref()
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.clone())
            .unwrap_or_default()
    }
}

/// An abstract provider of book recommendations.
///
/// This trait decouples the controller from the concrete remote API client,
/// so the state-machine logic can be exercised against a scripted provider
/// in tests.
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    /// Requests recommendations for the given prompt.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Candidate>)`: the candidate list, possibly empty
    /// - `Err(ReadrecError)`: transport or response failure
    async fn recommend(&self, prompt: &str) -> Result<Vec<Candidate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_happy_path() {
        let json = r#"{"content":{"parts":[{"text":"X"}]}}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.display_text(), "X");
    }

    #[test]
    fn test_display_text_uses_first_part_only() {
        let json = r#"{"content":{"parts":[{"text":"first"},{"text":"second"}]}}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.display_text(), "first");
    }

    #[test]
    fn test_display_text_degrades_to_empty() {
        let missing_content: Candidate = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing_content.display_text(), "");

        let missing_parts: Candidate = serde_json::from_str(r#"{"content":{}}"#).unwrap();
        assert_eq!(missing_parts.display_text(), "");

        let missing_text: Candidate =
            serde_json::from_str(r#"{"content":{"parts":[{}]}}"#).unwrap();
        assert_eq!(missing_text.display_text(), "");
    }
}
