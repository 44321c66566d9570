//! Decoding of analysis responses.
//!
//! The analysis service is not contractually stable about which field
//! carries the generated text, so decoding is a prioritized fallback chain
//! rather than a strict schema: tolerate every shape the service has been
//! observed to produce instead of rejecting valid-but-differently-shaped
//! payloads.

use serde::Deserialize;
use thiserror::Error;

/// Field names the service uses for the generated text, highest priority first.
const TEXT_FIELDS: [&str; 5] = ["text", "response", "reply", "content", "message"];

/// Errors that can occur while decoding an analysis response.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid UTF-8 text")]
    NotText,
}

/// Structured form of an analysis response.
///
/// All fields are optional; the service answers with exactly one of them
/// populated, but which one varies between deployments.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisEnvelope {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AnalysisEnvelope {
    /// The first non-empty field in priority order
    /// (`text > response > reply > content > message`).
    pub fn output_text(&self) -> Option<&str> {
        [
            &self.text,
            &self.response,
            &self.reply,
            &self.content,
            &self.message,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.is_empty())
    }
}

/// Extract the generated text from a raw response body.
///
/// Fallback chain, first success wins:
/// 1. structured decode into [`AnalysisEnvelope`], first non-empty priority field
/// 2. generic JSON object probe over the same field names (rescues payloads
///    where a wrongly-typed sibling field makes the strict decode fail)
/// 3. the body itself as plain UTF-8 text
///
/// Only a body that is not text at all is an error.
pub fn decode_analysis_text(body: &[u8]) -> Result<String, DecodeError> {
    if let Ok(envelope) = serde_json::from_slice::<AnalysisEnvelope>(body) {
        if let Some(text) = envelope.output_text() {
            return Ok(text.to_string());
        }
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in TEXT_FIELDS {
            if let Some(serde_json::Value::String(text)) = map.get(field) {
                if !text.is_empty() {
                    return Ok(text.clone());
                }
            }
        }
    }

    match std::str::from_utf8(body) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Err(DecodeError::NotText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_decode_single_field() {
        let body = br#"{"response":"You are flying"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), "You are flying");
    }

    #[test]
    fn test_priority_order_wins_regardless_of_json_ordering() {
        let body = br#"{"message":"last","text":"first","reply":"middle"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), "first");

        let body = br#"{"content":"c","message":"m"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), "c");
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let body = br#"{"text":"","reply":"fallback"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), "fallback");
    }

    #[test]
    fn test_generic_probe_rescues_wrongly_typed_sibling() {
        // "text" as a number fails the strict struct decode; the generic
        // probe still finds the lower-priority string field.
        let body = br#"{"text":5,"reply":"still here"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), "still here");
    }

    #[test]
    fn test_unrecognized_object_falls_through_to_raw_text() {
        let body = br#"{"foo":"bar"}"#;
        assert_eq!(decode_analysis_text(body).unwrap(), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn test_plain_text_body_returned_verbatim() {
        let body = b"not json at all";
        assert_eq!(decode_analysis_text(body).unwrap(), "not json at all");
    }

    #[test]
    fn test_non_utf8_body_is_an_error() {
        let body = [0xff, 0xfe, 0x00, 0x01];
        assert!(matches!(
            decode_analysis_text(&body),
            Err(DecodeError::NotText)
        ));
    }

    #[test]
    fn test_envelope_output_text_priority() {
        let envelope = AnalysisEnvelope {
            reply: Some("r".to_string()),
            message: Some("m".to_string()),
            ..Default::default()
        };
        assert_eq!(envelope.output_text(), Some("r"));
    }
}
