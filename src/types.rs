//! Core data types shared across the client
//!
//! Wire types for the debugging service and small UI value types.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A temporary UI message shown to the user (e.g. success/error notifications)
#[derive(Clone)]
pub struct FlashMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

impl FlashMessage {
    pub fn new(text: String, is_error: bool) -> Self {
        Self {
            text,
            is_error,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, seconds: u64) -> bool {
        self.created.elapsed().as_secs() >= seconds
    }
}

/// Submission intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Structured breakdown: reason, line, explanation, fix, example
    #[default]
    Full,
    /// A short nudge without the corrected code
    Hint,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Hint => "hint",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Full => "Full solution",
            Mode::Hint => "Hint only",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Mode::Full => Mode::Hint,
            Mode::Hint => Mode::Full,
        }
    }
}

/// Body of `POST /debug/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugRequest {
    pub code: String,
    pub error: String,
    pub mode: Mode,
}

/// Answer of `POST /debug/`.
/// Fields are optional on the wire; `mode` is kept as a string because the
/// service may echo anything back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DebugResponse {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Service-side classification of the error message (e.g. "IndexError")
    #[serde(default)]
    pub error_type: Option<String>,
}

impl DebugResponse {
    pub fn is_hint(&self) -> bool {
        self.mode.as_deref() == Some("hint")
    }

    /// Text for the full view: a non-empty `error` wins over `result`.
    pub fn full_text(&self) -> Option<&str> {
        match self.error.as_deref() {
            Some(e) if !e.is_empty() => Some(e),
            _ => self.result.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_lowercase_mode() {
        let req = DebugRequest {
            code: "print(x)".into(),
            error: "NameError".into(),
            mode: Mode::Hint,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mode"], "hint");
        assert_eq!(json["code"], "print(x)");
        assert_eq!(json["error"], "NameError");
    }

    #[test]
    fn test_response_tolerates_missing_and_extra_fields() {
        let resp: DebugResponse =
            serde_json::from_str(r#"{"result": "ok", "error_type": "KeyError", "extra": 1}"#)
                .unwrap();
        assert_eq!(resp.mode, None);
        assert_eq!(resp.result.as_deref(), Some("ok"));
        assert_eq!(resp.error_type.as_deref(), Some("KeyError"));
        assert!(!resp.is_hint());
    }

    #[test]
    fn test_full_text_prefers_non_empty_error() {
        let mut resp = DebugResponse {
            result: Some("result".into()),
            error: Some("boom".into()),
            ..Default::default()
        };
        assert_eq!(resp.full_text(), Some("boom"));
        resp.error = Some(String::new());
        assert_eq!(resp.full_text(), Some("result"));
        resp.error = None;
        resp.result = None;
        assert_eq!(resp.full_text(), None);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::Full.toggle(), Mode::Hint);
        assert_eq!(Mode::Full.toggle().toggle(), Mode::Full);
        assert_eq!(Mode::default(), Mode::Full);
    }

    #[test]
    fn test_flash_message_expiry() {
        let msg = FlashMessage::new("Copied!".into(), false);
        assert!(!msg.is_expired(3));
        assert_eq!(msg.text, "Copied!");
        assert!(!msg.is_error);
    }
}
