//! User-facing error taxonomy
//!
//! Every action that can fail in front of the user maps onto one of three
//! families: validation (nothing was sent), transport (the service could not
//! be reached or answered garbage) and capability (the host lacks a speech
//! or clipboard program). None of them are fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebugError {
    // ── validation ──
    #[error("code is blank")]
    BlankCode,

    #[error("nothing to read")]
    NothingToRead,

    #[error("nothing to copy")]
    NothingToCopy,

    // ── transport ──
    #[error("network error: {0}")]
    Network(String),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response carries neither result nor error")]
    MalformedResponse,

    // ── capability ──
    #[error("no text-to-speech program available")]
    SpeechUnavailable,

    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

impl DebugError {
    /// The exact notice shown to the user for this failure.
    /// Transport errors collapse into one generic message; details are logged.
    pub fn notice(&self) -> &'static str {
        match self {
            DebugError::BlankCode => "Please enter some code",
            DebugError::NothingToRead => "Nothing to read yet",
            DebugError::NothingToCopy => "Nothing to copy!",
            DebugError::Network(_) | DebugError::InvalidJson(_) | DebugError::MalformedResponse => {
                "Something went wrong"
            }
            DebugError::SpeechUnavailable => "Text-to-Speech not supported",
            DebugError::ClipboardUnavailable(_) => "Copy failed. No clipboard tool available.",
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DebugError::Network(_) | DebugError::InvalidJson(_) | DebugError::MalformedResponse
        )
    }
}
