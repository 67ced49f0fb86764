//! Submission flow: validate, send in the background, route the answer
//!
//! The request runs on its own thread and reports through a channel that
//! the event loop polls, so the UI keeps drawing while the service thinks.
//! A new submission replaces the pending one; the older answer is dropped.

use crate::client::DebugTransport;
use crate::error::DebugError;
use crate::types::{DebugRequest, DebugResponse, Mode};
use crate::view::ViewModel;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

type Outcome = Result<DebugResponse, DebugError>;

/// Build the request, rejecting blank code.
pub fn prepare(code: &str, error: &str, mode: Mode) -> Result<DebugRequest, DebugError> {
    if code.trim().is_empty() {
        return Err(DebugError::BlankCode);
    }
    Ok(DebugRequest {
        code: code.to_string(),
        error: error.to_string(),
        mode,
    })
}

/// Hand a response to the right panel.
/// `mode == "hint"` shows `result` verbatim; anything else goes through the
/// parser, preferring a non-empty `error` over `result`.
pub fn route(response: &DebugResponse, view: &mut ViewModel) -> Result<(), DebugError> {
    if response.is_hint() {
        let text = response
            .result
            .as_deref()
            .ok_or(DebugError::MalformedResponse)?;
        view.show_hint_only(text);
        tracing::info!("rendered hint ({} chars)", text.chars().count());
    } else {
        let text = response.full_text().ok_or(DebugError::MalformedResponse)?;
        view.show_full_output(text);
        view.error_type = response.error_type.clone().filter(|t| !t.is_empty());
        tracing::info!("rendered full output ({} chars)", text.chars().count());
    }
    Ok(())
}

pub struct Submission {
    transport: Arc<dyn DebugTransport>,
    rx: Option<mpsc::Receiver<Outcome>>,
    started: Option<Instant>,
}

impl Submission {
    pub fn new(transport: Arc<dyn DebugTransport>) -> Self {
        Self {
            transport,
            rx: None,
            started: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.rx.is_some()
    }

    /// Time since the pending request was sent
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|t| t.elapsed())
    }

    /// Validate and kick off the request in a background thread (non-blocking).
    pub fn submit(&mut self, code: &str, error: &str, mode: Mode) -> Result<(), DebugError> {
        let request = prepare(code, error, mode)?;
        if self.in_flight() {
            tracing::info!("superseding pending submission");
        }

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.started = Some(Instant::now());

        let transport = Arc::clone(&self.transport);
        std::thread::spawn(move || {
            let outcome = transport.send(&request);
            // Receiver is gone when a newer submission replaced this one
            let _ = tx.send(outcome);
        });
        Ok(())
    }

    /// Poll for the pending answer. Called from the event loop (non-blocking).
    pub fn poll(&mut self) -> Option<Outcome> {
        let rx = self.rx.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(DebugError::Network("request thread crashed".into()))
            }
        };
        self.rx = None;
        self.started = None;
        Some(outcome)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ThemeMode;
    use crate::parser::{Section, PLACEHOLDER};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport answering every request with the same canned outcome
    pub struct CannedTransport {
        pub calls: AtomicUsize,
        pub last: Mutex<Option<DebugRequest>>,
        answer: fn() -> Outcome,
    }

    impl CannedTransport {
        pub fn new(answer: fn() -> Outcome) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                answer,
            })
        }
    }

    impl DebugTransport for CannedTransport {
        fn send(&self, request: &DebugRequest) -> Outcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            (self.answer)()
        }
    }

    pub fn wait_for(submission: &mut Submission) -> Outcome {
        for _ in 0..200 {
            if let Some(outcome) = submission.poll() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("submission never completed");
    }

    pub fn full_answer() -> Outcome {
        Ok(DebugResponse {
            mode: Some("full".into()),
            result: Some("ERROR_REASON: off by one".into()),
            error: None,
            error_type: Some("IndexError".into()),
        })
    }

    #[test]
    fn test_blank_code_never_sends() {
        let transport = CannedTransport::new(full_answer);
        let mut submission = Submission::new(transport.clone());
        for code in ["", "   ", "\n\t\n"] {
            let err = submission.submit(code, "", Mode::Full).unwrap_err();
            assert!(matches!(err, DebugError::BlankCode));
        }
        assert!(!submission.in_flight());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_submit_sends_request_and_delivers_answer() {
        let transport = CannedTransport::new(full_answer);
        let mut submission = Submission::new(transport.clone());
        submission.submit("print(x)", "NameError", Mode::Hint).unwrap();
        assert!(submission.in_flight());
        assert!(submission.elapsed().is_some());

        let resp = wait_for(&mut submission).unwrap();
        assert_eq!(resp.error_type.as_deref(), Some("IndexError"));
        assert!(!submission.in_flight());
        assert_eq!(submission.elapsed(), None);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let sent = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.code, "print(x)");
        assert_eq!(sent.error, "NameError");
        assert_eq!(sent.mode, Mode::Hint);
    }

    #[test]
    fn test_route_hint() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        let resp = DebugResponse {
            mode: Some("hint".into()),
            result: Some("Check the index".into()),
            ..Default::default()
        };
        route(&resp, &mut vm).unwrap();
        assert!(vm.hint_visible());
        assert_eq!(vm.hint_text, "Check the index");
    }

    #[test]
    fn test_route_full_prefers_error() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        let resp = DebugResponse {
            mode: Some("full".into()),
            result: Some("ERROR_REASON: from result".into()),
            error: Some("ERROR_REASON: from error".into()),
            error_type: Some("TypeError".into()),
        };
        route(&resp, &mut vm).unwrap();
        assert!(vm.full_visible());
        assert_eq!(vm.field(Section::ErrorReason), "from error");
        assert_eq!(vm.error_type.as_deref(), Some("TypeError"));
    }

    #[test]
    fn test_route_unknown_mode_goes_full() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_hint_only("old hint");
        let resp = DebugResponse {
            result: Some("no structure at all".into()),
            ..Default::default()
        };
        route(&resp, &mut vm).unwrap();
        assert!(vm.full_visible());
        assert!(vm.all_fields_placeholder());
        assert_eq!(vm.field(Section::Example), PLACEHOLDER);
    }

    #[test]
    fn test_route_malformed_leaves_view_unchanged() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_hint_only("keep me");
        for resp in [
            DebugResponse::default(),
            DebugResponse {
                mode: Some("hint".into()),
                ..Default::default()
            },
        ] {
            let err = route(&resp, &mut vm).unwrap_err();
            assert!(err.is_transport());
            assert!(vm.hint_visible());
            assert_eq!(vm.hint_text, "keep me");
        }
    }
}
