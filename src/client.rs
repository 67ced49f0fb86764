//! HTTP transport for the debugging service
//!
//! All calls are blocking: ALWAYS run in a background thread!
//! Uses `ureq`; the optional request timeout comes from the config.

use crate::config::Config;
use crate::error::DebugError;
use crate::types::{DebugRequest, DebugResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Mutex;
use std::time::Duration;

/// Anything that can carry a request to the service and bring back its answer.
pub trait DebugTransport: Send + Sync {
    fn send(&self, request: &DebugRequest) -> Result<DebugResponse, DebugError>;
}

/// Anti-forgery token as sent with each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrfToken {
    /// Value of the `X-CSRFToken` header
    pub header: String,
    /// Value of the `csrftoken` cookie, when the token was discovered
    pub cookie: Option<String>,
}

static FORM_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<input[^>]*name=["']csrfmiddlewaretoken["'][^>]*>"#).expect("valid regex")
});
static INPUT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"value=["']([^"']*)["']"#).expect("valid regex"));
static COOKIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*csrftoken=([^;]*)").expect("valid regex"));

/// Token from the hidden `csrfmiddlewaretoken` form field of a page
pub fn extract_form_token(html: &str) -> Option<String> {
    let input = FORM_INPUT.find(html)?;
    INPUT_VALUE
        .captures(input.as_str())
        .map(|c| c[1].to_string())
        .filter(|t| !t.is_empty())
}

/// Token from a `Set-Cookie` header value
pub fn extract_cookie_token(set_cookie: &str) -> Option<String> {
    COOKIE
        .captures(set_cookie)
        .map(|c| c[1].to_string())
        .filter(|t| !t.is_empty())
}

pub struct HttpTransport {
    agent: ureq::Agent,
    debug_url: String,
    page_url: String,
    configured_token: Option<String>,
    discovered: Mutex<Option<CsrfToken>>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            agent: builder.build(),
            debug_url: config.debug_url(),
            page_url: config.page_url(),
            configured_token: config.csrf_token.clone().filter(|_| config.has_csrf_token()),
            discovered: Mutex::new(None),
        }
    }

    /// Configured token, or one discovered from the service's page.
    /// Discovery happens once; a failed discovery is retried next time.
    pub fn csrf_token(&self) -> CsrfToken {
        if let Some(token) = &self.configured_token {
            return CsrfToken {
                header: token.clone(),
                cookie: None,
            };
        }

        let mut cached = match self.discovered.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(token) = cached.as_ref() {
            return token.clone();
        }

        match self.discover_token() {
            Some(token) => {
                tracing::debug!("discovered csrf token (cookie: {})", token.cookie.is_some());
                *cached = Some(token.clone());
                token
            }
            None => {
                tracing::warn!("no csrf token found at {}", self.page_url);
                CsrfToken::default()
            }
        }
    }

    fn discover_token(&self) -> Option<CsrfToken> {
        let resp = match self.agent.get(&self.page_url).call() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("csrf discovery failed: {}", e);
                return None;
            }
        };

        let cookie = resp
            .all("set-cookie")
            .into_iter()
            .find_map(extract_cookie_token);
        let form = resp
            .into_string()
            .ok()
            .and_then(|body| extract_form_token(&body));

        match (form, cookie) {
            (Some(header), cookie) => Some(CsrfToken { header, cookie }),
            (None, Some(cookie)) => Some(CsrfToken {
                header: cookie.clone(),
                cookie: Some(cookie),
            }),
            (None, None) => None,
        }
    }
}

impl DebugTransport for HttpTransport {
    fn send(&self, request: &DebugRequest) -> Result<DebugResponse, DebugError> {
        let token = self.csrf_token();
        let body =
            serde_json::to_string(request).map_err(|e| DebugError::InvalidJson(e.to_string()))?;

        let mut req = self
            .agent
            .post(&self.debug_url)
            .set("Content-Type", "application/json")
            .set("X-CSRFToken", &token.header);
        if let Some(cookie) = &token.cookie {
            req = req.set("Cookie", &format!("csrftoken={}", cookie));
        }

        tracing::info!(
            "POST {} (mode={}, {} chars of code)",
            self.debug_url,
            request.mode.as_str(),
            request.code.chars().count()
        );

        match req.send_string(&body) {
            Ok(resp) => read_response(resp),
            // A JSON error body is still an answer worth rendering
            Err(ureq::Error::Status(code, resp)) => {
                tracing::warn!("service answered with status {}", code);
                read_response(resp)
            }
            Err(ureq::Error::Transport(e)) => Err(DebugError::Network(e.to_string())),
        }
    }
}

fn read_response(resp: ureq::Response) -> Result<DebugResponse, DebugError> {
    let text = resp
        .into_string()
        .map_err(|e| DebugError::Network(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| DebugError::InvalidJson(e.to_string()))
}
