//! Gate options and the denial policy they resolve to.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::gate::diagnostic::GateDiagnostic;

/// Custom denial handler.
///
/// Receives the same inputs as the chain entry point. The handler owns the
/// outcome: it may build its own response or still run the continuation.
pub type DenyHandler = Arc<dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Raw error code as supplied by the caller or a config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Malformed(toml::Value),
}

impl ErrorCode {
    /// The status this code names, if it is a known HTTP status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ErrorCode::Number(code) => u16::try_from(*code)
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|status| status.canonical_reason().is_some()),
            ErrorCode::Malformed(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(code) => write!(f, "{}", code),
            ErrorCode::Malformed(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        Self::Number(code)
    }
}

impl From<u16> for ErrorCode {
    fn from(code: u16) -> Self {
        Self::Number(i64::from(code))
    }
}

impl From<StatusCode> for ErrorCode {
    fn from(status: StatusCode) -> Self {
        Self::from(status.as_u16())
    }
}

/// Optional gate configuration.
#[derive(Clone, Default)]
pub struct GateOptions {
    /// Status to deny with when no callback is set.
    pub error_code: Option<ErrorCode>,
    /// Handler that replaces the default denial behaviour.
    pub callback: Option<DenyHandler>,
}

impl GateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Install an async denial handler.
    pub fn with_callback<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: DenyHandler =
            Arc::new(move |req: Request, next: Next| -> BoxFuture<'static, Response> {
                Box::pin(handler(req, next))
            });
        self.callback = Some(handler);
        self
    }
}

impl fmt::Debug for GateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateOptions")
            .field("error_code", &self.error_code)
            .field("callback", &self.callback.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// How a gate terminates a refused request.
#[derive(Clone)]
pub enum Denial {
    /// Hand the request to a custom handler.
    Handler(DenyHandler),
    /// Respond with a configured status.
    Status(StatusCode),
    /// Respond with 404.
    NotFound,
}

impl Denial {
    /// Resolve options into a denial policy.
    ///
    /// Options with neither a callback nor a known error code are discarded
    /// as a whole.
    pub fn resolve(options: Option<GateOptions>) -> (Self, Option<GateDiagnostic>) {
        let Some(options) = options else {
            return (Denial::NotFound, None);
        };

        if let Some(handler) = options.callback.clone() {
            return (Denial::Handler(handler), None);
        }

        match options.error_code.as_ref().and_then(ErrorCode::status) {
            Some(status) => (Denial::Status(status), None),
            None => {
                let diagnostic = GateDiagnostic::OptionsDiscarded {
                    options: format!("{:?}", options),
                };
                (Denial::NotFound, Some(diagnostic))
            }
        }
    }

    /// Terminate the request according to this policy.
    pub async fn apply(&self, req: Request, next: Next) -> Response {
        match self {
            Denial::Handler(handler) => handler(req, next).await,
            Denial::Status(status) => status.into_response(),
            Denial::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Status this policy responds with, if it is not handler-driven.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Denial::Handler(_) => None,
            Denial::Status(status) => Some(*status),
            Denial::NotFound => Some(StatusCode::NOT_FOUND),
        }
    }
}

impl fmt::Debug for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Handler(_) => f.write_str("Handler(<handler>)"),
            Denial::Status(status) => f.debug_tuple("Status").field(status).finish(),
            Denial::NotFound => f.write_str("NotFound"),
        }
    }
}
