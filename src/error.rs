use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;
use reqwest::header;
use serde_json::Value;

/// Message used when neither the venue nor the failure itself carries one.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Missing or invalid credentials/config, detected before any network call
    Configuration,
    /// Network-level failure reaching the venue (DNS, connection refused, timeout)
    Transport,
    /// Non-successful HTTP status returned by the venue
    Remote,
    /// Response body could not be decoded as expected
    Decode,
    /// Invalid caller input that is not part of the client configuration
    Validation,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn configuration<S: Into<String>>(reason: S) -> Self {
        Configuration {
            reason: reason.into(),
        }
        .into()
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Validation {
            reason: reason.into(),
        }
        .into()
    }

    pub fn remote<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        body: S,
    ) -> Self {
        Remote {
            status_code,
            method,
            path,
            body: body.into(),
        }
        .into()
    }

    /// Returns the [`NormalizedError`] view of this error, used when reporting the failure.
    #[must_use]
    pub fn normalize(&self) -> NormalizedError {
        NormalizedError::from(self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A non-2xx response from the venue. `body` holds the raw response text.
#[non_exhaustive]
#[derive(Debug)]
pub struct Remote {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl Remote {
    /// Parses `body` as JSON, if it is JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.body
        )
    }
}

impl StdError for Remote {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Configuration {
    pub reason: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.reason)
    }
}

impl StdError for Configuration {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

/// Uniform, log-friendly view of a failed call.
///
/// `message` is the most specific text available: a message supplied by the venue in the
/// response body, then the message of the failure itself, then [`UNKNOWN_ERROR`]. `status` is
/// set when the venue answered with a non-successful HTTP status.
///
/// This is only used for reporting; callers always receive the original [`Error`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub message: String,
    pub status: Option<u16>,
}

impl NormalizedError {
    /// Builds a [`NormalizedError`] from an optional response body and an optional raw failure
    /// message, in that order of precedence.
    #[must_use]
    pub fn from_parts(body: Option<&Value>, raw_message: Option<&str>, status: Option<u16>) -> Self {
        let message = body
            .and_then(body_message)
            .or_else(|| raw_message.filter(|m| !m.trim().is_empty()))
            .unwrap_or(UNKNOWN_ERROR)
            .to_owned();

        Self { message, status }
    }
}

impl From<&Error> for NormalizedError {
    fn from(error: &Error) -> Self {
        let raw_message = error.inner().map(ToString::to_string);

        match error.downcast_ref::<Remote>() {
            Some(remote) => Self::from_parts(
                remote.json().as_ref(),
                raw_message.as_deref(),
                Some(remote.status_code.as_u16()),
            ),
            None => Self::from_parts(None, raw_message.as_deref(), None),
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Venues report errors as `{"message": ..}`, `{"error": {"message": ..}}` or `{"error": ..}`.
fn body_message(body: &Value) -> Option<&str> {
    fn non_empty(value: &Value) -> Option<&str> {
        value.as_str().filter(|s| !s.trim().is_empty())
    }

    body.get("message")
        .and_then(non_empty)
        .or_else(|| body.pointer("/error/message").and_then(non_empty))
        .or_else(|| body.get("error").and_then(non_empty))
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_decode() {
            Kind::Decode
        } else if e.is_builder() {
            Kind::Internal
        } else {
            Kind::Transport
        };

        Error::with_source(kind, e)
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Decode, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<Configuration> for Error {
    fn from(err: Configuration) -> Self {
        Error::with_source(Kind::Configuration, err)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Remote> for Error {
    fn from(err: Remote) -> Self {
        Error::with_source(Kind::Remote, err)
    }
}
