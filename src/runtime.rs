//! The contract this crate consumes from the hosting agent runtime.

use async_trait::async_trait;

/// Settings lookup and log sink supplied by the agent runtime.
///
/// The client reports every failed venue call through [`Runtime::log`] before returning the
/// error, and the quote cache reports its own (non-fatal) failures the same way. Messages never
/// contain credentials.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Returns the setting stored under `key`, e.g. `convergence.apiKey`.
    fn setting(&self, key: &str) -> Option<String>;

    async fn log(&self, message: &str);
}
