//! Where sample passwords come from.

use std::future::Future;

/// Result of one fetch round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub passwords: Vec<String>,
    /// Requests that errored or returned an unusable response.
    pub failed: usize,
    /// Collection stopped early because no result arrived in time.
    pub timed_out: bool,
}

impl FetchOutcome {
    pub fn from_passwords(passwords: Vec<String>) -> Self {
        Self {
            passwords,
            ..Self::default()
        }
    }
}

/// A producer of sample passwords, usually the live generator over HTTP.
///
/// Implementations tolerate individual failures and report them in
/// [`FetchOutcome::failed`] rather than erroring out the whole round.
pub trait PasswordSource: Send + Sync {
    fn fetch(&self, count: usize) -> impl Future<Output = FetchOutcome> + Send;
}
