//! Live password samples over HTTP.
//!
//! [`HttpSource`] issues `count` GET requests against the generator endpoint,
//! at most `workers` at a time. Each response body is one password. Results
//! are funnelled through a channel to a single collector that gives up once
//! no result has arrived for `collect_timeout`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use dinocrack_core::{FetchConfig, FetchOutcome, PasswordSource};

const USER_AGENT: &str = concat!("dinocrack/", env!("CARGO_PKG_VERSION"));

/// Log collection progress every this many results.
const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("empty response body")]
    EmptyBody,
}

/// Password source backed by an HTTP endpoint returning one password per
/// request as plain text.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    workers: usize,
    request_timeout: Duration,
    collect_timeout: Duration,
}

impl HttpSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            workers: config.workers.max(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            collect_timeout: Duration::from_secs(config.collect_timeout_secs),
        })
    }

    /// Override both timeouts, mostly useful below one second.
    pub fn with_timeouts(mut self, request: Duration, collect: Duration) -> Self {
        self.request_timeout = request;
        self.collect_timeout = collect;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch a single password.
    pub async fn fetch_one(&self) -> Result<String, FetchError> {
        request_password(&self.client, &self.url, self.request_timeout).await
    }

    /// Fetch up to `count` passwords concurrently.
    ///
    /// Failed requests are counted, not propagated. Requests still in flight
    /// when collection times out are aborted.
    pub async fn fetch_batch(&self, count: usize) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        if count == 0 {
            return outcome;
        }

        let (tx, rx) = async_channel::bounded(count);
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for _ in 0..count {
            let client = self.client.clone();
            let url = self.url.clone();
            let timeout = self.request_timeout;
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = request_password(&client, &url, timeout).await;
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut received = 0;
        while received < count {
            match tokio::time::timeout(self.collect_timeout, rx.recv()).await {
                Ok(Ok(Ok(password))) => outcome.passwords.push(password),
                Ok(Ok(Err(e))) => {
                    tracing::warn!(error = %e, url = %self.url, "password request failed");
                    outcome.failed += 1;
                }
                // All senders gone
                Ok(Err(_)) => break,
                Err(_) => {
                    tracing::warn!(
                        received,
                        expected = count,
                        timeout_secs = self.collect_timeout.as_secs_f64(),
                        "timed out waiting for passwords"
                    );
                    outcome.timed_out = true;
                    break;
                }
            }

            received += 1;
            if received % PROGRESS_EVERY == 0 {
                tracing::info!(received, expected = count, "fetching passwords");
            }
        }

        tasks.abort_all();
        tracing::debug!(
            fetched = outcome.passwords.len(),
            failed = outcome.failed,
            timed_out = outcome.timed_out,
            "fetch round finished"
        );
        outcome
    }
}

impl PasswordSource for HttpSource {
    fn fetch(&self, count: usize) -> impl Future<Output = FetchOutcome> + Send {
        self.fetch_batch(count)
    }
}

async fn request_password(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let resp = client.get(url).timeout(timeout).send().await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }

    let body = resp.text().await?;
    let password = body.trim();
    if password.is_empty() {
        return Err(FetchError::EmptyBody);
    }
    Ok(password.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_config() {
        let config = FetchConfig {
            workers: 0,
            ..FetchConfig::default()
        };
        let source = HttpSource::new(&config).unwrap();
        assert_eq!(source.workers, 1);
        assert_eq!(source.url(), dinocrack_core::DEFAULT_URL);
        assert_eq!(source.request_timeout, Duration::from_secs(5));
        assert_eq!(source.collect_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_zero_count_makes_no_requests() {
        let config = FetchConfig {
            url: "http://127.0.0.1:9/unused".into(),
            ..FetchConfig::default()
        };
        let outcome = HttpSource::new(&config).unwrap().fetch_batch(0).await;
        assert_eq!(outcome, FetchOutcome::default());
    }
}
