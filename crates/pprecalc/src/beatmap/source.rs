use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::warn;

use crate::config::BeatmapConfig;
use crate::error::{Error, Result};

const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 5000;

/// Remote origin of `.osu` files.
pub trait MapSource: Send + Sync + 'static {
    /// Download the raw map description for `map_id`
    fn fetch(&self, map_id: u32) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Retry bookkeeping for one download
struct RetryState {
    attempt: u32,
    max_attempts: u32,
    backoff_ms: u64,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            backoff_ms: INITIAL_BACKOFF_MS,
        }
    }

    fn can_retry(&self) -> bool {
        self.attempt + 1 < self.max_attempts
    }

    fn increment(&mut self) {
        self.attempt += 1;
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }

    /// Get delay from Retry-After header or use backoff
    fn get_delay(&self, response: &Response) -> u64 {
        response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(self.backoff_ms)
    }

    async fn wait(&self, delay_ms: u64) {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Check if response requires retry and handle logging/waiting
async fn should_retry_response(response: &Response, state: &mut RetryState) -> bool {
    if !state.can_retry() {
        return false;
    }

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        let delay = if status == StatusCode::TOO_MANY_REQUESTS {
            state.get_delay(response)
        } else {
            state.backoff_ms
        };
        warn!(
            "Beatmap source returned {} (attempt {}/{}), retrying in {}ms",
            status,
            state.attempt + 1,
            state.max_attempts,
            delay
        );
        state.wait(delay).await;
        state.increment();
        return true;
    }

    false
}

/// Downloads maps over HTTP from `<source_url>/<map id>`
#[derive(Clone)]
pub struct HttpMapSource {
    client: Client,
    base_url: String,
    max_attempts: u32,
}

impl HttpMapSource {
    pub fn new(config: &BeatmapConfig) -> Result<Self> {
        let user_agent = format!(
            "pprecalc/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.source_url.trim_end_matches('/').to_string(),
            max_attempts: config.fetch_attempts.max(1),
        })
    }

    pub fn map_url(&self, map_id: u32) -> String {
        format!("{}/{}", self.base_url, map_id)
    }
}

impl MapSource for HttpMapSource {
    async fn fetch(&self, map_id: u32) -> Result<Vec<u8>> {
        let url = self.map_url(map_id);
        let mut state = RetryState::new(self.max_attempts);

        loop {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    if should_retry_response(&response, &mut state).await {
                        continue;
                    }
                    let response = response.error_for_status()?;
                    let body = response.bytes().await?;
                    if body.is_empty() {
                        return Err(Error::MapFetchFailed {
                            map_id,
                            message: "empty response body".into(),
                        });
                    }
                    return Ok(body.to_vec());
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && state.can_retry() => {
                    warn!(
                        "Connection error fetching beatmap {} (attempt {}/{}): {}, retrying in {}ms",
                        map_id,
                        state.attempt + 1,
                        state.max_attempts,
                        e,
                        state.backoff_ms
                    );
                    state.wait(state.backoff_ms).await;
                    state.increment();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_url() {
        let config = BeatmapConfig {
            source_url: "https://old.ppy.sh/osu/".into(),
            ..BeatmapConfig::default()
        };
        let source = HttpMapSource::new(&config).unwrap();
        assert_eq!(source.map_url(75), "https://old.ppy.sh/osu/75");
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let state = RetryState::new(1);
        assert!(!state.can_retry());
    }

    #[test]
    fn test_backoff_is_capped() {
        let mut state = RetryState::new(10);
        assert!(state.can_retry());
        for _ in 0..8 {
            state.increment();
        }
        assert_eq!(state.backoff_ms, MAX_BACKOFF_MS);
        state.increment();
        assert!(!state.can_retry());
    }
}
