//! HTTP retry for the live feed clients.
//!
//! Feed requests go through [`send_json`] rather than calling
//! `reqwest::RequestBuilder::send()` directly, so that connection
//! failures, timeouts, HTTP 429 and HTTP 5xx are retried with exponential
//! backoff. Other 4xx responses are permanent and returned immediately.
//!
//! ```ignore
//! let body = retry::send_json(|| client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::FeedError;

/// Retry attempts after the first request.
///
/// Feeds back interactive dashboard requests, so retries stay short:
/// 500ms, 1s, 2s, for 3.5s of total backoff.
const MAX_RETRIES: u32 = 3;

/// Backoff before the first retry; doubles on each attempt.
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Maximum length of the response body included in errors and logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends the request built by `build_request` and parses the body as JSON.
///
/// `build_request` is called once per attempt since builders are consumed
/// by `.send()`.
///
/// # Errors
///
/// Returns [`FeedError::Http`] if the request cannot be sent after all
/// retries, [`FeedError::Upstream`] for a non-success status, or
/// [`FeedError::Json`] if the body is not valid JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, FeedError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request, MAX_RETRIES).await?;
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        log::warn!(
            "Feed returned invalid JSON ({e}), {} bytes: {}",
            text.len(),
            preview(&text)
        );
        FeedError::Json(e)
    })
}

#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, FeedError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    attempt += 1;
                    continue;
                }
                return Err(FeedError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) && attempt < max_retries {
                    log::warn!("  HTTP {status} from {}", response.url().path());
                    attempt += 1;
                    continue;
                }

                if status.is_client_error() || status.is_server_error() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(FeedError::Upstream {
                        status: status.as_u16(),
                        message: preview(&body).to_string(),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based).
fn backoff(attempt: u32) -> Duration {
    BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// 429 and 5xx are worth retrying; every other status is final.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
