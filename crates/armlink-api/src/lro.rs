// Long-running operation polling.
//
// ARM answers slow mutations with 201/202 and an `Azure-AsyncOperation` or
// `Location` header. The operation URL is polled until it reports a terminal
// status or the deadline passes.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::client::{ArmClient, parse_body};
use crate::Error;

const ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Interval and deadline for long-running operation polling.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            deadline: Duration::from_secs(30 * 60),
        }
    }
}

/// The operation URL a mutating response asks us to follow, if any.
pub(crate) fn operation_url(headers: &HeaderMap) -> Option<String> {
    [ASYNC_OPERATION, reqwest::header::LOCATION.as_str()]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|v| v.to_str().ok())
        .find(|v| !v.is_empty())
        .map(str::to_owned)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Outcome of one poll.
enum PollState {
    Pending(Option<Duration>),
    Done(Value),
}

impl ArmClient {
    /// Poll an operation URL until it settles.
    ///
    /// `Succeeded` yields `properties.output` when present, otherwise the
    /// status document. A document without `status` is itself the result.
    pub(crate) async fn wait_operation(
        &self,
        operation: &str,
        location: &str,
        api_version: &str,
    ) -> Result<Value, Error> {
        let mut url = Url::parse(location)?;
        if !url.query_pairs().any(|(k, _)| k == "api-version") {
            url.query_pairs_mut().append_pair("api-version", api_version);
        }

        let poll = self.poll_config().clone();
        let started = Instant::now();

        loop {
            match self.poll_once(operation, url.clone()).await? {
                PollState::Done(value) => return Ok(value),
                PollState::Pending(hint) => {
                    let elapsed = started.elapsed();
                    if elapsed >= poll.deadline {
                        return Err(Error::Timeout {
                            operation: operation.to_owned(),
                            timeout_secs: poll.deadline.as_secs(),
                        });
                    }
                    let wait = hint.unwrap_or(poll.interval).min(poll.deadline - elapsed);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    async fn poll_once(&self, operation: &str, url: Url) -> Result<PollState, Error> {
        debug!("GET {url}");
        let resp = self.http().get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Arm {
                status: status.as_u16(),
                code: serde_json::from_str::<crate::types::ErrorResponse>(&body)
                    .ok()
                    .and_then(|e| e.code().map(str::to_owned)),
                message: format!("polling {operation} failed"),
                body,
            });
        }

        let hint = retry_after(resp.headers());
        if status == reqwest::StatusCode::ACCEPTED {
            return Ok(PollState::Pending(hint));
        }

        let body = parse_body(resp.text().await?)?;
        if body.is_null() {
            return Ok(PollState::Pending(hint));
        }

        let Some(state) = body.get("status").and_then(Value::as_str) else {
            return Ok(PollState::Done(body));
        };
        match state {
            "InProgress" | "Running" | "Accepted" => {
                debug!("{operation} InProgress");
                Ok(PollState::Pending(hint))
            }
            "Succeeded" => {
                debug!("{operation} Succeeded");
                let output = body
                    .pointer("/properties/output")
                    .filter(|v| !v.is_null())
                    .cloned();
                Ok(PollState::Done(output.unwrap_or(body)))
            }
            "Failed" | "Canceled" => Err(Error::OperationFailed {
                operation: operation.to_owned(),
                message: body
                    .pointer("/error/message")
                    .and_then(Value::as_str)
                    .unwrap_or(state)
                    .to_owned(),
            }),
            other => Err(Error::OperationFailed {
                operation: operation.to_owned(),
                message: format!("unknown status {other}"),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn async_operation_header_wins_over_location() {
        let mut headers = HeaderMap::new();
        headers.insert("location", HeaderValue::from_static("https://a/loc"));
        headers.insert(ASYNC_OPERATION, HeaderValue::from_static("https://a/op"));
        assert_eq!(operation_url(&headers).as_deref(), Some("https://a/op"));

        headers.remove(ASYNC_OPERATION);
        assert_eq!(operation_url(&headers).as_deref(), Some("https://a/loc"));
        assert_eq!(operation_url(&HeaderMap::new()), None);
    }

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(3)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }
}
