use std::time::Duration;

use ai_orchestrator_model::ErrorKind;
use backoff::ExponentialBackoffBuilder;
use backoff::future::retry_notify;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::Error;
use crate::proto::ApiErrorBody;

type Attempt<T> = Result<T, backoff::Error<Error>>;

/// Sends the request built by `make_request` and decodes the JSON body.
///
/// Connection failures, timeouts, `429` and `5xx` replies are retried with
/// exponential backoff until `max_elapsed` runs out. The builder is invoked
/// once per attempt, since multipart bodies cannot be cloned. A builder
/// failure is permanent.
pub async fn send_with_retry<T, F>(
    make_request: F,
    max_elapsed: Duration,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    F: Fn() -> Result<RequestBuilder, Error>,
{
    if max_elapsed.is_zero() {
        return send_once(make_request()?).await.map_err(|err| match err {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        });
    }

    let backoff = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(max_elapsed))
        .build();
    retry_notify(
        backoff,
        || {
            let req = make_request();
            async move {
                send_once(req.map_err(backoff::Error::permanent)?).await
            }
        },
        |err: Error, after: Duration| {
            warn!("transient failure ({err}), retrying in {after:?}");
        },
    )
    .await
}

async fn send_once<T: DeserializeOwned>(req: RequestBuilder) -> Attempt<T> {
    let resp = req.send().await.map_err(|err| {
        let transient = err.is_timeout() || err.is_connect();
        let err =
            Error::new(format!("request failed: {err}"), ErrorKind::Other);
        if transient {
            backoff::Error::transient(err)
        } else {
            backoff::Error::permanent(err)
        }
    })?;

    let status = resp.status();
    let body = resp.bytes().await.map_err(|err| {
        backoff::Error::transient(Error::new(
            format!("failed to read response body: {err}"),
            ErrorKind::Other,
        ))
    })?;

    // Some endpoints report errors with a `200` status, so the error object
    // is checked regardless of the status code.
    let api_error = serde_json::from_slice::<ApiErrorBody>(&body).ok();

    if !status.is_success() {
        let (message, kind) = match api_error {
            Some(body) => (
                body.error
                    .message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_owned()),
                body.error.kind(),
            ),
            None => (format!("HTTP status {status}"), ErrorKind::Other),
        };
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ErrorKind::RateLimitExceeded
        } else {
            kind
        };
        let err = Error::new(format!("API error ({status}): {message}"), kind);
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        {
            return Err(backoff::Error::transient(err));
        }
        return Err(backoff::Error::permanent(err));
    }

    if let Some(body) = api_error {
        let kind = body.error.kind();
        let message = body
            .error
            .message
            .unwrap_or_else(|| "Unknown error".to_owned());
        return Err(backoff::Error::permanent(Error::new(
            format!("API error: {message}"),
            kind,
        )));
    }

    serde_json::from_slice(&body).map_err(|err| {
        backoff::Error::permanent(Error::new(
            format!("invalid response body: {err}"),
            ErrorKind::MalformedResponse,
        ))
    })
}
