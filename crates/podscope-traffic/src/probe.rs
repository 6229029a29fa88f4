//! A single GET against the backend.
//!
//! The request runs under two limits: its own timeout and the deadline of
//! the cycle it belongs to. Whichever comes first aborts it.
//!
//! Only plain `http://` backends are supported. Any other scheme fails as an
//! invalid URL before a connection is attempted.

use std::error::Error as StdError;
use std::time::Duration;

use bytes::Bytes;
use http::uri::Scheme;
use http::{Method, Request, Uri, header};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

/// HTTP client shared by every request of the generator.
pub type HttpClient = Client<HttpConnector, Empty<Bytes>>;

const USER_AGENT: &str = concat!("podscope-traffic/", env!("CARGO_PKG_VERSION"));

/// Build the generator's HTTP client.
pub fn http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build_http()
}

/// Why a request produced no response.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("cycle deadline exceeded")]
    DeadlineExceeded,
}

/// Issue `GET url` and return the response status.
///
/// The body is read to the end before returning, so the connection can be
/// reused and the timing covers the whole exchange.
pub async fn get(
    client: &HttpClient,
    url: &str,
    timeout: Duration,
    deadline: Instant,
) -> Result<http::StatusCode, RequestError> {
    let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| RequestError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if uri.scheme() != Some(&Scheme::HTTP) {
        return Err(RequestError::InvalidUrl {
            url: url.to_string(),
            reason: "only http:// URLs are supported".to_string(),
        });
    }

    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::USER_AGENT, USER_AGENT)
        .body(Empty::<Bytes>::new())
        .map_err(|e| RequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if Instant::now() >= deadline {
        return Err(RequestError::DeadlineExceeded);
    }

    let exchange = async {
        let resp = client
            .request(req)
            .await
            .map_err(|e| RequestError::Transport(error_chain(&e)))?;
        let status = resp.status();
        resp.into_body()
            .collect()
            .await
            .map_err(|e| RequestError::Transport(error_chain(&e)))?;
        Ok(status)
    };

    match tokio::time::timeout_at(deadline, tokio::time::timeout(timeout, exchange)).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => {
            debug!(%url, "request timed out");
            Err(RequestError::Timeout(timeout))
        }
        Err(_) => {
            debug!(%url, "cycle deadline hit mid-request");
            Err(RequestError::DeadlineExceeded)
        }
    }
}

/// Render an error with its sources, `outer: inner: root`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
