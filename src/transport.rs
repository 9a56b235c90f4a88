//! HTTP GET of JSON bodies through an ordered list of fetch strategies.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::types::ApiResponse;

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, TransportError>> + 'a>>;

/// One mechanism for getting a JSON body from a URL.
pub trait FetchStrategy {
    fn name(&self) -> &'static str;

    fn fetch<'a>(&'a self, url: &'a str, timeout: Duration) -> FetchFuture<'a>;
}

/// Lets the client decode the body.
pub struct PrimaryFetch {
    http: Client,
}

impl PrimaryFetch {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl FetchStrategy for PrimaryFetch {
    fn name(&self) -> &'static str {
        "primary"
    }

    fn fetch<'a>(&'a self, url: &'a str, timeout: Duration) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .http
                .get(url)
                .timeout(timeout)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?;

            Ok(response.json::<Value>().await?)
        })
    }
}

/// Separate HTTP/1 client that checks the status and parses the body itself.
pub struct FallbackFetch {
    http: Client,
}

impl FallbackFetch {
    pub fn new() -> Self {
        let http = match Client::builder().http1_only().build() {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "cannot build HTTP/1 client, using the default client");
                Client::new()
            }
        };
        Self::with_client(http)
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl FetchStrategy for FallbackFetch {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn fetch<'a>(&'a self, url: &'a str, timeout: Duration) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .http
                .get(url)
                .timeout(timeout)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::HttpStatus {
                    code: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| TransportError::InvalidJson(e.to_string()))
        })
    }
}

pub struct Transport {
    strategies: Vec<Box<dyn FetchStrategy>>,
    timeout: Duration,
}

impl Transport {
    pub fn new(strategies: Vec<Box<dyn FetchStrategy>>, timeout: Duration) -> Self {
        Self {
            strategies,
            timeout,
        }
    }

    /// Primary fetch, then one fallback attempt; each attempt gets the given timeout.
    pub fn standard(timeout: Duration) -> Self {
        Self::new(
            vec![Box::new(PrimaryFetch::new()), Box::new(FallbackFetch::new())],
            timeout,
        )
    }

    /// Try each strategy in order; the first success wins, otherwise the last error is returned.
    pub async fn fetch_json(&self, url: &str) -> Result<ApiResponse, TransportError> {
        let mut last_error = TransportError::Network("no fetch strategy configured".to_string());

        for (attempt, strategy) in self.strategies.iter().enumerate() {
            debug!(url, strategy = strategy.name(), attempt, "fetching");
            match strategy.fetch(url, self.timeout).await {
                Ok(body) => return Ok(ApiResponse::from_json(body)),
                Err(err) => {
                    if attempt + 1 < self.strategies.len() {
                        warn!(url, strategy = strategy.name(), error = %err, "fetch failed, falling back");
                    }
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }
}


#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::testing::ScriptedFetch;
    use super::*;

    /// Canned reply for one connection; `None` reads the request and never answers.
    type Reply = Option<String>;

    fn reply(status: &str, body: &str) -> Reply {
        Some(format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
    }

    /// Serves one reply per accepted connection on a loopback port and returns the base URL.
    async fn serve(replies: Vec<Reply>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = vec![0u8; 4096];
                let _ = socket.read(&mut request).await;
                match reply {
                    Some(raw) => {
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    None => tokio::time::sleep(Duration::from_secs(60)).await,
                }
            }
        });
        format!("http://{addr}")
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn local_transport(timeout: Duration) -> Transport {
        Transport::new(
            vec![
                Box::new(PrimaryFetch::with_client(local_client())),
                Box::new(FallbackFetch::with_client(local_client())),
            ],
            timeout,
        )
    }

    const SHORT: Duration = Duration::from_millis(300);

    fn transport(strategies: &[Rc<ScriptedFetch>]) -> Transport {
        Transport::new(
            strategies
                .iter()
                .map(|s| Box::new(Rc::clone(s)) as Box<dyn FetchStrategy>)
                .collect(),
            Duration::from_millis(10_000),
        )
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = Rc::new(ScriptedFetch::new(vec![Ok(json!({"status": "ok"}))]));
        let fallback = Rc::new(ScriptedFetch::new(vec![]));
        let response = transport(&[primary.clone(), fallback.clone()])
            .fetch_json("http://h/health")
            .await
            .unwrap();

        assert_eq!(response.status.as_deref(), Some("ok"));
        assert_eq!(primary.calls.get(), 1);
        assert_eq!(fallback.calls.get(), 0);
    }

    #[tokio::test]
    async fn falls_back_once_with_timeout() {
        let primary = Rc::new(ScriptedFetch::new(vec![Err(TransportError::HttpStatus {
            code: 503,
            reason: "Service Unavailable".into(),
        })]));
        let fallback = Rc::new(ScriptedFetch::new(vec![Ok(json!({"status": "success"}))]));
        let response = transport(&[primary.clone(), fallback.clone()])
            .fetch_json("http://h/api/users")
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(fallback.calls.get(), 1);
        assert_eq!(fallback.last_timeout.get(), Some(Duration::from_millis(10_000)));
    }

    #[tokio::test]
    async fn reports_last_strategy_error() {
        let primary = Rc::new(ScriptedFetch::new(vec![Err(TransportError::Network(
            "refused".into(),
        ))]));
        let fallback = Rc::new(ScriptedFetch::new(vec![Err(TransportError::Timeout)]));
        let err = transport(&[primary.clone(), fallback.clone()])
            .fetch_json("http://h/api/users")
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::Timeout);
        assert_eq!(primary.calls.get(), 1);
        assert_eq!(fallback.calls.get(), 1);
    }

    #[tokio::test]
    async fn empty_strategy_list_is_a_network_error() {
        let err = transport(&[]).fetch_json("http://h/").await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 on loopback has no listener in test environments.
        let err = Transport::standard(Duration::from_millis(2_000))
            .fetch_json("http://127.0.0.1:9/api/users")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_status_maps_to_http_status() {
        for strategy in [
            Box::new(PrimaryFetch::with_client(local_client())) as Box<dyn FetchStrategy>,
            Box::new(FallbackFetch::with_client(local_client())),
        ] {
            let base = serve(vec![reply("500 Internal Server Error", r#"{"status":"error"}"#)]).await;
            let err = strategy
                .fetch(&format!("{base}/api/users"), SHORT)
                .await
                .unwrap_err();
            assert!(
                matches!(err, TransportError::HttpStatus { code: 500, .. }),
                "{}: {err:?}",
                strategy.name()
            );
        }
    }

    #[tokio::test]
    async fn non_json_body_maps_to_invalid_json() {
        for strategy in [
            Box::new(PrimaryFetch::with_client(local_client())) as Box<dyn FetchStrategy>,
            Box::new(FallbackFetch::with_client(local_client())),
        ] {
            let base = serve(vec![reply("200 OK", "<html>oops</html>")]).await;
            let err = strategy
                .fetch(&format!("{base}/api/users"), SHORT)
                .await
                .unwrap_err();
            assert!(
                matches!(err, TransportError::InvalidJson(_)),
                "{}: {err:?}",
                strategy.name()
            );
        }
    }

    #[tokio::test]
    async fn silent_server_times_out_on_both_strategies() {
        let base = serve(vec![None, None]).await;
        let err = local_transport(SHORT)
            .fetch_json(&format!("{base}/api/users"))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Timeout);
    }

    #[tokio::test]
    async fn fallback_recovers_after_primary_status_error() {
        let base = serve(vec![
            reply("503 Service Unavailable", ""),
            reply("200 OK", r#"{"status":"ok"}"#),
        ])
        .await;
        let response = local_transport(SHORT)
            .fetch_json(&format!("{base}/health"))
            .await
            .unwrap();
        assert_eq!(response.status.as_deref(), Some("ok"));
    }
}
