#[cfg(feature = "http")]
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
#[cfg(feature = "http")]
use tracing::debug;
use ws_api_types::{WALLET_CREATE_PATH, WalletCreateRequest, WalletCreateResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CreateError {
    #[error("wallet service unreachable: {0}")]
    Transport(String),
    #[error("wallet service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("wallet service returned an unreadable body: {0}")]
    Malformed(String),
}

/// The remote wallet-creation operation.
///
/// Futures are not required to be `Send`: the caller drives them on a single
/// cooperative thread (browser event loop or current-thread runtime).
#[async_trait(?Send)]
pub trait WalletCreator {
    async fn create_wallet(
        &self,
        request: &WalletCreateRequest,
    ) -> Result<WalletCreateResponse, CreateError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// Joins a configured base URL with the fixed creation path.
///
/// An empty base yields the relative path, for same-origin deployments.
pub fn create_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), WALLET_CREATE_PATH)
}

/// HTTP adapter for `POST /wallet/create`.
#[cfg(feature = "http")]
pub struct HttpWalletCreator {
    url: String,
    http: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpWalletCreator {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build wallet service HTTP client")?;

        Ok(Self {
            url: create_url(&config.base_url),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl WalletCreator for HttpWalletCreator {
    async fn create_wallet(
        &self,
        request: &WalletCreateRequest,
    ) -> Result<WalletCreateResponse, CreateError> {
        debug!(url = %self.url, "posting wallet creation request");

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|err| CreateError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| CreateError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(CreateError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| CreateError::Malformed(err.to_string()))
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use std::time::Instant;
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn creator(base_url: String) -> HttpWalletCreator {
        HttpWalletCreator::new(ClientConfig {
            base_url,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    fn request(username: &str) -> WalletCreateRequest {
        WalletCreateRequest {
            username: username.to_owned(),
        }
    }

    #[test]
    fn create_url_trims_trailing_slash() {
        assert_eq!(create_url("http://localhost:3000/"), "http://localhost:3000/wallet/create");
        assert_eq!(create_url("http://localhost:3000"), "http://localhost:3000/wallet/create");
        assert_eq!(create_url(""), "/wallet/create");
    }

    #[tokio::test]
    async fn posts_username_as_json() {
        // The Json extractor rejects bodies without an application/json content type.
        let app = Router::new().route(
            "/wallet/create",
            post(|Json(body): Json<WalletCreateRequest>| async move {
                Json(json!({ "address": format!("bc1q{}", body.username), "balance": 0 }))
            }),
        );
        let creator = creator(serve(app).await);

        let response = creator.create_wallet(&request("alice")).await.unwrap();

        assert_eq!(response.address.as_deref(), Some("bc1qalice"));
        assert_eq!(response.balance, Some(0.0));
        assert_eq!(response.name, None);
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let app = Router::new().route(
            "/wallet/create",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let creator = creator(serve(app).await);

        let err = creator.create_wallet(&request("bob")).await.unwrap_err();

        assert_eq!(
            err,
            CreateError::Status {
                status: 500,
                body: "boom".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn non_json_success_body_is_malformed() {
        let app = Router::new().route("/wallet/create", post(|| async { "created!" }));
        let creator = creator(serve(app).await);

        let err = creator.create_wallet(&request("carol")).await.unwrap_err();

        assert!(matches!(err, CreateError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = creator(format!("http://{addr}"))
            .create_wallet(&request("dave"))
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::Transport(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out_as_a_transport_error() {
        let app = Router::new().route(
            "/wallet/create",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "address": "bc1qlate" }))
            }),
        );
        let creator = HttpWalletCreator::new(ClientConfig {
            base_url: serve(app).await,
            timeout: Some(Duration::from_millis(200)),
        })
        .unwrap();

        let started = Instant::now();
        let err = creator.create_wallet(&request("erin")).await.unwrap_err();

        assert!(matches!(err, CreateError::Transport(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
