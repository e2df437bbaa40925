//! ODPT v4 HTTP client.
//!
//! Every request carries the consumer key as the `acl:consumerKey` query
//! parameter. Responses are returned as raw JSON so they can be persisted
//! verbatim before being decoded.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info};

use crate::domain::OperatorId;

use super::error::OdptError;

/// Query parameter carrying the API credential.
pub const CONSUMER_KEY_PARAM: &str = "acl:consumerKey";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the ODPT client.
#[derive(Debug, Clone)]
pub struct OdptConfig {
    /// Base URL without trailing slash, e.g. `https://api.odpt.org/api/v4`
    pub base_url: String,
    /// Consumer key, if one was configured
    pub consumer_key: Option<String>,
    /// Environment variable the key is expected in, for error messages
    pub key_env: &'static str,
    /// Operator whose data is requested
    pub operator: OperatorId,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OdptConfig {
    /// Create a config for the given base URL and operator, with no key.
    pub fn new(base_url: impl Into<String>, operator: OperatorId) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key: None,
            key_env: "ODPT_CONSUMER_KEY",
            operator,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the consumer key.
    pub fn with_consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self
    }

    /// Set the environment variable named in missing-key errors.
    pub fn with_key_env(mut self, env: &'static str) -> Self {
        self.key_env = env;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the ODPT open-data API.
#[derive(Debug, Clone)]
pub struct OdptClient {
    http: reqwest::Client,
    base_url: String,
    consumer_key: String,
    operator: OperatorId,
}

impl OdptClient {
    /// Create a new client.
    ///
    /// Fails with [`OdptError::MissingConsumerKey`] if no key is configured,
    /// so a misconfiguration is reported before any network traffic.
    pub fn new(config: OdptConfig) -> Result<Self, OdptError> {
        let consumer_key = config
            .consumer_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(OdptError::MissingConsumerKey {
                env: config.key_env,
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            consumer_key,
            operator: config.operator,
        })
    }

    /// The operator this client is scoped to.
    pub fn operator(&self) -> &OperatorId {
        &self.operator
    }

    /// Fetch all stations of the operator (`odpt:Station`).
    pub async fn fetch_stations(&self) -> Result<serde_json::Value, OdptError> {
        self.get("odpt:Station", &[("odpt:operator", self.operator.as_str())])
            .await
    }

    /// Fetch all railways of the operator, with station order (`odpt:Railway`).
    pub async fn fetch_railways(&self) -> Result<serde_json::Value, OdptError> {
        self.get("odpt:Railway", &[("odpt:operator", self.operator.as_str())])
            .await
    }

    /// Fetch live train locations of the operator (`odpt:Train`).
    pub async fn fetch_trains(&self) -> Result<serde_json::Value, OdptError> {
        self.get("odpt:Train", &[("odpt:operator", self.operator.as_str())])
            .await
    }

    /// GET an endpoint and return the parsed JSON body.
    ///
    /// The consumer key is appended unless `params` already contains one.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, OdptError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = params.to_vec();
        if !query.iter().any(|(k, _)| *k == CONSUMER_KEY_PARAM) {
            query.push((CONSUMER_KEY_PARAM, self.consumer_key.as_str()));
        }

        debug!(url = %redacted_url(&url, &query), "fetching {endpoint}");

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OdptError::Unauthorized {
                endpoint: endpoint.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OdptError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| OdptError::Json {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        info!(
            records = value.as_array().map(Vec::len).unwrap_or(0),
            "fetched {endpoint}"
        );

        Ok(value)
    }
}

/// Render a request URL for logging, with the consumer key masked.
fn redacted_url(url: &str, query: &[(&str, &str)]) -> String {
    let masked = query.iter().map(|&(k, v)| {
        if k == CONSUMER_KEY_PARAM {
            (k, "[redacted]")
        } else {
            (k, v)
        }
    });

    Url::parse_with_params(url, masked)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn jr_east() -> OperatorId {
        OperatorId::parse("odpt.Operator:JR-East").unwrap()
    }

    /// Accept one connection, reply with a canned response and hand back
    /// the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn config_defaults() {
        let config = OdptConfig::new("https://api.odpt.org/api/v4/", jr_east());
        assert_eq!(config.base_url, "https://api.odpt.org/api/v4");
        assert_eq!(config.consumer_key, None);
        assert_eq!(config.key_env, "ODPT_CONSUMER_KEY");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn config_builder() {
        let config = OdptConfig::new("http://localhost:8080", jr_east())
            .with_consumer_key("secret")
            .with_key_env("ODPT_CHALLENGE_CONSUMER_KEY")
            .with_timeout(60);

        assert_eq!(config.consumer_key.as_deref(), Some("secret"));
        assert_eq!(config.key_env, "ODPT_CHALLENGE_CONSUMER_KEY");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn missing_key_is_rejected_up_front() {
        let config = OdptConfig::new("http://localhost:1", jr_east())
            .with_key_env("ODPT_CHALLENGE_CONSUMER_KEY");
        let err = OdptClient::new(config).unwrap_err();
        assert!(matches!(
            err,
            OdptError::MissingConsumerKey {
                env: "ODPT_CHALLENGE_CONSUMER_KEY"
            }
        ));
    }

    #[test]
    fn blank_key_is_rejected() {
        let config = OdptConfig::new("http://localhost:1", jr_east()).with_consumer_key("  ");
        assert!(OdptClient::new(config).is_err());
    }

    #[test]
    fn client_creation() {
        let config = OdptConfig::new("http://localhost:1", jr_east()).with_consumer_key("k");
        let client = OdptClient::new(config).unwrap();
        assert_eq!(client.operator().as_str(), "odpt.Operator:JR-East");
    }

    #[test]
    fn redacts_consumer_key() {
        let url = redacted_url(
            "https://api.odpt.org/api/v4/odpt:Train",
            &[("odpt:operator", "odpt.Operator:JR-East"), (CONSUMER_KEY_PARAM, "secret")],
        );
        assert!(!url.contains("secret"));
        assert!(url.contains("redacted"));
        assert!(url.contains("odpt.Operator%3AJR-East"));
    }

    #[tokio::test]
    async fn fetch_sends_operator_and_key() {
        let (base, server) = serve_once("200 OK", r#"[{"odpt:railway":"odpt.Railway:X"}]"#).await;
        let config = OdptConfig::new(base, jr_east()).with_consumer_key("secret");
        let client = OdptClient::new(config).unwrap();

        let value = client.fetch_trains().await.unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /odpt:Train?"));
        assert!(request.contains("odpt%3Aoperator=odpt.Operator%3AJR-East"));
        assert!(request.contains("acl%3AconsumerKey=secret"));
    }

    #[tokio::test]
    async fn caller_supplied_key_is_not_duplicated() {
        let (base, server) = serve_once("200 OK", "[]").await;
        let config = OdptConfig::new(base, jr_east()).with_consumer_key("default");
        let client = OdptClient::new(config).unwrap();

        client
            .get("odpt:Station", &[(CONSUMER_KEY_PARAM, "override")])
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.contains("acl%3AconsumerKey=override"));
        assert!(!request.contains("default"));
    }

    #[tokio::test]
    async fn forbidden_maps_to_unauthorized() {
        let (base, _server) = serve_once("403 Forbidden", "").await;
        let config = OdptConfig::new(base, jr_east()).with_consumer_key("bad");
        let client = OdptClient::new(config).unwrap();

        let err = client.fetch_railways().await.unwrap_err();
        assert!(matches!(err, OdptError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let (base, _server) = serve_once("500 Internal Server Error", "boom").await;
        let config = OdptConfig::new(base, jr_east()).with_consumer_key("k");
        let client = OdptClient::new(config).unwrap();

        match client.fetch_stations().await.unwrap_err() {
            OdptError::Api {
                endpoint,
                status,
                message,
            } => {
                assert_eq!(endpoint, "odpt:Station");
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_maps_to_json_error() {
        let (base, _server) = serve_once("200 OK", "not json").await;
        let config = OdptConfig::new(base, jr_east()).with_consumer_key("k");
        let client = OdptClient::new(config).unwrap();

        let err = client.fetch_trains().await.unwrap_err();
        assert!(matches!(err, OdptError::Json { .. }));
    }
}
