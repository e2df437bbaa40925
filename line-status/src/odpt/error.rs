//! ODPT client error types.

/// Errors that can occur when talking to the ODPT API.
#[derive(Debug, thiserror::Error)]
pub enum OdptError {
    /// No consumer key configured; raised before any request is made
    #[error("ODPT consumer key is not configured (set {env})")]
    MissingConsumerKey { env: &'static str },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Key rejected by the API
    #[error("unauthorized: check the ODPT consumer key for {endpoint}")]
    Unauthorized { endpoint: String },

    /// API returned an error status
    #[error("API error {status} from {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Failed to parse response JSON
    #[error("JSON parse error from {endpoint}: {message}")]
    Json { endpoint: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OdptError::MissingConsumerKey {
            env: "ODPT_CONSUMER_KEY",
        };
        assert_eq!(
            err.to_string(),
            "ODPT consumer key is not configured (set ODPT_CONSUMER_KEY)"
        );

        let err = OdptError::Api {
            endpoint: "odpt:Train".into(),
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error 500 from odpt:Train: Internal Server Error"
        );

        let err = OdptError::Json {
            endpoint: "odpt:Railway".into(),
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("odpt:Railway"));
    }

    fn variant_name(err: &OdptError) -> &'static str {
        match err {
            OdptError::MissingConsumerKey { .. } => "missing-key",
            OdptError::Http(_) => "http",
            OdptError::Unauthorized { .. } => "unauthorized",
            OdptError::Api { .. } => "api",
            OdptError::Json { .. } => "json",
        }
    }

    #[test]
    fn unauthorized_names_endpoint() {
        let err = OdptError::Unauthorized {
            endpoint: "odpt:Station".into(),
        };
        assert_eq!(variant_name(&err), "unauthorized");
        assert_eq!(
            err.to_string(),
            "unauthorized: check the ODPT consumer key for odpt:Station"
        );
    }
}
