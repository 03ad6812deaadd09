use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::CycleError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of review-status documents, keyed by a `from_date` cursor.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetch the raw status document for everything changed since `from_date`.
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: String) -> anyhow::Result<Self> {
        Self::with_timeout(endpoint, token, REQUEST_TIMEOUT)
    }

    /// Like `new`, with a custom whole-request timeout.
    pub fn with_timeout(endpoint: &str, token: String, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let http = Client::builder()
            .user_agent("review-watchbot/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn build_request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }

    fn transport_error(&self, source: reqwest::Error) -> CycleError {
        CycleError::Transport {
            endpoint: self.endpoint.to_string(),
            source,
        }
    }
}

#[async_trait]
impl StatusApi for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError> {
        let request = self
            .build_request(from_date)
            .map_err(|err| self.transport_error(err))?;
        debug!(url = %request.url(), "requesting review statuses");

        let res = match self.http.execute(request).await {
            Ok(res) => res,
            Err(err) => {
                error!(?err, endpoint = %self.endpoint, "status API request failed");
                return Err(self.transport_error(err));
            }
        };

        let status = res.status();
        if status != StatusCode::OK {
            error!(endpoint = %self.endpoint, %status, "status API returned non-OK");
            return Err(CycleError::HttpStatus {
                endpoint: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        res.json::<Value>().await.map_err(|source| CycleError::Decode {
            endpoint: self.endpoint.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_sets_auth_and_cursor() {
        let client =
            PracticumClient::new("https://api.example.test/homework_statuses/", "secret".into())
                .unwrap();
        let request = client.build_request(1_700_000_000).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/homework_statuses/");
        assert_eq!(request.url().query(), Some("from_date=1700000000"));
        assert_eq!(
            request
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .unwrap(),
            "OAuth secret"
        );
    }

    #[test]
    fn debug_hides_token() {
        let client = PracticumClient::new("https://api.example.test/", "secret".into()).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn rejects_bad_endpoint() {
        assert!(PracticumClient::new("not a url", "t".into()).is_err());
    }
}
