use crate::error::StartPageError;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;
use url::Url;

const USER_AGENT: &str = "startpage-core/0.1";
const ACCEPT: &str = "application/json";
const MAX_API_HISTORY: usize = 100;

#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub url: String,
    pub timestamp: OffsetDateTime,
    pub status_code: u16,
    pub success: bool,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
    history: Arc<Mutex<Vec<ApiCall>>>,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StartPageError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(RestClient {
            client,
            base_url,
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, StartPageError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and turn non-success statuses into `StartPageError::Api`.
    pub async fn call(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, StartPageError> {
        debug!("calling backend API: {} {}", method, url);

        let timestamp = OffsetDateTime::now_utc();
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.record(ApiCall {
                    method,
                    url: url.to_string(),
                    timestamp,
                    status_code: 0,
                    success: false,
                });
                return Err(StartPageError::Network(e));
            }
        };

        let status = response.status();
        self.record(ApiCall {
            method,
            url: url.to_string(),
            timestamp,
            status_code: status.as_u16(),
            success: status.is_success(),
        });

        if status.is_success() {
            return Ok(response);
        }

        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        Err(StartPageError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    fn record(&self, call: ApiCall) {
        if let Ok(mut history) = self.history.lock() {
            history.push(call);
            if history.len() > MAX_API_HISTORY {
                let excess = history.len() - MAX_API_HISTORY;
                history.drain(0..excess);
            }
        }
    }

    /// Get the API call history for debugging purposes
    pub fn api_call_history(&self) -> Vec<ApiCall> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn clear_api_call_history(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}
