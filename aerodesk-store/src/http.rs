use aerodesk_core::UpstreamError;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::app_config::{ResiliencyConfig, UpstreamConfig};
use crate::breaker::CircuitBreaker;

/// Status and decoded JSON body of an upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of the body, or the whole body as text.
    pub fn message(&self) -> String {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.body.to_string())
    }

    pub fn into_rejection(self) -> UpstreamError {
        UpstreamError::Rejected {
            status: self.status,
            message: self.message(),
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, UpstreamError> {
        serde_json::from_value(self.body).map_err(|e| UpstreamError::Malformed(e.to_string()))
    }

    /// Decodes one field of an envelope such as `{"message": ..., "seat": {...}}`.
    pub fn decode_field<T: DeserializeOwned>(self, field: &str) -> Result<T, UpstreamError> {
        let value = self
            .body
            .get(field)
            .cloned()
            .ok_or_else(|| UpstreamError::Malformed(format!("response has no '{}' field", field)))?;
        serde_json::from_value(value).map_err(|e| UpstreamError::Malformed(e.to_string()))
    }
}

/// JSON-over-HTTP client for one collaborating service, with a fixed
/// timeout and a circuit breaker in front of every call.
pub struct UpstreamHttp {
    service: &'static str,
    client: Client,
    base_url: String,
    timeout: Duration,
    breaker: CircuitBreaker,
}

impl UpstreamHttp {
    pub fn new(
        service: &'static str,
        base_url: &str,
        upstream: &UpstreamConfig,
        resiliency: &ResiliencyConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(upstream.timeout())
            .connect_timeout(upstream.connect_timeout())
            .build()?;

        Ok(Self {
            service,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: upstream.timeout(),
            breaker: CircuitBreaker::new(
                service,
                resiliency.failure_threshold,
                resiliency.reset_timeout(),
            ),
        })
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn get(&self, path: &str) -> Result<Reply, UpstreamError> {
        self.send(Method::GET, path, None).await
    }

    /// Sends one request. Transport failures and 5xx answers count against
    /// the breaker; any other answer, including 4xx, counts as healthy.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Reply, UpstreamError> {
        if !self.breaker.check().await {
            return Err(UpstreamError::Unavailable(format!(
                "{} circuit is open",
                self.service
            )));
        }

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.breaker.record_failure().await;
                return Err(self.transport_error(&method, path, e));
            }
        };
        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.breaker.record_failure().await;
                return Err(self.transport_error(&method, path, e));
            }
        };

        if status >= 500 {
            self.breaker.record_failure().await;
        } else {
            self.breaker.record_success().await;
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        tracing::debug!(service = self.service, %method, path, status, "Upstream call");
        Ok(Reply { status, body })
    }

    fn transport_error(&self, method: &Method, path: &str, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            tracing::warn!(service = self.service, %method, path, "Upstream call timed out");
            UpstreamError::Timeout(format!(
                "{} did not answer within {}s",
                self.service,
                self.timeout.as_secs()
            ))
        } else {
            tracing::warn!(service = self.service, %method, path, "Upstream unreachable: {}", e);
            UpstreamError::Unavailable(format!("{} is unreachable", self.service))
        }
    }
}
