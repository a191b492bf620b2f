//! HTTP client for contract-configured requests

use std::collections::BTreeMap;
use std::time::Instant;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use reqres_common::{RequestContract, ResponseContract};

use crate::error::E2eResult;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized from a model
    Json(serde_json::Value),
    /// Sent exactly as given
    Raw(String),
    Empty,
}

impl RequestBody {
    pub fn json<T: Serialize>(model: &T) -> E2eResult<Self> {
        Ok(Self::Json(serde_json::to_value(model)?))
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    fn to_text(&self) -> E2eResult<Option<String>> {
        Ok(match self {
            Self::Json(value) => Some(serde_json::to_string(value)?),
            Self::Raw(text) => Some(text.clone()),
            Self::Empty => None,
        })
    }
}

/// The request half of an exchange, as sent
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// The response half of an exchange, fully buffered
#[derive(Debug, Clone)]
pub struct ExchangeResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub elapsed_ms: u64,
}

/// One request/response cycle
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: ExchangeRequest,
    pub response: ExchangeResponse,
}

impl Exchange {
    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// Checks the response against `contract`
    pub fn validate(&self, contract: &ResponseContract) -> E2eResult<&Self> {
        contract.validate(
            self.response.status,
            self.response.content_type.as_deref(),
            &self.response.body,
        )?;
        Ok(self)
    }

    /// Deserializes the response body into a model
    pub fn extract<T: DeserializeOwned>(&self) -> E2eResult<T> {
        Ok(serde_json::from_str(&self.response.body)?)
    }

    pub fn body_json(&self) -> E2eResult<serde_json::Value> {
        self.extract()
    }

    pub fn log_status(&self) -> &Self {
        info!(
            "{} {} -> {}",
            self.request.method, self.request.url, self.response.status
        );
        self
    }

    pub fn log_body(&self) -> &Self {
        info!("Response body: {}", self.response.body);
        self
    }
}

/// Sends requests shaped by a [`RequestContract`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> E2eResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reqres-e2e/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    pub async fn post(
        &self,
        contract: &RequestContract,
        path: &str,
        body: RequestBody,
    ) -> E2eResult<Exchange> {
        self.send(contract, Method::POST, path, body).await
    }

    /// Sends one request and buffers the whole response
    pub async fn send(
        &self,
        contract: &RequestContract,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> E2eResult<Exchange> {
        let url = contract.url_for(path);
        let body = body.to_text()?;

        let mut headers = contract.headers().clone();
        if body.is_some() {
            headers.insert(
                CONTENT_TYPE.as_str().to_string(),
                contract.content_type().to_string(),
            );
        }

        debug!("{} {}", method, url);
        let mut builder = self.http.request(method.clone(), url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(text) = &body {
            builder = builder.body(text.clone());
        }

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let response_headers = header_map(response.headers());
        let text = response.text().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!("{} {} answered {} in {} ms", method, url, status, elapsed_ms);

        Ok(Exchange {
            request: ExchangeRequest {
                method: method.to_string(),
                url,
                headers,
                body,
            },
            response: ExchangeResponse {
                status,
                content_type: response_headers.get(CONTENT_TYPE.as_str()).cloned(),
                headers: response_headers,
                body: text,
                elapsed_ms,
            },
        })
    }
}

/// Lower-cased header names; values that are not visible ASCII are dropped
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
