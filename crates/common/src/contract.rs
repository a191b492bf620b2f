//! Request and response contracts
//!
//! A contract is an immutable bundle of the parameters used to configure an
//! HTTP exchange (target, headers, media type) or to validate its response
//! (status code, media type, optional JSON schema). Contracts are built once
//! by the functions in this module and shared read-only between scenarios.
//!
//! ```text
//! BaseConfig ──build_request_contract──► RequestContract ──url_for("/login")──► URL
//! status ─────build_response_contract──► ResponseContract ──validate(status, ct, body)
//! ```

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema;

/// Media type sent and expected by every contract in this suite
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Default public base URI of the service under test
pub const DEFAULT_BASE_URI: &str = "https://reqres.in";

/// Default base path prepended to relative request paths
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Environment inputs shared by all request contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseConfig {
    /// Scheme and authority, e.g. `https://reqres.in`
    pub base_uri: String,

    /// Path prefix, e.g. `/api`
    pub base_path: String,

    /// Headers sent with every request
    pub default_headers: BTreeMap<String, String>,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            default_headers: BTreeMap::new(),
        }
    }
}

impl BaseConfig {
    pub fn new(base_uri: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            base_path: base_path.into(),
            default_headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

/// How to send a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContract {
    base_uri: String,
    base_path: String,
    headers: BTreeMap<String, String>,
    content_type: &'static str,
}

impl RequestContract {
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    /// Returns a copy of this contract with one more header
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.headers.insert(name.into(), value.into());
        next
    }

    /// Resolves a request path against the base URI and base path.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let mut url = self.base_uri.trim_end_matches('/').to_string();
        let base_path = self.base_path.trim_matches('/');
        if !base_path.is_empty() {
            url.push('/');
            url.push_str(base_path);
        }
        let path = path.trim_start_matches('/');
        if !path.is_empty() {
            url.push('/');
            url.push_str(path);
        }
        url
    }
}

/// How to validate a response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseContract {
    expected_status: u16,
    expected_content_type: &'static str,
    schema: Option<Value>,
}

impl ResponseContract {
    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// Returns a copy of this contract that also checks the body against `schema`
    pub fn with_schema(&self, schema: Value) -> Self {
        Self {
            schema: Some(schema),
            ..self.clone()
        }
    }

    /// Validates status code, then media type, then (if set) the schema.
    pub fn validate(&self, status: u16, content_type: Option<&str>, body: &str) -> Result<()> {
        if status != self.expected_status {
            return Err(Error::StatusMismatch {
                expected: self.expected_status,
                actual: status,
            });
        }

        let actual = content_type
            .ok_or_else(|| Error::MissingContentType(self.expected_content_type.to_string()))?;
        if !media_type_matches(self.expected_content_type, actual) {
            return Err(Error::ContentTypeMismatch {
                expected: self.expected_content_type.to_string(),
                actual: actual.to_string(),
            });
        }

        if let Some(schema) = &self.schema {
            let instance: Value = serde_json::from_str(body)?;
            validate_schema(schema, &instance)?;
        }

        debug!(status, "response satisfies contract");
        Ok(())
    }
}

/// Compares the essence of two media types, ignoring parameters and case
fn media_type_matches(expected: &str, actual: &str) -> bool {
    let essence = actual.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case(expected)
}

fn validate_schema(schema: &Value, instance: &Value) -> Result<()> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| Error::InvalidSchema(e.to_string()))?;
    let messages: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaViolation(messages.join("; ")))
    }
}

/// Builds a JSON request contract from the base configuration
pub fn build_request_contract(base: &BaseConfig) -> RequestContract {
    RequestContract {
        base_uri: base.base_uri.clone(),
        base_path: base.base_path.clone(),
        headers: base.default_headers.clone(),
        content_type: JSON_MEDIA_TYPE,
    }
}

/// Builds a JSON response contract expecting `expected_status`
pub fn build_response_contract(expected_status: u16) -> ResponseContract {
    ResponseContract {
        expected_status,
        expected_content_type: JSON_MEDIA_TYPE,
        schema: None,
    }
}

pub fn login_request_spec(base: &BaseConfig) -> RequestContract {
    build_request_contract(base)
}

pub fn create_user_request_spec(base: &BaseConfig) -> RequestContract {
    build_request_contract(base)
}

/// 200 with a token body
pub fn login_response_spec() -> ResponseContract {
    build_response_contract(200).with_schema(schema::login_token_schema())
}

/// 400 with an error body
pub fn missing_password_400_spec() -> ResponseContract {
    build_response_contract(400).with_schema(schema::error_schema())
}

/// 201 with the created-user echo
pub fn create_user_response_spec() -> ResponseContract {
    build_response_contract(201).with_schema(schema::created_user_schema())
}
