//! Request and response models for the user/login endpoints

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Credentials posted to `/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,

    /// Omitted from the JSON body entirely when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
        }
    }

    /// Credentials without a password, used to provoke the 400 path
    pub fn email_only(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }
}

/// Body returned by `/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which half of a [`LoginResult`] is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome<'a> {
    Token(&'a str),
    Error(&'a str),
}

impl LoginResult {
    /// Returns the populated field, rejecting bodies carrying both or neither.
    pub fn outcome(&self) -> Result<LoginOutcome<'_>> {
        match (self.token.as_deref(), self.error.as_deref()) {
            (Some(token), None) => Ok(LoginOutcome::Token(token)),
            (None, Some(error)) => Ok(LoginOutcome::Error(error)),
            (Some(_), Some(_)) => Err(Error::InvalidModel(
                "login result carries both token and error".to_string(),
            )),
            (None, None) => Err(Error::InvalidModel(
                "login result carries neither token nor error".to_string(),
            )),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome(), Ok(LoginOutcome::Token(_)))
    }
}

/// Generic `{ "error": "..." }` body returned with 4xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Body posted to `/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreationRequest {
    pub name: String,
    pub job: String,
}

impl UserCreationRequest {
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// Echo of a created user; `id` and `createdAt` are assigned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreationResult {
    pub name: String,
    pub job: String,
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl UserCreationResult {
    /// Parses `createdAt` as an RFC 3339 timestamp
    pub fn created_at_timestamp(&self) -> Result<DateTime<FixedOffset>> {
        Ok(DateTime::parse_from_rfc3339(&self.created_at)?)
    }
}
