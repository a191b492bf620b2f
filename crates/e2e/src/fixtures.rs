//! Golden values tied to the current behaviour of the demo service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

const DEFAULT_FIXTURES: &str = include_str!("../fixtures/reqres.yaml");

/// Every literal a scenario asserts against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    pub login: LoginFixture,
    pub missing_password: MissingPasswordFixture,
    pub create_user: CreateUserFixture,
}

/// A credential pair known to the service and the token it hands out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFixture {
    pub email: String,
    pub password: String,
    pub token: String,
    pub alternate_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPasswordFixture {
    pub email: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserFixture {
    pub name: String,
    pub job: String,
}

impl Fixtures {
    /// Parse fixtures from a YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse fixtures from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Fixtures bundled with the crate
    pub fn bundled() -> E2eResult<Self> {
        Self::from_yaml(DEFAULT_FIXTURES)
    }
}
