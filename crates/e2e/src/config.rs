//! Runner configuration
//!
//! Values come from environment variables first; the harness binary lets CLI
//! flags override them. Environment values are read strictly: a variable that
//! is set but empty or not valid UTF-8 is a configuration error rather than
//! being silently ignored.

use std::path::PathBuf;

use reqres_common::contract::DEFAULT_BASE_PATH;
use reqres_common::BaseConfig;

use crate::error::{E2eError, E2eResult};
use crate::fixtures::Fixtures;
use crate::report::ExchangeFilter;
use crate::stub::StubConfig;

/// Header carrying the optional API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Environment keys understood by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E2eEnv {
    /// Base URI of the service under test; unset means "start the stub"
    BaseUrl,
    /// Path prefix for relative request paths
    BasePath,
    /// API key sent as `x-api-key`
    ApiKey,
    /// Directory for results and reports
    OutputDir,
    /// Golden-values YAML file
    Fixtures,
}

impl E2eEnv {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "REQRES_E2E_BASE_URL",
            Self::BasePath => "REQRES_E2E_BASE_PATH",
            Self::ApiKey => "REQRES_E2E_API_KEY",
            Self::OutputDir => "REQRES_E2E_OUTPUT_DIR",
            Self::Fixtures => "REQRES_E2E_FIXTURES",
        }
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Target service; `None` runs against the in-process stub
    pub base_url: Option<String>,

    /// Path prefix, `/api` for reqres
    pub base_path: String,

    /// Optional API key
    pub api_key: Option<String>,

    /// Output directory for results
    pub output_dir: PathBuf,

    /// Golden values override; the bundled file is used when unset
    pub fixtures_path: Option<PathBuf>,

    /// Attachment filter used by scenarios that do not pick their own
    pub default_filter: ExchangeFilter,

    /// Stub configuration
    pub stub: StubConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
            api_key: None,
            output_dir: PathBuf::from("target/reqres-e2e"),
            fixtures_path: None,
            default_filter: ExchangeFilter::Templated,
            stub: StubConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Loads configuration from environment variables on top of the defaults.
    pub fn from_env() -> E2eResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: read_env_nonempty(E2eEnv::BaseUrl.as_str())?,
            base_path: read_env_nonempty(E2eEnv::BasePath.as_str())?
                .unwrap_or(defaults.base_path),
            api_key: read_env_nonempty(E2eEnv::ApiKey.as_str())?,
            output_dir: read_env_nonempty(E2eEnv::OutputDir.as_str())?
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            fixtures_path: read_env_nonempty(E2eEnv::Fixtures.as_str())?.map(PathBuf::from),
            ..defaults
        })
    }

    /// Builds the request base for a resolved service URL.
    ///
    /// `https://reqres.in` and `https://reqres.in/api` resolve to the same base.
    pub fn base_config(&self, base_uri: &str) -> BaseConfig {
        let root = service_root(base_uri, &self.base_path);
        let base = BaseConfig::new(root, self.base_path.clone());
        match &self.api_key {
            Some(key) => base.with_header(API_KEY_HEADER, key.clone()),
            None => base,
        }
    }

    /// Loads the configured fixtures, falling back to the bundled file
    pub fn load_fixtures(&self) -> E2eResult<Fixtures> {
        match &self.fixtures_path {
            Some(path) => Fixtures::from_file(path),
            None => Fixtures::bundled(),
        }
    }
}

/// Strips a trailing `base_path` from `base_uri`
fn service_root<'a>(base_uri: &'a str, base_path: &str) -> &'a str {
    let uri = base_uri.trim_end_matches('/');
    let path = base_path.trim_end_matches('/');
    if path.is_empty() {
        return uri;
    }
    uri.strip_suffix(path).unwrap_or(uri)
}

/// Reads an environment variable and enforces UTF-8 validity.
pub fn read_env_strict(name: &str) -> E2eResult<Option<String>> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| E2eError::Config(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> E2eResult<Option<String>> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(E2eError::Config(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}
