//! reqres E2E Contract Suite
//!
//! This crate provides a Rust-controlled API contract suite that:
//! - Builds request models and sends them through contract-configured requests
//! - Validates responses against response contracts (status, media type, schema)
//! - Wraps every action in a named, reportable step
//! - Runs against the public service or an in-process stub of it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TestRunner                             │
//! │    ├── start_stub() -> StubHandle (when no base URL)        │
//! │    ├── run_scenario(&Scenario) -> ScenarioResult            │
//! │    └── write_results(&TestSuiteResult)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (registry)                                        │
//! │    ├── build model        (reqres_common::types)            │
//! │    ├── send               (ApiClient + RequestContract)     │
//! │    ├── validate           (ResponseContract)                │
//! │    ├── deserialize        (Exchange::extract)               │
//! │    └── assert fields      (assert::expect_eq)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Reporter: step(name, action) + attach(...) -> ReportSink   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod assert;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod stub;

pub use client::{ApiClient, Exchange, RequestBody};
pub use config::RunnerConfig;
pub use error::{E2eError, E2eResult};
pub use report::{ExchangeFilter, Reporter};
pub use runner::TestRunner;
pub use scenario::{Scenario, ScenarioContext};
