//! Main test runner that orchestrates the target service, scenarios and reports

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::client::ApiClient;
use crate::config::RunnerConfig;
use crate::error::{E2eError, E2eResult};
use crate::fixtures::Fixtures;
use crate::report::{JsonReportSink, ReportSink, Reporter, StepRecord};
use crate::scenario::{self, Scenario, ScenarioContext};
use crate::stub::StubHandle;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
    pub error: Option<String>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl TestSuiteResult {
    /// Wraps a single scenario result
    pub fn single(result: ScenarioResult) -> Self {
        Self {
            total: 1,
            passed: usize::from(result.success),
            failed: usize::from(!result.success),
            duration_ms: result.duration_ms,
            results: vec![result],
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Main E2E test runner
pub struct TestRunner {
    config: RunnerConfig,
    client: ApiClient,
    fixtures: Fixtures,
    sink: Box<dyn ReportSink>,

    /// Running stub (only when no base URL is configured)
    stub: Option<StubHandle>,
}

impl TestRunner {
    /// Create a test runner configured from the environment
    pub fn from_env() -> E2eResult<Self> {
        Self::with_config(RunnerConfig::from_env()?)
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> E2eResult<Self> {
        let fixtures = config.load_fixtures()?;
        let sink = Box::new(JsonReportSink::new(config.output_dir.join("reports")));
        Ok(Self {
            config,
            client: ApiClient::new()?,
            fixtures,
            sink,
            stub: None,
        })
    }

    /// Replace the report sink
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn stub(&self) -> Option<&StubHandle> {
        self.stub.as_ref()
    }

    /// Start the stub unless a real service is configured
    pub async fn start_stub(&mut self) -> E2eResult<()> {
        if self.config.base_url.is_some() || self.stub.is_some() {
            return Ok(());
        }

        let mut stub_config = self.config.stub.clone();
        stub_config.base_path = self.config.base_path.clone();
        if let Some(key) = &self.config.api_key {
            stub_config.required_api_key = Some(key.clone());
        }
        self.stub = Some(StubHandle::spawn(stub_config).await?);
        Ok(())
    }

    /// Stop the stub
    pub fn stop_stub(&mut self) {
        if let Some(mut stub) = self.stub.take() {
            stub.stop();
        }
    }

    /// Base URI scenarios are sent to
    pub fn target(&self) -> E2eResult<String> {
        match (&self.config.base_url, &self.stub) {
            (Some(url), _) => Ok(url.clone()),
            (None, Some(stub)) => Ok(stub.base_url().to_string()),
            (None, None) => Err(E2eError::Config(
                "no base URL configured and the stub is not running".to_string(),
            )),
        }
    }

    /// Run every registered scenario
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        self.run_scenarios(&scenario::registry()).await
    }

    /// Run scenarios carrying a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let all = scenario::registry();
        let filtered: Vec<Scenario> = Scenario::filter_by_tag(&all, tag)
            .into_iter()
            .copied()
            .collect();
        self.run_scenarios(&filtered).await
    }

    /// Run a specific scenario by name
    pub async fn run_test(&mut self, name: &str) -> E2eResult<ScenarioResult> {
        let scenario =
            scenario::find(name).ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))?;
        self.start_stub().await?;
        self.run_scenario(&scenario).await
    }

    /// Run a list of scenarios one after another
    pub async fn run_scenarios(&mut self, scenarios: &[Scenario]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        self.start_stub().await?;

        info!("Running {} scenario(s) against {}", scenarios.len(), self.target()?);

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await?;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Run a single scenario.
    ///
    /// A scenario failure is part of the returned result; `Err` is reserved for
    /// problems with the runner itself.
    pub async fn run_scenario(&self, scenario: &Scenario) -> E2eResult<ScenarioResult> {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let reporter = Reporter::new(scenario.name);
        let ctx = ScenarioContext {
            client: self.client.clone(),
            base: self.config.base_config(&self.target()?),
            fixtures: self.fixtures.clone(),
            reporter: reporter.clone(),
            filter: self.config.default_filter,
        };

        let outcome = (scenario.run)(&ctx).await;
        let report = reporter.snapshot();
        if let Err(e) = self.sink.write_scenario(&report) {
            warn!("Failed to write report for {}: {}", scenario.name, e);
        }

        Ok(ScenarioResult {
            name: scenario.name.to_string(),
            success: outcome.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps: report.steps,
            error: outcome.err().map(|e| e.to_string()),
        })
    }

    /// Write suite results to a JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        self.stop_stub();
    }
}
