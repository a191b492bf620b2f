//! Destinations for finished scenario reports

use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;

use super::ScenarioReport;
use crate::error::E2eResult;

/// Accepts the report of each finished scenario
pub trait ReportSink: Send + Sync {
    fn write_scenario(&self, report: &ScenarioReport) -> E2eResult<()>;
}

/// Writes `<scenario>.json` per scenario into a directory
pub struct JsonReportSink {
    dir: PathBuf,
}

impl JsonReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, scenario: &str) -> PathBuf {
        let file: String = scenario
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl ReportSink for JsonReportSink {
    fn write_scenario(&self, report: &ScenarioReport) -> E2eResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&report.scenario);
        std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
        debug!("Report written to: {}", path.display());
        Ok(())
    }
}

/// Keeps reports in memory
#[derive(Default)]
pub struct MemorySink {
    reports: Mutex<Vec<ScenarioReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ScenarioReport> {
        self.reports.lock().clone()
    }
}

impl ReportSink for MemorySink {
    fn write_scenario(&self, report: &ScenarioReport) -> E2eResult<()> {
        self.reports.lock().push(report.clone());
        Ok(())
    }
}
