//! Step reporting
//!
//! A [`Reporter`] wraps each logical action of a scenario in a named step and
//! records its outcome, duration and attachments. It is an observability
//! layer only: [`Reporter::step`] hands back the action's own `Result`
//! unchanged, and a step is always finalized before its error propagates.
//! If the action panics (or its future is dropped mid-flight) the step guard
//! finalizes the step as [`StepStatus::Broken`] during unwinding.

mod sink;
mod templates;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::client::Exchange;

pub use sink::{JsonReportSink, MemorySink, ReportSink};

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    /// The step never returned (panic or cancellation)
    Broken,
}

/// Text attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub content: String,
}

/// A finished step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    /// Wall-clock start, RFC 3339
    pub started_at: String,
    pub duration_ms: u64,
    pub attachments: Vec<Attachment>,
    pub error: Option<String>,
}

/// Everything recorded for one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub steps: Vec<StepRecord>,
    /// Attachments added while no step was open
    pub attachments: Vec<Attachment>,
}

/// How an HTTP exchange is attached to the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExchangeFilter {
    /// Attach nothing
    None,
    /// Raw request and response text
    Plain,
    /// Markdown rendered through the request/response templates
    #[default]
    Templated,
}

struct OpenStep {
    id: u64,
    name: String,
    started_at: String,
    start: Instant,
    attachments: Vec<Attachment>,
}

struct ReportState {
    scenario: String,
    open: Vec<OpenStep>,
    finished: Vec<StepRecord>,
    loose: Vec<Attachment>,
    next_id: u64,
}

/// Records the steps of one scenario; clones share the same report
#[derive(Clone)]
pub struct Reporter {
    state: Arc<Mutex<ReportState>>,
}

impl Reporter {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ReportState {
                scenario: scenario.into(),
                open: Vec::new(),
                finished: Vec::new(),
                loose: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Runs `action` as a named step and returns its result unchanged.
    pub async fn step<T, E, F, Fut>(&self, name: &str, action: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let guard = self.open_step(name);
        let span = info_span!("step", name);
        let result = action().instrument(span).await;
        guard.close(&result);
        result
    }

    /// Synchronous counterpart of [`Reporter::step`], used for assertions.
    pub fn step_sync<T, E, F>(&self, name: &str, action: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let guard = self.open_step(name);
        let result = info_span!("step", name).in_scope(action);
        guard.close(&result);
        result
    }

    /// Attaches text to the most recently opened step that is still running
    pub fn attach(&self, name: &str, media_type: &str, content: impl Into<String>) {
        let attachment = Attachment {
            name: name.to_string(),
            media_type: media_type.to_string(),
            content: content.into(),
        };
        let mut state = self.state.lock();
        match state.open.last_mut() {
            Some(step) => step.attachments.push(attachment),
            None => state.loose.push(attachment),
        }
    }

    /// Attaches an HTTP exchange according to `filter`
    pub fn attach_exchange(&self, filter: ExchangeFilter, exchange: &Exchange) {
        match filter {
            ExchangeFilter::None => {}
            ExchangeFilter::Plain => {
                let request = templates::plain_request(&exchange.request);
                let response = templates::plain_response(&exchange.response);
                self.attach("Request", "text/plain", request);
                self.attach("Response", "text/plain", response);
            }
            ExchangeFilter::Templated => {
                let request = templates::render_request(&exchange.request);
                let response = templates::render_response(&exchange.response);
                self.attach("Request", "text/markdown", request);
                self.attach("Response", "text/markdown", response);
            }
        }
    }

    /// Snapshot of everything recorded so far
    pub fn snapshot(&self) -> ScenarioReport {
        let state = self.state.lock();
        ScenarioReport {
            scenario: state.scenario.clone(),
            steps: state.finished.clone(),
            attachments: state.loose.clone(),
        }
    }

    fn open_step(&self, name: &str) -> StepGuard {
        debug!("Step started: {}", name);
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.open.push(OpenStep {
            id,
            name: name.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            start: Instant::now(),
            attachments: Vec::new(),
        });
        StepGuard {
            reporter: self.clone(),
            id,
            closed: false,
        }
    }

    fn finish_step(&self, id: u64, status: StepStatus, error: Option<String>) {
        let mut state = self.state.lock();
        let Some(index) = state.open.iter().rposition(|step| step.id == id) else {
            return;
        };
        let step = state.open.remove(index);
        let duration_ms = step.start.elapsed().as_millis() as u64;
        match status {
            StepStatus::Passed => info!("✓ {} ({} ms)", step.name, duration_ms),
            StepStatus::Failed | StepStatus::Broken => warn!(
                "✗ {} ({} ms) - {}",
                step.name,
                duration_ms,
                error.as_deref().unwrap_or("no error recorded")
            ),
        }
        state.finished.push(StepRecord {
            name: step.name,
            status,
            started_at: step.started_at,
            duration_ms,
            attachments: step.attachments,
            error,
        });
    }
}

/// Closes the step it was opened for, even on unwinding
struct StepGuard {
    reporter: Reporter,
    id: u64,
    closed: bool,
}

impl StepGuard {
    fn close<T, E: Display>(mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.reporter.finish_step(self.id, StepStatus::Passed, None),
            Err(e) => {
                self.reporter
                    .finish_step(self.id, StepStatus::Failed, Some(e.to_string()))
            }
        }
        self.closed = true;
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let reason = if std::thread::panicking() {
            "step panicked"
        } else {
            "step was cancelled before completing"
        };
        self.reporter
            .finish_step(self.id, StepStatus::Broken, Some(reason.to_string()));
    }
}
