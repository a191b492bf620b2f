use std::sync::Arc;

use tempfile::TempDir;
use test_case::test_case;

use reqres_e2e::report::{MemorySink, ReportSink, ScenarioReport, StepStatus};
use reqres_e2e::runner::ScenarioResult;
use reqres_e2e::{RunnerConfig, TestRunner};

/// Forwards to a shared MemorySink so the test can read reports afterwards
struct SharedSink(Arc<MemorySink>);

impl ReportSink for SharedSink {
    fn write_scenario(&self, report: &ScenarioReport) -> reqres_e2e::E2eResult<()> {
        self.0.write_scenario(report)
    }
}

fn runner(tmp: &TempDir) -> (TestRunner, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let config = RunnerConfig {
        output_dir: tmp.path().to_path_buf(),
        ..Default::default()
    };
    let runner = TestRunner::with_config(config)
        .unwrap()
        .with_sink(Box::new(SharedSink(sink.clone())));
    (runner, sink)
}

async fn run(name: &str) -> (ScenarioResult, Vec<ScenarioReport>) {
    let tmp = TempDir::new().unwrap();
    let (mut runner, sink) = runner(&tmp);
    let result = runner.run_test(name).await.unwrap();
    (result, sink.reports())
}

#[test_case("successful_login_raw_body")]
#[test_case("successful_login")]
#[test_case("successful_login_with_plain_report")]
#[test_case("successful_login_with_templated_report")]
#[test_case("successful_login_with_steps")]
#[test_case("successful_login_with_specs")]
#[test_case("missing_password")]
#[test_case("login_contract_reuse")]
#[test_case("successful_create_user")]
#[test_case("create_user_assigns_identity")]
#[tokio::test]
async fn scenario_passes_against_stub(name: &str) {
    let (result, reports) = run(name).await;
    assert!(result.success, "{} failed: {:?}", name, result.error);
    assert!(!result.steps.is_empty());
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Passed));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].scenario, name);
}

#[tokio::test]
async fn plain_report_attaches_raw_exchange() {
    let (result, _) = run("successful_login_with_plain_report").await;
    let request_step = &result.steps[0];
    assert_eq!(request_step.name, "Make request");

    let names: Vec<&str> = request_step.attachments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Request", "Response"]);
    assert!(request_step.attachments[0].content.starts_with("POST http://127.0.0.1:"));
    assert!(request_step.attachments[1].content.starts_with("HTTP 200"));
    assert_eq!(request_step.attachments[1].media_type, "text/plain");
}

#[tokio::test]
async fn templated_report_attaches_markdown() {
    let (result, _) = run("successful_login_with_templated_report").await;
    let attachments = &result.steps[0].attachments;
    assert_eq!(attachments.len(), 2);
    assert!(attachments.iter().all(|a| a.media_type == "text/markdown"));
    assert!(attachments[1].content.contains("QpwL5tke4Pnpja7X4"));
}

#[tokio::test]
async fn steps_scenario_records_every_step() {
    let (result, _) = run("successful_login_with_steps").await;
    let names: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Prepare credentials",
            "Make request",
            "Check response is a success",
            "Check response token",
        ]
    );
}

#[tokio::test]
async fn wrong_golden_token_fails_the_scenario() {
    let tmp = TempDir::new().unwrap();
    let fixtures = tmp.path().join("fixtures.yaml");
    std::fs::write(
        &fixtures,
        r#"
login:
  email: eve.holt@reqres.in
  password: cityslicka
  token: not-the-token
  alternate_email: janet.weaver@reqres.in
missing_password:
  email: peter@klaven
  error: Missing password
create_user:
  name: morpheus
  job: leader
"#,
    )
    .unwrap();

    let sink = Arc::new(MemorySink::new());
    let mut runner = TestRunner::with_config(RunnerConfig {
        output_dir: tmp.path().to_path_buf(),
        fixtures_path: Some(fixtures),
        ..Default::default()
    })
    .unwrap()
    .with_sink(Box::new(SharedSink(sink.clone())));

    let result = runner.run_test("successful_login_with_specs").await.unwrap();
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("Field mismatch on 'token'"), "{}", error);

    let last = result.steps.last().unwrap();
    assert_eq!(last.name, "Check response token");
    assert_eq!(last.status, StepStatus::Failed);

    // the failing scenario is still reported
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn unknown_scenario_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (mut runner, _) = runner(&tmp);
    assert!(runner.run_test("no_such_scenario").await.is_err());
}

#[tokio::test]
async fn suite_results_are_written() {
    let tmp = TempDir::new().unwrap();
    let (mut runner, _) = runner(&tmp);

    let results = runner.run_tagged("smoke").await.unwrap();
    assert!(results.total >= 4);
    assert_eq!(results.failed, 0, "{:?}", results.results);

    let path = runner.write_results(&results).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["passed"], results.passed);
}

#[tokio::test]
async fn api_key_is_required_by_the_stub_when_configured() {
    let tmp = TempDir::new().unwrap();
    let mut runner = TestRunner::with_config(RunnerConfig {
        output_dir: tmp.path().to_path_buf(),
        api_key: Some("reqres-free-v1".to_string()),
        ..Default::default()
    })
    .unwrap()
    .with_sink(Box::new(MemorySink::new()));

    let result = runner.run_test("missing_password").await.unwrap();
    assert!(result.success, "{:?}", result.error);

    let requests = runner.stub().unwrap().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].api_key.as_deref(), Some("reqres-free-v1"));
    assert_eq!(requests[0].body, r#"{"email":"peter@klaven"}"#);
}
