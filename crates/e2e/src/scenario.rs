//! Scenario registry
//!
//! A scenario is one complete test case: build a request model, send it,
//! validate the response against a contract, deserialize it and assert on a
//! field or two. Scenarios are plain functions listed explicitly in
//! [`registry`]; the runner decides which of them to execute.

use std::fmt;

use futures::future::BoxFuture;

use reqres_common::{BaseConfig, RequestContract, ResponseContract};

use crate::client::{ApiClient, Exchange, RequestBody};
use crate::error::E2eResult;
use crate::fixtures::Fixtures;
use crate::report::{ExchangeFilter, Reporter};
use crate::scenarios;

/// Entry point of a scenario
pub type ScenarioFn = for<'a> fn(&'a ScenarioContext) -> BoxFuture<'a, E2eResult<()>>;

/// A registered scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Tags for filtering
    pub tags: &'static [&'static str],

    pub run: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios.iter().filter(|s| s.has_tag(tag)).collect()
    }
}

/// Everything a scenario may use; built fresh for every run
pub struct ScenarioContext {
    pub client: ApiClient,
    pub base: BaseConfig,
    pub fixtures: Fixtures,
    pub reporter: Reporter,

    /// Attachment filter for scenarios that do not choose their own
    pub filter: ExchangeFilter,
}

impl ScenarioContext {
    /// POSTs `body`, attaches the exchange, then validates it against `expected`.
    ///
    /// The exchange is attached before validation so that a failing response
    /// still shows up in the report.
    pub async fn post_validated(
        &self,
        request: &RequestContract,
        path: &str,
        body: RequestBody,
        filter: ExchangeFilter,
        expected: &ResponseContract,
    ) -> E2eResult<Exchange> {
        let exchange = self.client.post(request, path, body).await?;
        self.reporter.attach_exchange(filter, &exchange);
        exchange.validate(expected)?;
        Ok(exchange)
    }
}

/// Every scenario, in execution order
pub fn registry() -> Vec<Scenario> {
    let mut all = scenarios::login::scenarios();
    all.extend(scenarios::users::scenarios());
    all
}

/// Looks a scenario up by name
pub fn find(name: &str) -> Option<Scenario> {
    registry().into_iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let all = registry();
        let names: HashSet<_> = all.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_filter_by_tag() {
        let all = registry();
        let users = Scenario::filter_by_tag(&all, "users");
        assert!(!users.is_empty());
        assert!(users.iter().all(|s| s.has_tag("users")));
        assert!(Scenario::filter_by_tag(&all, "no-such-tag").is_empty());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("missing_password").map(|s| s.name), Some("missing_password"));
        assert!(find("nope").is_none());
    }
}
