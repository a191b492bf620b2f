//! `/users` scenarios

use futures::future::BoxFuture;
use futures::FutureExt;

use reqres_common::contract::{create_user_request_spec, create_user_response_spec};
use reqres_common::{UserCreationRequest, UserCreationResult};

use crate::assert::{expect_eq, expect_present};
use crate::client::RequestBody;
use crate::error::{E2eError, E2eResult};
use crate::report::ExchangeFilter;
use crate::scenario::{Scenario, ScenarioContext};

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "successful_create_user",
            description: "Create a user and check the echoed name",
            tags: &["users", "smoke"],
            run: successful_create_user,
        },
        Scenario {
            name: "create_user_assigns_identity",
            description: "Created users carry a server-assigned id and timestamp",
            tags: &["users", "contract"],
            run: create_user_assigns_identity,
        },
    ]
}

async fn create_user(
    ctx: &ScenarioContext,
    filter: ExchangeFilter,
) -> E2eResult<UserCreationResult> {
    let fixture = &ctx.fixtures.create_user;
    let user_data = UserCreationRequest::new(fixture.name.as_str(), fixture.job.as_str());
    let spec = create_user_request_spec(&ctx.base);
    let url = spec.url_for("/users");

    ctx.reporter
        .step("Make request", || async move {
            let exchange = ctx
                .post_validated(
                    &spec,
                    &url,
                    RequestBody::json(&user_data)?,
                    filter,
                    &create_user_response_spec(),
                )
                .await?;
            exchange.log_status().log_body();
            exchange.extract::<UserCreationResult>()
        })
        .await
}

fn successful_create_user(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let created = create_user(ctx, ExchangeFilter::Plain).await?;
        let expected = ctx.fixtures.create_user.name.as_str();

        ctx.reporter.step_sync("Check response name", || {
            expect_eq("name", expected, created.name.as_str())
        })
    }
    .boxed()
}

// Creation is not idempotent: ids are only checked for presence, never compared.
fn create_user_assigns_identity(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let created = create_user(ctx, ctx.filter).await?;

        ctx.reporter.step_sync("Check echoed fields", || {
            expect_eq("name", ctx.fixtures.create_user.name.as_str(), created.name.as_str())?;
            expect_eq("job", ctx.fixtures.create_user.job.as_str(), created.job.as_str())
        })?;

        ctx.reporter.step_sync("Check server-assigned fields", || {
            expect_present("id", Some(created.id.as_str()))?;
            created.created_at_timestamp().map(|_| ()).map_err(E2eError::from)
        })
    }
    .boxed()
}
