//! `/login` scenarios

use futures::future::BoxFuture;
use futures::FutureExt;

use reqres_common::contract::{
    build_response_contract, login_request_spec, login_response_spec, missing_password_400_spec,
};
use reqres_common::{ApiErrorBody, LoginCredentials, LoginOutcome, LoginResult};

use crate::assert::{expect_eq, expect_present};
use crate::client::RequestBody;
use crate::error::{E2eError, E2eResult};
use crate::report::ExchangeFilter;
use crate::scenario::{Scenario, ScenarioContext};

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "successful_login_raw_body",
            description: "Login with a hand-written JSON string body",
            tags: &["login", "smoke"],
            run: successful_login_raw_body,
        },
        Scenario {
            name: "successful_login",
            description: "Login with a model body against an absolute URL",
            tags: &["login"],
            run: successful_login,
        },
        Scenario {
            name: "successful_login_with_plain_report",
            description: "Login with raw request/response attachments",
            tags: &["login", "report"],
            run: successful_login_with_plain_report,
        },
        Scenario {
            name: "successful_login_with_templated_report",
            description: "Login with templated request/response attachments",
            tags: &["login", "report"],
            run: successful_login_with_templated_report,
        },
        Scenario {
            name: "successful_login_with_steps",
            description: "Login split into explicit named steps",
            tags: &["login", "report"],
            run: successful_login_with_steps,
        },
        Scenario {
            name: "successful_login_with_specs",
            description: "Login validated by the shared login response contract",
            tags: &["login", "contract", "smoke"],
            run: successful_login_with_specs,
        },
        Scenario {
            name: "missing_password",
            description: "Login without a password is rejected with 400",
            tags: &["login", "negative", "smoke"],
            run: missing_password,
        },
        Scenario {
            name: "login_contract_reuse",
            description: "One response contract validates two different successful logins",
            tags: &["login", "contract"],
            run: login_contract_reuse,
        },
    ]
}

/// Token of a successful login; an error body, or one carrying both fields, fails
fn success_token(login: &LoginResult) -> E2eResult<&str> {
    match login.outcome()? {
        LoginOutcome::Token(token) => Ok(token),
        LoginOutcome::Error(error) => Err(E2eError::AssertionFailed(format!(
            "expected a token, got error {:?}",
            error
        ))),
    }
}

fn successful_login_raw_body(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let fixture = &ctx.fixtures.login;
        let auth_data = format!(
            r#"{{ "email": "{}", "password": "{}" }}"#,
            fixture.email, fixture.password
        );
        let spec = login_request_spec(&ctx.base);

        let login = ctx
            .reporter
            .step("Make request", || async move {
                ctx.post_validated(
                    &spec,
                    "/login",
                    RequestBody::raw(auth_data.as_str()),
                    ctx.filter,
                    &login_response_spec(),
                )
                .await?
                .extract::<LoginResult>()
            })
            .await?;

        ctx.reporter.step_sync("Check response token", || {
            expect_eq("token", fixture.token.as_str(), success_token(&login)?)
        })
    }
    .boxed()
}

/// Absolute URL, explicit 200 check, status and body logged
async fn login_with_filter(ctx: &ScenarioContext, filter: ExchangeFilter) -> E2eResult<()> {
    let fixture = &ctx.fixtures.login;
    let auth_data = LoginCredentials::new(fixture.email.as_str(), fixture.password.as_str());
    let spec = login_request_spec(&ctx.base);
    let url = spec.url_for("/login");

    let login = ctx
        .reporter
        .step("Make request", || async move {
            let exchange = ctx
                .post_validated(
                    &spec,
                    &url,
                    RequestBody::json(&auth_data)?,
                    filter,
                    &build_response_contract(200),
                )
                .await?;
            exchange.log_status().log_body();
            exchange.extract::<LoginResult>()
        })
        .await?;

    ctx.reporter.step_sync("Check response token", || {
        expect_eq("token", fixture.token.as_str(), success_token(&login)?)
    })
}

fn successful_login(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    login_with_filter(ctx, ctx.filter).boxed()
}

fn successful_login_with_plain_report(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    login_with_filter(ctx, ExchangeFilter::Plain).boxed()
}

fn successful_login_with_templated_report(
    ctx: &ScenarioContext,
) -> BoxFuture<'_, E2eResult<()>> {
    login_with_filter(ctx, ExchangeFilter::Templated).boxed()
}

fn successful_login_with_steps(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let fixture = &ctx.fixtures.login;
        let spec = login_request_spec(&ctx.base);

        let auth_data = ctx.reporter.step_sync("Prepare credentials", || {
            RequestBody::json(&LoginCredentials::new(
                fixture.email.as_str(),
                fixture.password.as_str(),
            ))
        })?;

        let login = ctx
            .reporter
            .step("Make request", || async move {
                ctx.post_validated(
                    &spec,
                    "/login",
                    auth_data,
                    ExchangeFilter::Templated,
                    &build_response_contract(200),
                )
                .await?
                .extract::<LoginResult>()
            })
            .await?;

        let token = ctx
            .reporter
            .step_sync("Check response is a success", || success_token(&login))?;

        ctx.reporter.step_sync("Check response token", || {
            expect_eq("token", fixture.token.as_str(), token)
        })
    }
    .boxed()
}

fn successful_login_with_specs(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let fixture = &ctx.fixtures.login;
        let auth_data = LoginCredentials::new(fixture.email.as_str(), fixture.password.as_str());
        let spec = login_request_spec(&ctx.base);

        let login = ctx
            .reporter
            .step("Make request", || async move {
                ctx.post_validated(
                    &spec,
                    "/login",
                    RequestBody::json(&auth_data)?,
                    ctx.filter,
                    &login_response_spec(),
                )
                .await?
                .extract::<LoginResult>()
            })
            .await?;

        ctx.reporter.step_sync("Check response token", || {
            expect_eq("token", fixture.token.as_str(), success_token(&login)?)
        })
    }
    .boxed()
}

fn missing_password(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let fixture = &ctx.fixtures.missing_password;
        let auth_data = LoginCredentials::email_only(fixture.email.as_str());
        let spec = login_request_spec(&ctx.base);

        let response = ctx
            .reporter
            .step("Make request", || async move {
                ctx.post_validated(
                    &spec,
                    "/login",
                    RequestBody::json(&auth_data)?,
                    ctx.filter,
                    &missing_password_400_spec(),
                )
                .await?
                .extract::<ApiErrorBody>()
            })
            .await?;

        ctx.reporter.step_sync("Check response 400", || {
            expect_eq("error", fixture.error.as_str(), response.error.as_str())
        })
    }
    .boxed()
}

fn login_contract_reuse(ctx: &ScenarioContext) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let fixture = &ctx.fixtures.login;
        let spec = &login_request_spec(&ctx.base);
        let contract = &login_response_spec();

        for email in [fixture.email.as_str(), fixture.alternate_email.as_str()] {
            let auth_data = LoginCredentials::new(email, fixture.password.as_str());
            let login = ctx
                .reporter
                .step(&format!("Login as {}", email), || async move {
                    ctx.post_validated(
                        spec,
                        "/login",
                        RequestBody::json(&auth_data)?,
                        ctx.filter,
                        contract,
                    )
                    .await?
                    .extract::<LoginResult>()
                })
                .await?;

            ctx.reporter.step_sync("Check token present", || {
                expect_present("token", Some(success_token(&login)?)).map(|_| ())
            })?;
        }
        Ok(())
    }
    .boxed()
}
