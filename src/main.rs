mod config;
mod cost_explorer_client;
mod ec2_instance_client;
mod error;
mod report;
mod report_generator;
mod scoped_session;
mod sts_role_client;
mod time_range;

use crate::config::ReportConfig;
use crate::report::ReportResponse;
use crate::report_generator::ReportGenerator;
use crate::scoped_session::{RusotoScopedClients, ScopedClients};
use crate::sts_role_client::{AssumeRole, StsRoleClient};
use anyhow::{anyhow, Context as _};
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rusoto_core::credential::DefaultCredentialsProvider;
use rusoto_core::{HttpClient, Region};
use rusoto_sts::StsClient;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FORMAT_VAR: &str = "COST_REPORT_LOG_FORMAT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ReportConfig::from_env().context("failed to load configuration")?;
    let region = Region::default();
    info!(
        accounts = config.account_ids.len(),
        region = %region.name(),
        "starting cost reporter"
    );

    let sts = StsClient::new_with(
        HttpClient::new().context("failed to build HTTP client")?,
        DefaultCredentialsProvider::new().context("failed to build credentials provider")?,
        region.clone(),
    );
    let role_client = StsRoleClient::new_with_client(sts, &config, region);
    let clients = RusotoScopedClients::new(config.cost_region.clone());
    let generator = ReportGenerator::new(config, role_client, clients);

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        report_handler(&generator, event)
    }))
    .await
    .map_err(|error| anyhow!(error))
}

async fn report_handler<A, C>(
    generator: &ReportGenerator<A, C>,
    event: LambdaEvent<Value>,
) -> Result<ReportResponse, Error>
where
    A: AssumeRole + Sync,
    C: ScopedClients + Sync,
{
    let (_, context) = event.into_parts();
    info!(request_id = %context.request_id, "generating cross-account report");

    let response = generator.respond(Utc::now().date_naive()).await?;
    Ok(response)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match std::env::var(LOG_FORMAT_VAR) {
        Ok(format) if format.eq_ignore_ascii_case("json") => builder.json().init(),
        _ => builder.init(),
    }
}
