use crate::config::ReportConfig;
use crate::cost_explorer_client::MonthToDateCost;
use crate::ec2_instance_client::Describe;
use crate::error::ReportError;
use crate::report::{AccountReport, InstanceSummary, Report, ReportResponse};
use crate::scoped_session::{ScopedClients, ScopedSession};
use crate::sts_role_client::AssumeRole;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Walks the configured accounts one at a time and collects their reports.
///
/// No account failure aborts the run; each one is recorded in that account's entry.
pub struct ReportGenerator<A, C> {
    config: ReportConfig,
    role_client: A,
    clients: C,
}

impl<A, C> ReportGenerator<A, C>
where
    A: AssumeRole + Sync,
    C: ScopedClients + Sync,
{
    pub fn new(config: ReportConfig, role_client: A, clients: C) -> Self {
        ReportGenerator {
            config,
            role_client,
            clients,
        }
    }

    pub async fn generate(&self, today: NaiveDate) -> Report {
        let mut report = Report::with_capacity(self.config.account_ids.len());
        for account_id in &self.config.account_ids {
            info!(account_id = %account_id, "collecting account report");
            let account_report = match self.role_client.assume_role(account_id).await {
                Ok(session) => self.collect(account_id, &session, today).await,
                Err(error) => {
                    log_failure("role assumption", &error);
                    AccountReport::failed(&error)
                }
            };
            report.insert(account_id.clone(), account_report);
        }
        report
    }

    /// Builds the full report and wraps it in the response envelope.
    pub async fn respond(&self, today: NaiveDate) -> Result<ReportResponse, ReportError> {
        let report = self.generate(today).await;
        if report.is_empty() {
            warn!("no accounts configured");
        }
        info!(accounts = report.len(), "report ready");
        let body = serde_json::to_string(&report)?;
        Ok(ReportResponse::ok(self.config.cors.clone(), body))
    }

    async fn collect(
        &self,
        account_id: &str,
        session: &ScopedSession,
        today: NaiveDate,
    ) -> AccountReport {
        debug!(
            account_id = %account_id,
            access_key_id = %session.access_key_id(),
            expires = %session.expiration(),
            "assumed role"
        );
        let instances = self.list_instances(account_id, session).await;
        if let Err(error) = &instances {
            log_failure("instance listing", error);
        }

        let cost = self.fetch_cost(account_id, session, today).await;
        if let Err(error) = &cost {
            log_failure("cost query", error);
        }

        AccountReport::collected(instances, cost)
    }

    async fn list_instances(
        &self,
        account_id: &str,
        session: &ScopedSession,
    ) -> Result<Vec<InstanceSummary>, ReportError> {
        let client = self.clients.instances(account_id, session)?;
        client.describe_all_instances().await
    }

    async fn fetch_cost(
        &self,
        account_id: &str,
        session: &ScopedSession,
        today: NaiveDate,
    ) -> Result<String, ReportError> {
        let client = self.clients.cost(account_id, session)?;
        client.month_to_date_cost(today).await
    }
}

fn log_failure(stage: &str, error: &ReportError) {
    warn!(
        account_id = error.account_id().unwrap_or_default(),
        stage,
        error = %error,
        "account step failed"
    );
}
