use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::scoped_session::ScopedSession;
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_sts::{AssumeRoleRequest, Sts, StsClient};
use tracing::debug;

pub struct StsRoleClient {
    client: StsClient,
    role_name: String,
    session_name: String,
    region: Region,
}

#[async_trait]
pub trait AssumeRole {
    async fn assume_role(&self, account_id: &str) -> Result<ScopedSession, ReportError>;
}

#[async_trait]
impl AssumeRole for StsRoleClient {
    async fn assume_role(&self, account_id: &str) -> Result<ScopedSession, ReportError> {
        let role_arn = self.role_arn(account_id);
        debug!(account_id = %account_id, role_arn = %role_arn, "assuming role");

        let response = self
            .client
            .assume_role(AssumeRoleRequest {
                role_arn,
                role_session_name: self.session_name.clone(),
                ..AssumeRoleRequest::default()
            })
            .await
            .map_err(|error| ReportError::role_assumption(account_id, error))?;

        let credentials = response.credentials.ok_or_else(|| {
            ReportError::role_assumption(account_id, "AssumeRole returned no credentials")
        })?;

        Ok(ScopedSession::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            credentials.session_token,
            credentials.expiration,
            self.region.clone(),
        ))
    }
}

impl StsRoleClient {
    /// `region` is where the assumed sessions operate, normally the caller's own.
    pub fn new_with_client(client: StsClient, config: &ReportConfig, region: Region) -> Self {
        StsRoleClient {
            client,
            role_name: config.role_name.clone(),
            session_name: config.session_name.clone(),
            region,
        }
    }

    fn role_arn(&self, account_id: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", account_id, self.role_name)
    }
}
