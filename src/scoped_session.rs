use crate::cost_explorer_client::{CostExplorerSpendClient, MonthToDateCost};
use crate::ec2_instance_client::{Describe, Ec2InstanceClient};
use crate::error::ReportError;
use rusoto_ce::CostExplorerClient;
use rusoto_core::credential::StaticProvider;
use rusoto_core::{HttpClient, Region};
use rusoto_ec2::Ec2Client;
use std::fmt;

/// Temporary credentials for one target account, valid until `expiration`.
#[derive(Clone)]
pub struct ScopedSession {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
    region: Region,
}

impl ScopedSession {
    pub fn new(
        access_key_id: String,
        secret_access_key: String,
        session_token: String,
        expiration: String,
        region: Region,
    ) -> Self {
        ScopedSession {
            access_key_id,
            secret_access_key,
            session_token,
            expiration,
            region,
        }
    }

    pub fn credentials_provider(&self) -> StaticProvider {
        StaticProvider::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            Some(self.session_token.clone()),
            None,
        )
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

// Secrets stay out of logs.
impl fmt::Debug for ScopedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSession")
            .field("access_key_id", &self.access_key_id)
            .field("expiration", &self.expiration)
            .field("region", &self.region)
            .finish()
    }
}

/// Builds the per-account upstream clients from an assumed session.
pub trait ScopedClients {
    type Instances: Describe + Send + Sync;
    type Cost: MonthToDateCost + Send + Sync;

    fn instances(
        &self,
        account_id: &str,
        session: &ScopedSession,
    ) -> Result<Self::Instances, ReportError>;

    fn cost(&self, account_id: &str, session: &ScopedSession) -> Result<Self::Cost, ReportError>;
}

pub struct RusotoScopedClients {
    cost_region: Region,
}

impl RusotoScopedClients {
    pub fn new(cost_region: Region) -> Self {
        RusotoScopedClients { cost_region }
    }
}

impl ScopedClients for RusotoScopedClients {
    type Instances = Ec2InstanceClient;
    type Cost = CostExplorerSpendClient;

    fn instances(
        &self,
        account_id: &str,
        session: &ScopedSession,
    ) -> Result<Self::Instances, ReportError> {
        let dispatcher =
            HttpClient::new().map_err(|error| ReportError::listing(account_id, error))?;
        let client = Ec2Client::new_with(
            dispatcher,
            session.credentials_provider(),
            session.region().clone(),
        );
        Ok(Ec2InstanceClient::new_with_client(
            account_id,
            client,
            session.region().clone(),
        ))
    }

    fn cost(&self, account_id: &str, session: &ScopedSession) -> Result<Self::Cost, ReportError> {
        let dispatcher =
            HttpClient::new().map_err(|error| ReportError::cost_query(account_id, error))?;
        let client = CostExplorerClient::new_with(
            dispatcher,
            session.credentials_provider(),
            self.cost_region.clone(),
        );
        Ok(CostExplorerSpendClient::new_with_client(account_id, client))
    }
}
