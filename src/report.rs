use crate::config::CorsHeaders;
use crate::error::ReportError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const COST_ERROR_PREFIX: &str = "Cost Error: ";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceSummary {
    pub instance_id: String,
    pub instance_type: String,
    pub state: String,
    pub region: String,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InstanceListing {
    Instances(Vec<InstanceSummary>),
    Failed { error: String },
}

impl From<Result<Vec<InstanceSummary>, ReportError>> for InstanceListing {
    fn from(result: Result<Vec<InstanceSummary>, ReportError>) -> Self {
        match result {
            Ok(instances) => InstanceListing::Instances(instances),
            Err(error) => InstanceListing::Failed {
                error: error.to_string(),
            },
        }
    }
}

/// One account's entry in the report body.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccountReport {
    Failed {
        error: String,
    },
    Collected {
        #[serde(rename = "EC2")]
        ec2: InstanceListing,
        #[serde(rename = "CostUSD")]
        cost_usd: String,
    },
}

impl AccountReport {
    pub fn failed(error: &ReportError) -> Self {
        AccountReport::Failed {
            error: error.to_string(),
        }
    }

    pub fn collected(
        instances: Result<Vec<InstanceSummary>, ReportError>,
        cost: Result<String, ReportError>,
    ) -> Self {
        AccountReport::Collected {
            ec2: InstanceListing::from(instances),
            cost_usd: cost.unwrap_or_else(|error| format!("{}{}", COST_ERROR_PREFIX, error)),
        }
    }
}

/// Account reports keyed by account id, serialized in insertion order.
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    accounts: Vec<(String, AccountReport)>,
}

impl Report {
    pub fn with_capacity(capacity: usize) -> Self {
        Report {
            accounts: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, account_id: String, report: AccountReport) {
        match self.accounts.iter_mut().find(|(id, _)| *id == account_id) {
            Some(entry) => entry.1 = report,
            None => self.accounts.push((account_id, report)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, account_id: &str) -> Option<&AccountReport> {
        self.accounts
            .iter()
            .find(|(id, _)| id == account_id)
            .map(|(_, report)| report)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.accounts.len()))?;
        for (account_id, report) in &self.accounts {
            map.serialize_entry(account_id, report)?;
        }
        map.end()
    }
}

/// Envelope returned to the Lambda proxy integration.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub status_code: u16,
    pub headers: CorsHeaders,
    pub body: String,
}

impl ReportResponse {
    pub fn ok(headers: CorsHeaders, body: String) -> Self {
        ReportResponse {
            status_code: 200,
            headers,
            body,
        }
    }
}
