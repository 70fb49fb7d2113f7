use crate::error::ReportError;
use crate::report::InstanceSummary;
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_ec2::{DescribeInstancesRequest, Ec2, Ec2Client, Instance};
use tracing::{debug, warn};

pub struct Ec2InstanceClient {
    account_id: String,
    client: Ec2Client,
    region: Region,
}

#[async_trait]
pub trait Describe {
    async fn describe_all_instances(&self) -> Result<Vec<InstanceSummary>, ReportError>;
}

#[async_trait]
impl Describe for Ec2InstanceClient {
    async fn describe_all_instances(&self) -> Result<Vec<InstanceSummary>, ReportError> {
        let result = self
            .client
            .describe_instances(DescribeInstancesRequest::default())
            .await
            .map_err(|error| ReportError::listing(&self.account_id, error))?;

        // Only the first page is reported.
        if result.next_token.is_some() {
            warn!(
                account_id = %self.account_id,
                "instance listing has more pages; reporting the first page only"
            );
        }

        let mut instances = Vec::<InstanceSummary>::new();
        for reservation in result.reservations.unwrap_or_default() {
            for instance in reservation.instances.unwrap_or_default() {
                instances.push(self.summarize(instance)?);
            }
        }
        debug!(account_id = %self.account_id, count = instances.len(), "listed instances");
        Ok(instances)
    }
}

impl Ec2InstanceClient {
    pub fn new_with_client(account_id: &str, client: Ec2Client, region: Region) -> Self {
        Ec2InstanceClient {
            account_id: account_id.to_string(),
            client,
            region,
        }
    }

    fn summarize(&self, instance: Instance) -> Result<InstanceSummary, ReportError> {
        let missing =
            |field: &str| ReportError::listing(&self.account_id, format!("instance has no {}", field));

        Ok(InstanceSummary {
            instance_id: instance.instance_id.ok_or_else(|| missing("InstanceId"))?,
            instance_type: instance.instance_type.ok_or_else(|| missing("InstanceType"))?,
            state: instance
                .state
                .and_then(|state| state.name)
                .ok_or_else(|| missing("State"))?,
            region: self.region.name().to_string(),
        })
    }
}
