use crate::error::ReportError;
use crate::time_range::TimeRange;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusoto_ce::{
    CostExplorer, CostExplorerClient, DateInterval, GetCostAndUsageRequest,
    GetCostAndUsageResponse,
};
use std::convert::TryFrom;
use tracing::debug;

const GRANULARITY: &str = "MONTHLY";
const UNBLENDED_COST: &str = "UnblendedCost";

pub struct CostExplorerSpendClient {
    account_id: String,
    client: CostExplorerClient,
}

#[async_trait]
pub trait MonthToDateCost {
    /// Unblended spend from the first of `today`'s month up to (excluding) `today`.
    async fn month_to_date_cost(&self, today: NaiveDate) -> Result<String, ReportError>;
}

#[async_trait]
impl MonthToDateCost for CostExplorerSpendClient {
    async fn month_to_date_cost(&self, today: NaiveDate) -> Result<String, ReportError> {
        let time_range = TimeRange::try_from(today)
            .map_err(|error| ReportError::cost_query(&self.account_id, error))?;
        debug!(
            account_id = %self.account_id,
            start = %time_range.start_date(),
            end = %time_range.end_date(),
            "querying month-to-date cost"
        );

        let response = self
            .client
            .get_cost_and_usage(GetCostAndUsageRequest {
                time_period: DateInterval {
                    start: time_range.start_date(),
                    end: time_range.end_date(),
                },
                granularity: GRANULARITY.to_string(),
                metrics: vec![UNBLENDED_COST.to_string()],
                ..Default::default()
            })
            .await
            .map_err(|error| ReportError::cost_query(&self.account_id, error))?;

        Self::unblended_amount(response).ok_or_else(|| {
            ReportError::cost_query(&self.account_id, "response has no UnblendedCost amount")
        })
    }
}

impl CostExplorerSpendClient {
    pub fn new_with_client(account_id: &str, client: CostExplorerClient) -> Self {
        CostExplorerSpendClient {
            account_id: account_id.to_string(),
            client,
        }
    }

    fn unblended_amount(response: GetCostAndUsageResponse) -> Option<String> {
        response
            .results_by_time?
            .into_iter()
            .next()?
            .total?
            .remove(UNBLENDED_COST)?
            .amount
    }
}

#[cfg(test)]
mod tests {
    use crate::cost_explorer_client::{CostExplorerSpendClient, MonthToDateCost};
    use crate::error::ReportError;
    use chrono::NaiveDate;
    use rusoto_ce::CostExplorerClient;
    use rusoto_core::Region;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };

    fn cost_client(dispatcher: MockRequestDispatcher) -> CostExplorerSpendClient {
        let mock = CostExplorerClient::new_with(dispatcher, MockCredentialsProvider, Region::UsEast1);
        CostExplorerSpendClient::new_with_client("111111111111", mock)
    }

    fn mid_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_month_to_date_cost() {
        let client = cost_client(MockRequestDispatcher::default().with_body(
            &*MockResponseReader::read_response("test_resources/valid", "get_cost_and_usage.json"),
        ));

        let result = client.month_to_date_cost(mid_month()).await;

        assert_eq!(result.unwrap(), "12.34");
    }

    #[tokio::test]
    async fn test_month_to_date_cost_without_results() {
        let client = cost_client(MockRequestDispatcher::default().with_body(
            &*MockResponseReader::read_response(
                "test_resources/valid",
                "get_cost_and_usage_empty.json",
            ),
        ));

        let error = client.month_to_date_cost(mid_month()).await.err().unwrap();

        assert!(matches!(error, ReportError::CostQuery { .. }));
        assert_eq!(error.to_string(), "response has no UnblendedCost amount");
    }

    #[tokio::test]
    async fn test_month_to_date_cost_error() {
        let client = cost_client(MockRequestDispatcher::with_status(400).with_body(
            &*MockResponseReader::read_response("test_resources/error", "get_cost_and_usage.json"),
        ));

        let error = client.month_to_date_cost(mid_month()).await.err().unwrap();

        match error {
            ReportError::CostQuery {
                account_id,
                message,
            } => {
                assert_eq!(account_id, "111111111111");
                assert!(message.contains("Data is not available"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_of_month_skips_query() {
        // A dispatcher that would fail proves no request goes out.
        let client = cost_client(MockRequestDispatcher::with_status(500));

        let error = client
            .month_to_date_cost(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap())
            .await
            .err()
            .unwrap();

        assert!(matches!(error, ReportError::CostQuery { .. }));
        assert!(error.to_string().contains("is empty"));
    }
}
