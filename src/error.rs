use chrono::NaiveDate;
use std::fmt::Display;
use thiserror::Error;

/// Failures that can happen while building a report.
///
/// The three account-level variants display as the bare upstream message,
/// which is what ends up in the JSON body.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{message}")]
    RoleAssumption { account_id: String, message: String },
    #[error("{message}")]
    Listing { account_id: String, message: String },
    #[error("{message}")]
    CostQuery { account_id: String, message: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ReportError {
    pub fn role_assumption(account_id: &str, error: impl Display) -> Self {
        ReportError::RoleAssumption {
            account_id: account_id.to_string(),
            message: error.to_string(),
        }
    }

    pub fn listing(account_id: &str, error: impl Display) -> Self {
        ReportError::Listing {
            account_id: account_id.to_string(),
            message: error.to_string(),
        }
    }

    pub fn cost_query(account_id: &str, error: impl Display) -> Self {
        ReportError::CostQuery {
            account_id: account_id.to_string(),
            message: error.to_string(),
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        match self {
            ReportError::RoleAssumption { account_id, .. }
            | ReportError::Listing { account_id, .. }
            | ReportError::CostQuery { account_id, .. } => Some(account_id),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ReportError {
    fn from(e: config::ConfigError) -> ReportError {
        ReportError::Config(e.to_string())
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum TimeRangeError {
    #[error("time period from {0} to {0} is empty")]
    Empty(NaiveDate),
    #[error("no first day of month for {0}")]
    NoneValue(NaiveDate),
}
