use crate::error::ReportError;
use rusoto_core::Region;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::TryFrom;
use std::str::FromStr;

const ENV_PREFIX: &str = "COST_REPORT";
const ACCOUNT_ID_SEPARATOR: &str = ",";

// Placeholders; deployments set COST_REPORT_ACCOUNT_IDS.
const DEFAULT_ACCOUNT_IDS: [&str; 2] = ["# Account A", "# Account B"];
const DEFAULT_ROLE_NAME: &str = "CrossAccountReadRole";
const DEFAULT_SESSION_NAME: &str = "CrossAccountSession";
const DEFAULT_COST_REGION: &str = "us-east-1";
const DEFAULT_ALLOW_ORIGIN: &str = "*";
const DEFAULT_ALLOW_HEADERS: &str = "*";
const DEFAULT_ALLOW_METHODS: &str = "GET,OPTIONS";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsHeaders {
    #[serde(rename = "Access-Control-Allow-Origin")]
    pub allow_origin: String,
    #[serde(rename = "Access-Control-Allow-Headers")]
    pub allow_headers: String,
    #[serde(rename = "Access-Control-Allow-Methods")]
    pub allow_methods: String,
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self {
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_string(),
            allow_headers: DEFAULT_ALLOW_HEADERS.to_string(),
            allow_methods: DEFAULT_ALLOW_METHODS.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawReportConfig {
    account_ids: String,
    role_name: String,
    session_name: String,
    cost_region: String,
    allow_origin: String,
    allow_headers: String,
    allow_methods: String,
}

/// Settings for one deployment of the report function.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub account_ids: Vec<String>,
    pub role_name: String,
    pub session_name: String,
    pub cost_region: Region,
    pub cors: CorsHeaders,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            account_ids: DEFAULT_ACCOUNT_IDS.iter().map(|id| id.to_string()).collect(),
            role_name: DEFAULT_ROLE_NAME.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            cost_region: Region::UsEast1,
            cors: CorsHeaders::default(),
        }
    }
}

impl TryFrom<RawReportConfig> for ReportConfig {
    type Error = ReportError;

    fn try_from(raw: RawReportConfig) -> Result<Self, Self::Error> {
        let account_ids: Vec<String> = raw
            .account_ids
            .split(ACCOUNT_ID_SEPARATOR)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        let mut seen = HashSet::new();
        if let Some(duplicate) = account_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ReportError::Config(format!(
                "duplicate account id {}",
                duplicate
            )));
        }

        let role_name = raw.role_name.trim().to_string();
        if role_name.is_empty() {
            return Err(ReportError::Config("role name is empty".to_string()));
        }

        let cost_region = Region::from_str(raw.cost_region.trim()).map_err(|error| {
            ReportError::Config(format!("cost region {}: {}", raw.cost_region, error))
        })?;

        Ok(ReportConfig {
            account_ids,
            role_name,
            session_name: raw.session_name,
            cost_region,
            cors: CorsHeaders {
                allow_origin: raw.allow_origin,
                allow_headers: raw.allow_headers,
                allow_methods: raw.allow_methods,
            },
        })
    }
}

impl ReportConfig {
    /// Load from `COST_REPORT_*` environment variables, falling back to the built-in defaults.
    pub fn from_env() -> Result<Self, ReportError> {
        Self::from_source(environment())
    }

    fn from_source(environment: config::Environment) -> Result<Self, ReportError> {
        let raw: RawReportConfig = config::Config::builder()
            .set_default("account_ids", DEFAULT_ACCOUNT_IDS.join(ACCOUNT_ID_SEPARATOR))?
            .set_default("role_name", DEFAULT_ROLE_NAME)?
            .set_default("session_name", DEFAULT_SESSION_NAME)?
            .set_default("cost_region", DEFAULT_COST_REGION)?
            .set_default("allow_origin", DEFAULT_ALLOW_ORIGIN)?
            .set_default("allow_headers", DEFAULT_ALLOW_HEADERS)?
            .set_default("allow_methods", DEFAULT_ALLOW_METHODS)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        ReportConfig::try_from(raw)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
}

#[cfg(test)]
mod tests {
    use crate::config::{environment, CorsHeaders, ReportConfig};
    use crate::error::ReportError;
    use rusoto_core::Region;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ReportConfig, ReportError> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ReportConfig::from_source(environment().source(Some(source)))
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.account_ids, vec!["# Account A", "# Account B"]);
        assert_eq!(config.role_name, "CrossAccountReadRole");
        assert_eq!(config.session_name, "CrossAccountSession");
        assert_eq!(config.cost_region, Region::UsEast1);
        assert_eq!(config.cors, CorsHeaders::default());
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = load(&[
            ("COST_REPORT_ACCOUNT_IDS", "111111111111, 222222222222,"),
            ("COST_REPORT_ROLE_NAME", "ReadOnlyAuditRole"),
            ("COST_REPORT_ALLOW_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.account_ids, vec!["111111111111", "222222222222"]);
        assert_eq!(config.role_name, "ReadOnlyAuditRole");
        assert_eq!(config.cors.allow_origin, "http://localhost:5173");
        assert_eq!(config.cors.allow_methods, "GET,OPTIONS");
    }

    #[test]
    fn test_single_numeric_account_id_stays_a_string() {
        let config = load(&[("COST_REPORT_ACCOUNT_IDS", "012345678901")]).unwrap();

        assert_eq!(config.account_ids, vec!["012345678901"]);
    }

    #[test]
    fn test_duplicate_account_ids_are_rejected() {
        let result = load(&[("COST_REPORT_ACCOUNT_IDS", "111111111111,111111111111")]);

        assert!(matches!(result, Err(ReportError::Config(_))));
    }

    #[test]
    fn test_empty_role_name_is_rejected() {
        let result = load(&[("COST_REPORT_ROLE_NAME", "  ")]);

        match result {
            Err(ReportError::Config(message)) => assert_eq!(message, "role name is empty"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_cost_region_is_rejected() {
        let result = load(&[("COST_REPORT_COST_REGION", "moon-central-1")]);

        assert!(matches!(result, Err(ReportError::Config(_))));
    }
}
