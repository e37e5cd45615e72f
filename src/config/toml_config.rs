use crate::core::calculator::{monthly_rate_from_annual, MAX_INSTALLMENTS};
use crate::core::schedule::OutputFormat;
use crate::core::{PlanInputProvider, PlanRequest};
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub output: OutputConfig,
    pub defaults: Option<DefaultsConfig>,
    #[serde(default)]
    pub plans: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// May be left out when the caller supplies the directory, e.g. `--output-path`.
    pub path: Option<String>,
    pub formats: Vec<String>,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub interest_rate: Option<f64>,
    pub annual_interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,
    pub total_amount: f64,
    pub down_payment: Option<f64>,
    pub number_of_installments: u32,
    pub interest_rate: Option<f64>,
    pub annual_interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
}

/// A `[[plans]]` entry with defaults and output settings applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    pub name: String,
    pub request: PlanRequest,
    pub start_date: NaiveDate,
    pub formats: Vec<OutputFormat>,
}

impl PlanInputProvider for ResolvedPlan {
    fn plan_name(&self) -> &str {
        &self.name
    }

    fn plan_request(&self) -> PlanRequest {
        self.request
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.clone()
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlanError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlanError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let path = validation::validate_required_field("output.path", &self.output.path)?;
        validation::validate_path("output.path", path)?;
        validation::validate_formats("output.formats", &self.output.formats)?;
        validation::validate_positive_number("plans", self.plans.len(), 1)?;

        if let Some(defaults) = &self.defaults {
            if defaults.interest_rate.is_some() && defaults.annual_interest_rate.is_some() {
                return Err(PlanError::ConfigValidationError {
                    field: "defaults".to_string(),
                    message: "set either interest_rate or annual_interest_rate, not both".to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for (index, plan) in self.plans.iter().enumerate() {
            let field = format!("plans[{}]", index);
            validation::validate_file_stem(&format!("{}.name", field), &plan.name)?;
            if !seen.insert(plan.name.as_str()) {
                return Err(PlanError::InvalidConfigValueError {
                    field: format!("{}.name", field),
                    value: plan.name.clone(),
                    reason: "Duplicate plan name".to_string(),
                });
            }
            if plan.interest_rate.is_some() && plan.annual_interest_rate.is_some() {
                return Err(PlanError::ConfigValidationError {
                    field,
                    message: "set either interest_rate or annual_interest_rate, not both".to_string(),
                });
            }
            validation::validate_range(
                &format!("{}.number_of_installments", field),
                plan.number_of_installments,
                1,
                MAX_INSTALLMENTS,
            )?;
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or_default()
    }

    pub fn json_logs(&self) -> bool {
        self.output.json_logs.unwrap_or(false)
    }

    pub fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        self.output.formats.iter().map(|f| f.parse()).collect()
    }

    fn default_rate(&self) -> f64 {
        match &self.defaults {
            Some(DefaultsConfig {
                interest_rate: Some(rate),
                ..
            }) => *rate,
            Some(DefaultsConfig {
                annual_interest_rate: Some(annual),
                ..
            }) => monthly_rate_from_annual(*annual),
            _ => 0.0,
        }
    }

    fn default_start_date(&self) -> NaiveDate {
        self.defaults
            .as_ref()
            .and_then(|d| d.start_date)
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Applies `[defaults]` and `[output]` to every plan entry.
    pub fn resolved_plans(&self) -> Result<Vec<ResolvedPlan>> {
        let formats = self.output_formats()?;
        let default_rate = self.default_rate();
        let default_start = self.default_start_date();

        Ok(self
            .plans
            .iter()
            .map(|plan| {
                let rate = match (plan.interest_rate, plan.annual_interest_rate) {
                    (Some(rate), _) => rate,
                    (None, Some(annual)) => monthly_rate_from_annual(annual),
                    (None, None) => default_rate,
                };
                ResolvedPlan {
                    name: plan.name.clone(),
                    request: PlanRequest::new(
                        plan.total_amount,
                        plan.down_payment.unwrap_or(0.0),
                        plan.number_of_installments,
                        rate,
                    ),
                    start_date: plan.start_date.unwrap_or(default_start),
                    formats: formats.clone(),
                }
            })
            .collect())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[output]
path = "./plans"
formats = ["csv", "json"]

[defaults]
interest_rate = 0.01
start_date = "2026-01-01"

[[plans]]
name = "retainer"
total_amount = 15000
number_of_installments = 6
interest_rate = 0.02

[[plans]]
name = "litigation"
total_amount = 8000.0
down_payment = 2000.0
number_of_installments = 4
start_date = "2026-02-01"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.output_path(), "./plans");
        assert_eq!(config.plans.len(), 2);
        assert!(config.validate().is_ok());

        let plans = config.resolved_plans().unwrap();
        assert_eq!(plans[0].request.interest_rate, 0.02);
        assert_eq!(plans[0].start_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(plans[1].request.interest_rate, 0.01);
        assert_eq!(plans[1].request.down_payment, 2000.0);
        assert_eq!(plans[1].start_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(plans[1].formats, vec![OutputFormat::Csv, OutputFormat::Json]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PAYPLAN_TEST_OUTPUT", "/tmp/payplan-env");

        let toml_content = r#"
[output]
path = "${PAYPLAN_TEST_OUTPUT}"
formats = ["csv"]

[[plans]]
name = "env"
total_amount = 100
number_of_installments = 1
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/payplan-env");

        std::env::remove_var("PAYPLAN_TEST_OUTPUT");
    }

    #[test]
    fn test_annual_rate_default() {
        let toml_content = r#"
[output]
path = "./plans"
formats = ["tsv"]

[defaults]
annual_interest_rate = 0.24

[[plans]]
name = "annual"
total_amount = 1000
number_of_installments = 3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let plans = config.resolved_plans().unwrap();
        assert!((plans[0].request.interest_rate - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        let duplicate = r#"
[output]
path = "./plans"
formats = ["csv"]

[[plans]]
name = "same"
total_amount = 100
number_of_installments = 2

[[plans]]
name = "same"
total_amount = 200
number_of_installments = 2
"#;
        assert!(TomlConfig::from_toml_str(duplicate).unwrap().validate().is_err());

        let no_plans = r#"
[output]
path = "./plans"
formats = ["csv"]
"#;
        assert!(TomlConfig::from_toml_str(no_plans).unwrap().validate().is_err());

        let bad_format = r#"
[output]
path = "./plans"
formats = ["xlsx"]

[[plans]]
name = "a"
total_amount = 100
number_of_installments = 2
"#;
        assert!(TomlConfig::from_toml_str(bad_format).unwrap().validate().is_err());

        let both_rates = r#"
[output]
path = "./plans"
formats = ["csv"]

[[plans]]
name = "a"
total_amount = 100
number_of_installments = 2
interest_rate = 0.01
annual_interest_rate = 0.12
"#;
        assert!(TomlConfig::from_toml_str(both_rates).unwrap().validate().is_err());

        let too_long = r#"
[output]
path = "./plans"
formats = ["csv"]

[[plans]]
name = "a"
total_amount = 100
number_of_installments = 601
"#;
        assert!(TomlConfig::from_toml_str(too_long).unwrap().validate().is_err());
    }

    #[test]
    fn test_missing_output_path_is_reported() {
        let toml_content = r#"
[output]
formats = ["csv"]

[[plans]]
name = "a"
total_amount = 100
number_of_installments = 2
"#;

        let mut config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PlanError::MissingConfigError { ref field }) if field == "output.path"
        ));

        config.output.path = Some("./override".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.output_path(), "./override");
    }

    #[test]
    fn test_plan_name_cannot_escape_output_directory() {
        let toml_content = r#"
[output]
path = "./plans"
formats = ["csv"]

[[plans]]
name = "../outside"
total_amount = 100
number_of_installments = 2
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PlanError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[output\npath = 1").unwrap_err();
        assert!(matches!(err, PlanError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.plans[0].name, "retainer");
    }
}
