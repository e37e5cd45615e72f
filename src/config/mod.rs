pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::calculator::monthly_rate_from_annual;
#[cfg(feature = "cli")]
use crate::core::schedule::OutputFormat;
#[cfg(feature = "cli")]
use crate::core::{PlanInputProvider, PlanRequest};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use chrono::{NaiveDate, Utc};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "payplan")]
#[command(about = "Calculate a fixed-payment installment plan")]
pub struct CliConfig {
    /// Name of the plan, used for output file names
    #[arg(long, default_value = "payment-plan")]
    pub name: String,

    /// Total price before the down payment
    #[arg(long, allow_negative_numbers = true)]
    pub total: f64,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub down_payment: f64,

    #[arg(long)]
    pub installments: u32,

    /// Monthly interest rate as a decimal fraction, e.g. 0.02
    #[arg(long, allow_negative_numbers = true, conflicts_with = "annual_rate")]
    pub rate: Option<f64>,

    /// Annual interest rate, divided by 12 to get the monthly rate
    #[arg(long, allow_negative_numbers = true)]
    pub annual_rate: Option<f64>,

    /// Day due dates are counted from (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long, default_value = "./plans")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Print the schedule without writing files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn monthly_rate(&self) -> f64 {
        match (self.rate, self.annual_rate) {
            (Some(rate), _) => rate,
            (None, Some(annual)) => monthly_rate_from_annual(annual),
            (None, None) => 0.0,
        }
    }
}

#[cfg(feature = "cli")]
impl PlanInputProvider for CliConfig {
    fn plan_name(&self) -> &str {
        &self.name
    }

    fn plan_request(&self) -> PlanRequest {
        PlanRequest::new(
            self.total,
            self.down_payment,
            self.installments,
            self.monthly_rate(),
        )
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.iter().filter_map(|f| f.parse().ok()).collect()
    }
}

// Amount and rate checks belong to the calculator; this only covers the CLI surface.
#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_file_stem("name", &self.name)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_formats("formats", &self.formats)?;
        Ok(())
    }
}
