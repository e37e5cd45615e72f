use crate::domain::model::PaymentPlan;
use crate::utils::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HEADER: [&str; 6] = [
    "number",
    "due_date",
    "principal",
    "interest",
    "total",
    "remaining_balance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["csv", "tsv", "json"];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    pub fn render(&self, plan: &PaymentPlan) -> Result<String> {
        match self {
            OutputFormat::Csv => to_csv(plan),
            OutputFormat::Tsv => to_tsv(plan),
            OutputFormat::Json => to_json(plan),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(PlanError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", OutputFormat::NAMES.join(", ")),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn to_csv(plan: &PaymentPlan) -> Result<String> {
    write_delimited(plan, b',')
}

pub fn to_tsv(plan: &PaymentPlan) -> Result<String> {
    write_delimited(plan, b'\t')
}

fn write_delimited(plan: &PaymentPlan, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for installment in &plan.installments {
        writer.write_record([
            installment.number.to_string(),
            installment.due_date.format("%Y-%m-%d").to_string(),
            money(installment.principal_amount),
            money(installment.interest_amount),
            money(installment.total_amount),
            money(installment.remaining_balance),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| PlanError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PlanError::CalculationError {
        message: format!("schedule is not valid UTF-8: {}", e),
    })
}

pub fn to_json(plan: &PaymentPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

pub fn summary(plan: &PaymentPlan) -> String {
    let mut lines = vec![
        format!("Total amount:     {}", money(plan.total_amount)),
        format!("Down payment:     {}", money(plan.down_payment)),
        format!("Financed amount:  {}", money(plan.financed_amount)),
        format!("Monthly rate:     {:.4}%", plan.interest_rate * 100.0),
        format!(
            "Installments:     {} x {}",
            plan.installments.len(),
            money(plan.monthly_payment)
        ),
        format!("Total interest:   {}", money(plan.total_interest)),
        format!("Total paid:       {}", money(plan.total_paid)),
    ];

    if let (Some(first), Some(last)) = (plan.first_due_date(), plan.last_due_date()) {
        lines.push(format!("First due date:   {}", first));
        lines.push(format!("Last due date:    {}", last));
    }

    lines.join("\n")
}

// -0.00 shows up when a balance closes a hair below zero.
fn money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount);
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}
