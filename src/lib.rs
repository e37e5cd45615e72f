pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::calculator::{calculate_payment_plan, generate_payment_plan};
pub use crate::core::engine::{PlanEngine, PlanReport};
pub use crate::core::schedule::OutputFormat;
pub use crate::domain::model::{Installment, PaymentPlan, PlanRequest};
pub use crate::utils::error::{PlanError, Result};
