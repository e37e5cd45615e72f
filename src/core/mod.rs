pub mod calculator;
pub mod engine;
pub mod schedule;

pub use crate::domain::model::{Installment, PaymentPlan, PlanRequest};
pub use crate::domain::ports::{PlanInputProvider, Storage};
pub use crate::utils::error::Result;
