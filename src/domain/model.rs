use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs for a fixed-payment installment plan.
///
/// `interest_rate` is the monthly rate as a decimal fraction (0.02 is 2% per
/// month). Zero is allowed and yields a straight split of the financed amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub total_amount: f64,
    #[serde(default)]
    pub down_payment: f64,
    pub number_of_installments: u32,
    #[serde(default)]
    pub interest_rate: f64,
}

impl PlanRequest {
    pub fn new(
        total_amount: f64,
        down_payment: f64,
        number_of_installments: u32,
        interest_rate: f64,
    ) -> Self {
        Self {
            total_amount,
            down_payment,
            number_of_installments,
            interest_rate,
        }
    }

    pub fn financed_amount(&self) -> f64 {
        self.total_amount - self.down_payment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: f64,
    pub interest_amount: f64,
    pub total_amount: f64,
    /// Balance still owed once this installment is paid.
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub total_amount: f64,
    pub down_payment: f64,
    pub financed_amount: f64,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    pub installments: Vec<Installment>,
    pub total_interest: f64,
    pub total_paid: f64,
    pub generated_on: NaiveDate,
}

impl PaymentPlan {
    pub fn first_due_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|i| i.due_date)
    }

    pub fn last_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }

    pub fn final_balance(&self) -> f64 {
        self.installments
            .last()
            .map(|i| i.remaining_balance)
            .unwrap_or(self.financed_amount)
    }
}
