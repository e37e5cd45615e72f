//! Fixed-payment amortization of a financed balance.
//!
//! The payment is the standard annuity amount
//! `P * r * (1 + r)^n / ((1 + r)^n - 1)`, or `P / n` when the rate is zero.
//! Each installment charges one period of interest on the outstanding balance;
//! the last installment takes whatever principal is left so the balance closes
//! at exactly zero.

use crate::domain::model::{Installment, PaymentPlan, PlanRequest};
use crate::utils::error::{PlanError, Result};
use chrono::{Days, NaiveDate, Utc};

/// Days between consecutive due dates. Not month-aware.
pub const DAYS_BETWEEN_INSTALLMENTS: u64 = 30;

/// Longest accepted schedule (50 years of monthly installments).
pub const MAX_INSTALLMENTS: u32 = 600;

pub fn validate_request(request: &PlanRequest) -> Result<()> {
    let total = request.total_amount;
    let down = request.down_payment;

    if !total.is_finite() {
        return Err(invalid_amount("total_amount", total, "must be a finite number"));
    }
    if total < 0.0 {
        return Err(invalid_amount("total_amount", total, "cannot be negative"));
    }
    if !down.is_finite() {
        return Err(invalid_amount("down_payment", down, "must be a finite number"));
    }
    if down < 0.0 {
        return Err(invalid_amount("down_payment", down, "cannot be negative"));
    }
    if down > total {
        return Err(invalid_amount(
            "down_payment",
            down,
            &format!("exceeds total amount {:.2}", total),
        ));
    }

    if request.number_of_installments < 1 || request.number_of_installments > MAX_INSTALLMENTS {
        return Err(PlanError::InvalidScheduleLength {
            value: request.number_of_installments,
        });
    }

    let rate = request.interest_rate;
    if !rate.is_finite() {
        return Err(PlanError::InvalidRate {
            value: rate,
            reason: "must be a finite number".to_string(),
        });
    }
    if rate < 0.0 {
        return Err(PlanError::InvalidRate {
            value: rate,
            reason: "cannot be negative".to_string(),
        });
    }

    Ok(())
}

fn invalid_amount(field: &str, value: f64, reason: &str) -> PlanError {
    PlanError::InvalidAmount {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    }
}

/// Fixed periodic payment that retires `principal` in `periods` payments.
pub fn annuity_payment(principal: f64, rate: f64, periods: u32) -> Result<f64> {
    if periods == 0 || periods > MAX_INSTALLMENTS {
        return Err(PlanError::InvalidScheduleLength { value: periods });
    }

    // (1 + r)^n - 1 without cancellation for tiny r.
    let growth_minus_one = if rate > 0.0 {
        (rate.ln_1p() * periods as f64).exp_m1()
    } else {
        0.0
    };
    let payment = if growth_minus_one != 0.0 {
        principal * rate * (1.0 + growth_minus_one) / growth_minus_one
    } else {
        principal / periods as f64
    };

    if !payment.is_finite() {
        return Err(PlanError::CalculationError {
            message: format!(
                "payment for {:.2} over {} periods at rate {} is not a finite number",
                principal, periods, rate
            ),
        });
    }

    Ok(payment)
}

/// Builds the schedule with due dates counted from `start_date`.
pub fn calculate_payment_plan(request: &PlanRequest, start_date: NaiveDate) -> Result<PaymentPlan> {
    validate_request(request)?;

    let financed = request.financed_amount();
    let rate = request.interest_rate;
    let periods = request.number_of_installments;
    let monthly_payment = annuity_payment(financed, rate, periods)?;

    tracing::debug!(
        "Financing {:.2} over {} installments at {} per month: payment {:.2}",
        financed,
        periods,
        rate,
        monthly_payment
    );

    let mut installments = Vec::new();
    let mut remaining_balance = financed;
    let mut total_interest = 0.0;

    for number in 1..=periods {
        let interest_amount = remaining_balance * rate;
        let principal_amount = if number == periods {
            remaining_balance
        } else {
            monthly_payment - interest_amount
        };
        remaining_balance -= principal_amount;
        total_interest += interest_amount;

        installments.push(Installment {
            number,
            due_date: due_date(start_date, number)?,
            principal_amount,
            interest_amount,
            total_amount: principal_amount + interest_amount,
            remaining_balance,
        });
    }

    let total_paid = request.down_payment + installments.iter().map(|i| i.total_amount).sum::<f64>();

    Ok(PaymentPlan {
        total_amount: request.total_amount,
        down_payment: request.down_payment,
        financed_amount: financed,
        interest_rate: rate,
        monthly_payment,
        installments,
        total_interest,
        total_paid,
        generated_on: start_date,
    })
}

/// Same as [`calculate_payment_plan`], counting due dates from today (UTC).
pub fn generate_payment_plan(request: &PlanRequest) -> Result<PaymentPlan> {
    calculate_payment_plan(request, Utc::now().date_naive())
}

fn due_date(start_date: NaiveDate, number: u32) -> Result<NaiveDate> {
    start_date
        .checked_add_days(Days::new(DAYS_BETWEEN_INSTALLMENTS * u64::from(number)))
        .ok_or_else(|| PlanError::CalculationError {
            message: format!("due date of installment {} is out of range", number),
        })
}

pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    annual_rate / 12.0
}
