use crate::core::calculator::calculate_payment_plan;
use crate::core::schedule;
use crate::core::{PaymentPlan, PlanInputProvider, Storage};
use crate::utils::error::Result;

/// Outcome of one engine run.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub name: String,
    pub plan: PaymentPlan,
    pub written_files: Vec<String>,
}

pub struct PlanEngine<S: Storage> {
    storage: S,
}

impl<S: Storage> PlanEngine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Calculates the plan without writing anything.
    pub fn preview<P: PlanInputProvider>(&self, input: &P) -> Result<PaymentPlan> {
        calculate_payment_plan(&input.plan_request(), input.start_date())
    }

    pub async fn run<P: PlanInputProvider>(&self, input: &P) -> Result<PlanReport> {
        let name = input.plan_name().to_string();
        tracing::info!("Calculating payment plan '{}'", name);

        let plan = self.preview(input)?;
        tracing::info!(
            "Plan '{}': {} installments of {:.2}, total interest {:.2}",
            name,
            plan.installments.len(),
            plan.monthly_payment,
            plan.total_interest
        );

        // Render everything up front so a rendering failure leaves no partial output.
        let rendered = input
            .output_formats()
            .into_iter()
            .map(|format| {
                let file_name = format!("{}.{}", name, format.extension());
                format.render(&plan).map(|content| (file_name, content))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut written_files = Vec::with_capacity(rendered.len());
        for (file_name, content) in rendered {
            self.storage.write_file(&file_name, content.as_bytes()).await?;
            tracing::debug!("Wrote {} ({} bytes)", file_name, content.len());
            written_files.push(file_name);
        }

        tracing::debug!("Summary for '{}':\n{}", name, schedule::summary(&plan));

        Ok(PlanReport {
            name,
            plan,
            written_files,
        })
    }
}
