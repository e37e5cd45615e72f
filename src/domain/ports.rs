use crate::core::schedule::OutputFormat;
use crate::domain::model::PlanRequest;
use crate::utils::error::Result;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of a single plan to compute, e.g. CLI arguments or one `[[plans]]` entry.
pub trait PlanInputProvider: Send + Sync {
    fn plan_name(&self) -> &str;
    fn plan_request(&self) -> PlanRequest;
    /// Day the 30-day due-date spacing is counted from.
    fn start_date(&self) -> NaiveDate;
    fn output_formats(&self) -> Vec<OutputFormat>;
}
