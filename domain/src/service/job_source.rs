use crate::model::entity::Job;

/// Read access to the jobs of a remote service.
#[async_trait::async_trait]
pub trait JobSource {
    async fn get_job(&self, id: &str) -> anyhow::Result<Job>;
    /// All jobs in the order the service lists them.
    async fn get_jobs(&self) -> anyhow::Result<Vec<Job>>;
}
