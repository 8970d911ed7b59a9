use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use url::Url;

use super::{Container, JobStatusHistory};

/// A unit of remote compute work as reported by the jobs API.
///
/// Built once per response by [`job_from_api`](crate::job_from_api); a newer
/// state of the same job arrives as a brand-new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub name: Option<String>,
    pub org_name: Option<String>,
    pub project_name: Option<String>,
    pub owner: String,
    pub cluster_name: String,
    pub description: Option<String>,
    pub status: JobStatus,
    pub history: JobStatusHistory,
    pub container: Container,
    /// `job://<cluster>/<owner>/<id>`
    pub uri: Option<Url>,
    pub http_url: Option<Url>,
    pub scheduler_enabled: bool,
    pub preemptible_node: bool,
    pub pass_config: bool,
    pub schedule_timeout: Option<Duration>,
    /// Always equal to `schedule_timeout`, kept for older API shapes.
    pub life_span: Option<Duration>,
    pub max_run_time_minutes: Option<u64>,
    pub total_price_credits: Option<Decimal>,
    pub price_credits_per_hour: Option<Decimal>,
    pub preset_name: Option<String>,
    pub internal_hostname: Option<String>,
    pub internal_hostname_named: Option<String>,
    pub restart_policy: JobRestartPolicy,
    pub priority: JobPriority,
    pub tags: Vec<String>,
    pub materialized: bool,
    pub being_dropped: bool,
    pub logs_removed: bool,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for resources on the cluster
    Pending,
    /// Preempted, will be resumed by the scheduler
    Suspended,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// The service lost track of the job
    Unknown,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum JobRestartPolicy {
    #[default]
    Never,
    OnFailure,
    Always,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl JobStatus {
    #[inline]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// The job reached a terminal state and will not change any more.
    #[inline]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{JobPriority, JobRestartPolicy, JobStatus};

    #[test]
    fn test_status_is_case_sensitive() {
        assert_eq!(JobStatus::from_str("running").unwrap(), JobStatus::Running);
        assert!(JobStatus::from_str("Running").is_err());
        assert!(JobStatus::from_str("not-a-real-status").is_err());
    }

    #[test]
    fn test_restart_policy_kebab_case() {
        assert_eq!(
            JobRestartPolicy::from_str("on-failure").unwrap(),
            JobRestartPolicy::OnFailure
        );
        assert!(JobRestartPolicy::from_str("on_failure").is_err());
        assert_eq!(JobRestartPolicy::OnFailure.to_string(), "on-failure");
    }

    #[test]
    fn test_priority_order() {
        assert!(JobPriority::Low < JobPriority::Normal);
        assert!(JobPriority::Normal < JobPriority::High);
        assert_eq!(JobPriority::default(), JobPriority::Normal);
    }

    #[test]
    fn test_finished() {
        assert!(JobStatus::Cancelled.is_finished());
        assert!(!JobStatus::Suspended.is_finished());
        assert!(JobStatus::Running.is_running());
    }
}
