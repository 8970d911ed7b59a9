pub mod container;
pub mod history;
pub mod job;
pub mod resources;

#[rustfmt::skip]
pub use self::{
    container::{Container, DiskVolume, HttpPort, SecretFile, Volume},
    history::{JobStatusHistory, JobStatusItem},
    job::{Job, JobPriority, JobRestartPolicy, JobStatus},
    resources::{Resources, TpuResource},
};
