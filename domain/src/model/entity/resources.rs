use serde::Serialize;

/// Compute resources requested by a container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resources {
    /// Fractional core count
    pub cpu: f64,
    /// Bytes
    pub memory: u64,
    pub shm: bool,
    pub nvidia_gpu: Option<u32>,
    pub tpu: Option<TpuResource>,
}

/// TPU type and its software version always come together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TpuResource {
    pub r#type: String,
    pub software_version: String,
}
