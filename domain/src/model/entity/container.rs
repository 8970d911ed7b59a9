use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use super::Resources;

/// The runnable unit a job executes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub image: String,
    pub command: Option<String>,
    pub entrypoint: Option<String>,
    pub working_dir: Option<String>,
    pub http: Option<HttpPort>,
    pub resources: Resources,
    pub tty: bool,
    pub env: HashMap<String, String>,
    /// Variable name to `secret://` URI
    pub secret_env: HashMap<String, Url>,
    pub volumes: Vec<Volume>,
    pub disk_volumes: Vec<DiskVolume>,
    pub secret_files: Vec<SecretFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HttpPort {
    pub port: u16,
    pub requires_auth: bool,
}

/// Object storage mounted from a `storage://` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    pub storage_uri: Url,
    pub container_path: String,
    pub read_only: bool,
}

/// Block disk mounted from a `disk://` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskVolume {
    pub disk_uri: Url,
    pub container_path: String,
    pub read_only: bool,
}

/// Secret exposed as a file, from a `secret://` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretFile {
    pub secret_uri: Url,
    pub container_path: String,
    pub read_only: bool,
}
