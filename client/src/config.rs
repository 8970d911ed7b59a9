use std::fmt;
use std::path::Path;
use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use typed_builder::TypedBuilder;
use url::Url;

/// Where the service lives and how to talk to it.
///
/// Timeouts are in seconds.
#[derive(Clone, Deserialize, TypedBuilder)]
pub struct ClientConfig {
    /// Base address, e.g. `https://api.example.com`
    pub url: Url,

    #[builder(setter(into))]
    pub token: String,

    /// Whole exchange of one request, reading its body included
    #[serde(default = "ClientConfig::default_timeout")]
    #[builder(default = ClientConfig::default_timeout())]
    pub timeout: u64,

    #[serde(default = "ClientConfig::default_connect_timeout")]
    #[builder(default = ClientConfig::default_connect_timeout())]
    pub connect_timeout: u64,

    /// How long an idle pooled connection is kept
    #[serde(default = "ClientConfig::default_pool_idle_timeout")]
    #[builder(default = ClientConfig::default_pool_idle_timeout())]
    pub pool_idle_timeout: u64,

    #[serde(default = "ClientConfig::default_user_agent")]
    #[builder(default = ClientConfig::default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl ClientConfig {
    /// Reads the optional YAML file at `path`, then `APOLO_*` environment
    /// variables on top of it (`APOLO_URL`, `APOLO_TOKEN`, `APOLO_TIMEOUT`, ...).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(Environment::with_prefix("APOLO"))
            .build()?
            .try_deserialize()
    }

    pub fn default_timeout() -> u64 {
        60
    }

    pub fn default_connect_timeout() -> u64 {
        10
    }

    pub fn default_pool_idle_timeout() -> u64 {
        90
    }

    pub fn default_user_agent() -> String {
        concat!("apolo-api-client/", env!("CARGO_PKG_VERSION")).to_owned()
    }

    #[inline]
    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url.as_str())
            .field("token", &"***")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
