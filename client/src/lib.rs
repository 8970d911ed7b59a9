//! Async client for the jobs API of an Apolo service.
//!
//! ```no_run
//! use apolo_api_client::ApiClient;
//! use futures::TryStreamExt;
//!
//! # async fn example() -> apolo_api_client::Result<()> {
//! let client = ApiClient::new("https://api.example.com".parse().unwrap(), "token");
//! client.open()?;
//!
//! let job = client.get_job("job-id").await?;
//! println!("{} is {}", job.id, job.status);
//!
//! let mut jobs = client.iter_jobs().await?;
//! while let Some(job) = jobs.try_next().await? {
//!     println!("{}", job.id);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod infrastructure;
mod stream;

#[rustfmt::skip]
pub use domain::{
    convert::{container_from_api, job_from_api, resources_from_api, ConvertError},
    model::entity::*,
    service::JobSource,
};

#[rustfmt::skip]
pub use self::{
    client::ApiClient,
    config::ClientConfig,
    error::{Error, Result},
    stream::JobStream,
};
