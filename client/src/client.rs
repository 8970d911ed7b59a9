use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use domain::{job_from_api, service::JobSource, Job};
use futures::TryStreamExt;
use infrastructure::sync::SessionCounter;
use reqwest::Response;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::infrastructure::http::{
    authorization::Bearer,
    middleware::{AuthMiddleware, MiddlewareMenu},
};
use crate::stream::JobStream;

/// Read access to the jobs API of one service.
///
/// The client is a one-shot resource: it starts unopened, [`open`] creates the
/// transport session and [`close`] (or dropping the client) tears it down.
/// Operations outside of the open state fail with [`Error::ClientClosed`].
///
/// An open client may serve concurrent calls; they share the pooled
/// connections of the session and nothing else.
///
/// [`open`]: ApiClient::open
/// [`close`]: ApiClient::close
pub struct ApiClient {
    config: ClientConfig,
    state: ArcSwap<ClientState>,
    sessions: SessionCounter,
}

enum ClientState {
    Unopened,
    Open(Session),
    Closed,
}

#[derive(Clone)]
struct Session {
    http: ClientWithMiddleware,
    jobs_url: Url,
}

impl Session {
    fn new(config: &ClientConfig) -> Result<Self> {
        let mut jobs_url = config.url.clone();
        jobs_url
            .path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(config.url.clone()))?
            .pop_if_empty()
            .extend(["api", "v1", "jobs"]);

        let auth = AuthMiddleware::new(&Bearer::new(&config.token))?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;
        let http = MiddlewareMenu::builder()
            .client(client)
            .auth(auth)
            .build()
            .make();

        Ok(Self { http, jobs_url })
    }

    fn job_url(&self, job_id: &str) -> Url {
        let mut url = self.jobs_url.clone();
        // `jobs_url` is known to be a base URL
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(job_id);
        }
        url
    }
}

impl ApiClient {
    pub fn new(url: Url, token: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::builder().url(url).token(token).build())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            state: ArcSwap::from_pointee(ClientState::Unopened),
            sessions: SessionCounter::default(),
        }
    }

    /// Establishes the transport session. Opening an open client does nothing,
    /// a closed client cannot be opened again.
    pub fn open(&self) -> Result<()> {
        let current = self.state.load();
        match **current {
            ClientState::Open(_) => return Ok(()),
            ClientState::Closed => return Err(Error::ClientClosed),
            ClientState::Unopened => (),
        }

        let session = Session::new(&self.config)?;
        let prev = self
            .state
            .compare_and_swap(&current, Arc::new(ClientState::Open(session)));
        if !Arc::ptr_eq(&*prev, &*current) {
            // Raced with another `open` or `close`
            return match **prev {
                ClientState::Open(_) => Ok(()),
                ClientState::Unopened | ClientState::Closed => Err(Error::ClientClosed),
            };
        }

        tracing::info!(url = %self.config.url, "Session opened");
        Ok(())
    }

    /// Tears the session down. Only the first call has an effect.
    ///
    /// Requests and streams already in flight keep their connection until
    /// they finish or are dropped.
    pub fn close(&self) {
        let prev = self.state.swap(Arc::new(ClientState::Closed));
        if let ClientState::Open(_) = *prev {
            tracing::info!(url = %self.config.url, "Session closed");
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(**self.state.load(), ClientState::Open(_))
    }

    /// Requests in flight plus [`JobStream`]s not dropped yet.
    pub fn active_sessions(&self) -> usize {
        self.sessions.active()
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let session = self.session()?;
        let _guard = self.sessions.enter();

        tracing::debug!(%job_id, "Fetching job");
        let resp = session.http.get(session.job_url(job_id)).send().await?;
        let body = check_status(resp).await?.bytes().await?;

        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| Error::Protocol(format!("invalid JSON body: {e}")))?;
        if !raw.is_object() {
            return Err(Error::Protocol("expected a JSON object".to_owned()));
        }
        Ok(job_from_api(&raw)?)
    }

    /// Opens a listing of all jobs.
    ///
    /// The request is issued here; jobs are parsed one by one while the
    /// returned stream is polled. Dropping the stream releases its connection.
    /// Every call issues a fresh request.
    pub async fn iter_jobs(&self) -> Result<JobStream> {
        let session = self.session()?;
        let guard = self.sessions.enter();

        tracing::debug!(url = %session.jobs_url, "Listing jobs");
        let resp = session.http.get(session.jobs_url.clone()).send().await?;
        Ok(JobStream::new(check_status(resp).await?, guard))
    }

    fn session(&self) -> Result<Session> {
        let state = self.state.load();
        match &**state {
            ClientState::Open(session) => Ok(session.clone()),
            ClientState::Unopened | ClientState::Closed => Err(Error::ClientClosed),
        }
    }
}

impl Drop for ApiClient {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait::async_trait]
impl JobSource for ApiClient {
    async fn get_job(&self, id: &str) -> anyhow::Result<Job> {
        Ok(ApiClient::get_job(self, id).await?)
    }

    async fn get_jobs(&self) -> anyhow::Result<Vec<Job>> {
        Ok(self.iter_jobs().await?.try_collect().await?)
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().clone();
    let body = match resp.text().await {
        Ok(body) => {
            tracing::warn!(%status, %url, "Request failed");
            body
        }
        Err(e) => {
            tracing::warn!(%status, %url, error = %e, "Request failed, error body unreadable");
            String::new()
        }
    };
    Err(Error::Remote { status, body })
}
