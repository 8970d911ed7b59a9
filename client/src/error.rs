use domain::ConvertError;
use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use url::Url;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload does not match the job schema.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The service answered with a non-success status.
    #[error("server error: {status}\t{body}")]
    Remote { status: StatusCode, body: String },

    /// The body is not the JSON document the endpoint should return.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The client was not opened yet or is closed already.
    #[error("client is not open")]
    ClientClosed,

    #[error("token cannot be sent in a header: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),

    #[error("{0} cannot be used as a base URL")]
    InvalidBaseUrl(Url),

    #[error(transparent)]
    Transport(#[from] reqwest_middleware::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.into())
    }
}

impl Error {
    /// HTTP status of a [`Error::Remote`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
