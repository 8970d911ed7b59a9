use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use domain::{job_from_api, Job};
use futures::{ready, Stream, TryStreamExt};
use infrastructure::{codec::JsonArrayDecoder, sync::SessionGuard};
use reqwest::Response;
use serde_json::Value;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use crate::error::{Error, Result};

type Body = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Jobs of one listing response, in the order the service sent them.
///
/// Each job is parsed when polled. The stream ends after the first error.
/// The connection is held until the stream is dropped.
#[pin_project::pin_project]
pub struct JobStream {
    #[pin]
    elements: FramedRead<StreamReader<Body, Bytes>, JsonArrayDecoder>,
    yielded: usize,
    finished: bool,
    _session: SessionGuard,
}

impl JobStream {
    pub(crate) fn new(resp: Response, session: SessionGuard) -> Self {
        let body: Body = Box::pin(
            resp.bytes_stream()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
        );
        Self {
            elements: FramedRead::new(StreamReader::new(body), JsonArrayDecoder::new("jobs")),
            yielded: 0,
            finished: false,
            _session: session,
        }
    }

    /// Number of jobs yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl Stream for JobStream {
    type Item = Result<Job>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.finished {
            return Poll::Ready(None);
        }

        let item = match ready!(this.elements.poll_next(cx)) {
            None => {
                *this.finished = true;
                tracing::debug!(count = *this.yielded, "Job listing finished");
                return Poll::Ready(None);
            }
            Some(Err(e)) => Err(Error::Protocol(format!("reading `jobs`: {e}"))),
            Some(Ok(element)) => parse(&element),
        };

        match item {
            Ok(_) => *this.yielded += 1,
            Err(_) => *this.finished = true,
        }
        Poll::Ready(Some(item))
    }
}

fn parse(element: &[u8]) -> Result<Job> {
    let raw: Value = serde_json::from_slice(element)
        .map_err(|e| Error::Protocol(format!("invalid element in `jobs`: {e}")))?;
    if !raw.is_object() {
        return Err(Error::Protocol(
            "expected an array of objects in `jobs`".to_owned(),
        ));
    }
    Ok(job_from_api(&raw)?)
}
