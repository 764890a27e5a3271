//! Scripted transport and manual clock for unit tests.

use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::Mutex,
    time::{Duration, Instant},
};

use bytes::Bytes;
use serde_json::Value;

use crate::{
    clock::Clock,
    config::ApiKey,
    transport::{HttpReply, Transport, TransportError, TransportFuture},
};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Answers requests from a queue of canned replies, in order, and records
/// every request it receives.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<Bytes>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(HttpReply {
            status,
            body: body.into(),
        }));
        self
    }

    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.reply(status, body.to_string())
    }

    pub fn fail(self, err: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, req: RecordedRequest) -> Result<HttpReply, TransportError> {
        let url = req.url.clone();
        self.requests.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply left for {url}"))
    }
}

impl Transport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: &'a Value,
    ) -> TransportFuture<'a> {
        let res = self.next(RecordedRequest {
            method: "POST",
            url: url.into(),
            bearer: Some(api_key.expose().into()),
            body: Some(body.clone()),
        });
        Box::pin(async move { res })
    }

    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        let res = self.next(RecordedRequest {
            method: "GET",
            url: url.into(),
            bearer: None,
            body: None,
        });
        Box::pin(async move { res })
    }
}

/// Time only moves when something sleeps.
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(vec![]),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        *self.elapsed.lock().unwrap() += duration;
        self.sleeps.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}
