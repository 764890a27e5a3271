use bytes::Bytes;
use log::{debug, info};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    api::{
        CHAT_PATH, RESULT_PATH,
        chat::{ChatRequest, ChatResponse, Completion},
        draw::{DrawResult, Envelope, JobStatus, ResultQuery, Submitted},
    },
    clock::Clock,
    config::Config,
    error::{Result, SkillError},
    poll::{JobState, JobTracker, PollStep},
    retry::with_retry,
    transport::{HttpReply, Transport, TransportError},
};

/// Opaque id of an in-progress generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
}

pub struct GrsaiClient<T, C> {
    config: Config,
    transport: T,
    clock: C,
}

impl<T: Transport, C: Clock> GrsaiClient<T, C> {
    pub fn new(config: Config, transport: T, clock: C) -> Self {
        Self {
            config,
            transport,
            clock,
        }
    }

    pub async fn chat(&self, req: &ChatRequest) -> Result<Completion> {
        let url = self.config.endpoint(CHAT_PATH);
        let body = to_body(req)?;
        let (url, body) = (&url, &body);

        let resp = with_retry(&self.config.retry, &self.clock, "chat", || async move {
            self.post_once::<ChatResponse>(url, body).await
        })
        .await?;
        resp.into_completion()
    }

    /// Submits a generation job and waits for it to reach a terminal state.
    pub async fn generate(&self, path: &str, payload: &impl Serialize) -> Result<DrawResult> {
        let mut tracker = JobTracker::new(self.config.poll);
        tracker.request_sent();
        let job = self.submit(path, payload).await?;
        info!("Task created: {}", job.id);
        tracker.job_created();
        self.wait(&job, &mut tracker).await
    }

    pub async fn submit(&self, path: &str, payload: &impl Serialize) -> Result<JobHandle> {
        let url = self.config.endpoint(path);
        let body = to_body(payload)?;
        let (url, body) = (&url, &body);

        let submitted = with_retry(&self.config.retry, &self.clock, "submit", || async move {
            self.post_once::<Envelope<Submitted>>(url, body)
                .await?
                .into_data()
        })
        .await?;

        submitted
            .id
            .filter(|id| !id.is_empty())
            .map(|id| JobHandle { id })
            .ok_or_else(|| SkillError::protocol("No task ID in response"))
    }

    pub async fn poll_status(&self, job: &JobHandle) -> Result<JobStatus> {
        let url = self.config.endpoint(RESULT_PATH);
        let body = to_body(&ResultQuery { id: &job.id })?;
        let (url, body) = (&url, &body);

        let result = with_retry(&self.config.retry, &self.clock, "poll", || async move {
            self.post_once::<Envelope<DrawResult>>(url, body)
                .await?
                .into_data()
        })
        .await?;
        Ok(result.into_status())
    }

    async fn wait(&self, job: &JobHandle, tracker: &mut JobTracker) -> Result<DrawResult> {
        let started = self.clock.now();
        loop {
            let status = self.poll_status(job).await?;
            let elapsed = self.clock.now().duration_since(started);
            match tracker.observe(status, elapsed) {
                PollStep::Wait(interval) => {
                    if let JobState::Polling { progress } = tracker.state() {
                        info!("Progress: {progress}% (running)");
                    }
                    self.clock.sleep(interval).await;
                }
                PollStep::Done(result) => return Ok(result),
                PollStep::Failed(message) => {
                    return Err(SkillError::GenerationFailure { message });
                }
                PollStep::TimedOut => {
                    return Err(SkillError::Timeout {
                        job_id: job.id.clone(),
                        waited: elapsed,
                    });
                }
            }
        }
    }

    pub async fn download(&self, url: &str) -> Result<Bytes> {
        with_retry(&self.config.retry, &self.clock, "download", || async move {
            let reply = self.transport.get(url).await.map_err(transport_error)?;
            check_status(reply)
        })
        .await
    }

    async fn post_once<R: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<R> {
        debug!("POST {url}: {body}");
        let reply = self
            .transport
            .post_json(url, &self.config.api_key, body)
            .await
            .map_err(transport_error)?;
        let bytes = check_status(reply)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let body = String::from_utf8_lossy(&bytes);
            SkillError::protocol(format!("{e}: {body}"))
        })
    }
}

fn to_body(payload: &impl Serialize) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| SkillError::Transport {
        message: format!("could not encode request: {e}"),
    })
}

fn transport_error(err: TransportError) -> SkillError {
    match err {
        TransportError::Timeout(_) | TransportError::Connect(_) => SkillError::TransientFailure {
            message: err.to_string(),
        },
        TransportError::Other(message) => SkillError::Transport { message },
    }
}

/// 2xx passes, 401 is fatal, 429 is transient, anything else is unexpected.
fn check_status(reply: HttpReply) -> Result<Bytes> {
    match reply.status {
        _ if reply.is_success() => Ok(reply.body),
        401 => Err(SkillError::AuthenticationFailure {
            message: reply.body_text(),
        }),
        429 => Err(SkillError::TransientFailure {
            message: format!(
                "Rate limited (HTTP 429): too many requests. Details: {}",
                reply.body_text()
            ),
        }),
        status => Err(SkillError::protocol(format!(
            "HTTP {status}: {}",
            reply.body_text()
        ))),
    }
}
