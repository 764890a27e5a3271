//! Job lifecycle for long-running generations.
//!
//! ```text
//! NotStarted -> RequestSent -> Polling -> Succeeded | Failed | TimedOut
//! ```
//!
//! [`JobTracker`] holds no I/O; the client feeds it observed statuses and the
//! elapsed time and acts on the returned [`PollStep`].

use std::time::Duration;

use crate::api::draw::{DrawResult, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    NotStarted,
    RequestSent,
    Polling { progress: u8 },
    Succeeded,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }
}

#[derive(Debug, PartialEq)]
pub enum PollStep {
    /// Sleep for the given interval and ask again.
    Wait(Duration),
    Done(DrawResult),
    Failed(String),
    TimedOut,
}

#[derive(Debug)]
pub struct JobTracker {
    policy: PollPolicy,
    state: JobState,
}

impl JobTracker {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            state: JobState::NotStarted,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn request_sent(&mut self) {
        self.state = JobState::RequestSent;
    }

    pub fn job_created(&mut self) {
        self.state = JobState::Polling { progress: 0 };
    }

    /// `elapsed` is measured from job creation to the moment `status` was
    /// observed.
    pub fn observe(&mut self, status: JobStatus, elapsed: Duration) -> PollStep {
        debug_assert!(!self.state.is_terminal(), "job already finished");
        match status {
            JobStatus::Succeeded(result) => {
                self.state = JobState::Succeeded;
                PollStep::Done(result)
            }
            JobStatus::Failed(reason) => {
                self.state = JobState::Failed;
                PollStep::Failed(reason)
            }
            JobStatus::Running { .. } if elapsed >= self.policy.max_wait => {
                self.state = JobState::TimedOut;
                PollStep::TimedOut
            }
            JobStatus::Running { progress } => {
                self.state = JobState::Polling { progress };
                PollStep::Wait(self.policy.interval)
            }
        }
    }
}
