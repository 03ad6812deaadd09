//! The poll → detect → notify loop.
//!
//! Each cycle runs fetch → validate → translate as a chain of `Result`s. A
//! failure at any stage becomes a `"Program failure: ..."` message and goes
//! through the same dedup check as a normal status message.
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use crate::error::CycleError;
use crate::notifier::{MessageTransport, Notifier};
use crate::response::check_response;
use crate::status_api::StatusApi;
use crate::verdict::parse_status;

/// State carried from one cycle to the next. Lives only as long as the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound (`from_date`) for the next status query.
    pub cursor: i64,
    /// Last message that actually reached the chat.
    pub last_sent: Option<String>,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_sent: None,
        }
    }

    /// Cursor at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(chrono::Utc::now().timestamp())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Sent,
    Duplicate,
    DeliveryFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub message: String,
    pub outcome: CycleOutcome,
    /// Error tag when fetch/validate/translate failed.
    pub failure: Option<&'static str>,
}

pub fn failure_message(err: &CycleError) -> String {
    format!("Program failure: {err}")
}

pub struct Poller<A, T> {
    api: A,
    notifier: Notifier<T>,
    retry_period: Duration,
}

impl<A: StatusApi, T: MessageTransport> Poller<A, T> {
    pub fn new(api: A, notifier: Notifier<T>, retry_period: Duration) -> Self {
        Self {
            api,
            notifier,
            retry_period,
        }
    }

    /// Fetch, validate and translate. Returns the new cursor and the message.
    async fn poll(&self, cursor: i64) -> Result<(i64, String), CycleError> {
        let response = self.api.fetch(cursor).await?;
        let report = check_response(&response)?;
        let message = parse_status(&report.pending)?;
        Ok((report.current_date, message))
    }

    /// Run one cycle against `state`. Never fails; errors become messages.
    #[instrument(skip_all, fields(cursor = state.cursor))]
    pub async fn run_cycle(&self, state: &mut PollState) -> CycleReport {
        let (message, failure) = match self.poll(state.cursor).await {
            Ok((current_date, message)) => {
                state.cursor = current_date;
                (message, None)
            }
            Err(err) => {
                let message = failure_message(&err);
                error!(kind = err.kind(), %message, "poll cycle failed");
                (message, Some(err.kind()))
            }
        };

        if state.last_sent.as_deref() == Some(message.as_str()) {
            debug!("message unchanged; not sending");
            return CycleReport {
                message,
                outcome: CycleOutcome::Duplicate,
                failure,
            };
        }

        let outcome = if self.notifier.send_message(&message).await {
            state.last_sent = Some(message.clone());
            CycleOutcome::Sent
        } else {
            CycleOutcome::DeliveryFailed
        };

        CycleReport {
            message,
            outcome,
            failure,
        }
    }

    /// Run cycles at a fixed cadence until `shutdown` turns true or its sender
    /// is dropped. The wait between cycles ends early on shutdown.
    pub async fn run(&self, state: &mut PollState, mut shutdown: watch::Receiver<bool>) {
        info!(cursor = state.cursor, retry_secs = self.retry_period.as_secs(), "bot started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            self.run_cycle(state).await;
            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }
        info!(cursor = state.cursor, "bot stopped");
    }
}
