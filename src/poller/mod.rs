//! The poll-notify loop.
//!
//! Each iteration fetches status changes since the cursor, validates the
//! response, turns every record into a notification and delivers it. Nothing
//! that goes wrong inside an iteration escapes it: failures are logged (and
//! optionally forwarded to the chat) and the loop sleeps for the fixed
//! interval before trying again.

use log::{debug, error, info, warn};
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;

use crate::channel::Notifier;
use crate::error::{IterationError, StatusError};
use crate::practicum::{HomeworkSource, validate};
use crate::verdict::{failure_notice, translate};

/// What one successful iteration did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationReport {
    /// Records in the response. Zero means "no new statuses".
    pub received: usize,
    /// Notifications the chat accepted.
    pub delivered: usize,
    /// Notifications built but lost because delivery failed.
    pub undelivered: usize,
    /// Records that could not be translated, in response order.
    pub rejected: Vec<StatusError>,
}

impl IterationReport {
    /// True when the response carried no records at all.
    pub fn is_empty(&self) -> bool {
        self.received == 0
    }
}

/// Polls a [`HomeworkSource`] and relays changes through a [`Notifier`].
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    /// Unix timestamp sent as `from_date`. Never moves backwards.
    cursor: i64,
    interval: Duration,
    report_errors: bool,
    /// Last failure text forwarded to the chat, so a persisting failure is
    /// reported once rather than every iteration.
    last_reported: Option<String>,
}

impl<S: HomeworkSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            cursor,
            interval: Duration::from_secs(600),
            report_errors: false,
            last_reported: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_error_reports(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run iterations until `cancel` fires, sleeping the fixed interval
    /// between them.
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!(
            "polling every {}s, starting from {}",
            self.interval.as_secs(),
            self.cursor
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.iterate() => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        info!("poller stopped at cursor {}", self.cursor);
    }

    /// Run one iteration and handle its failure, if any. The result is
    /// returned for inspection only; the loop ignores it.
    pub async fn iterate(&mut self) -> Result<IterationReport, IterationError> {
        let result = self.poll().await;

        match &result {
            Ok(report) => {
                if !report.is_empty() {
                    info!(
                        "iteration done: {} delivered, {} undelivered, {} rejected",
                        report.delivered,
                        report.undelivered,
                        report.rejected.len()
                    );
                }
                self.last_reported = None;
            }
            Err(e) => {
                error!("iteration failed: {e}");
                if self.report_errors {
                    self.report_failure(&e.to_string()).await;
                }
            }
        }

        result
    }

    /// Fetch, validate, translate and deliver without any error handling
    /// beyond the per-record kind.
    async fn poll(&mut self) -> Result<IterationReport, IterationError> {
        let body = self.source.fetch(self.cursor).await?;
        let response = validate(&body)?;

        if let Some(current_date) = response.current_date {
            self.advance_cursor(current_date);
        }

        let mut report = IterationReport {
            received: response.homeworks.len(),
            ..IterationReport::default()
        };

        if report.is_empty() {
            debug!("no new statuses in API response");
            return Ok(report);
        }

        for record in &response.homeworks {
            let notification = match translate(record) {
                Ok(notification) => notification,
                Err(e) => {
                    error!("skipping homework record: {e}");
                    report.rejected.push(e);
                    continue;
                }
            };

            match self.notifier.deliver(&notification).await {
                Ok(()) => {
                    debug!("sent to {}: {notification}", self.notifier.name());
                    report.delivered += 1;
                }
                Err(e) => {
                    error!("failed to send message to {}: {e}", self.notifier.name());
                    report.undelivered += 1;
                }
            }
        }

        Ok(report)
    }

    fn advance_cursor(&mut self, current_date: i64) {
        if current_date >= self.cursor {
            self.cursor = current_date;
        } else {
            warn!(
                "ignoring current_date {current_date} older than cursor {}",
                self.cursor
            );
        }
    }

    async fn report_failure(&mut self, text: &str) {
        if self.last_reported.as_deref() == Some(text) {
            debug!("failure already reported, not forwarding again");
            return;
        }

        match self.notifier.deliver(&failure_notice(&text)).await {
            Ok(()) => self.last_reported = Some(text.to_owned()),
            Err(e) => error!("failed to forward failure to {}: {e}", self.notifier.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_empty_only_without_records() {
        assert!(IterationReport::default().is_empty());

        let report = IterationReport {
            received: 1,
            rejected: vec![StatusError::MissingName],
            ..IterationReport::default()
        };
        assert!(!report.is_empty());
    }

    #[test]
    fn test_report_clone_keeps_rejections() {
        let report = IterationReport {
            received: 2,
            delivered: 1,
            undelivered: 0,
            rejected: vec![StatusError::UnknownStatus("archived".into())],
        };
        assert_eq!(report.clone(), report);
    }
}
