use crate::error::MonitorError;
use crate::orchestration::cycle::{MonitorCycle, MonitorPhase};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Drives [`MonitorCycle`] sequentially with a fixed pause between cycles.
///
/// The pause starts when a cycle ends, so the real cadence is the interval
/// plus the cycle's own duration.
#[derive(Debug, Clone)]
pub struct PollingScheduler {
    interval: Duration,
}

impl PollingScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run cycles until `shutdown` resolves or a cycle fails.
    ///
    /// Shutdown is observed between cycles only; a running cycle always
    /// completes. On shutdown the stopped announcement is sent and `Ok` is
    /// returned. A panicking cycle is reported through the failure
    /// announcement and returned as [`MonitorError::CycleFailed`].
    pub async fn run<F>(&self, cycle: &mut MonitorCycle, shutdown: F) -> Result<(), MonitorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(interval_secs = self.interval.as_secs(), "Starting monitor");

        loop {
            match AssertUnwindSafe(cycle.run_once()).catch_unwind().await {
                Ok(report) => debug!(?report, "Monitoring check complete"),
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(error = %message, "Fatal error in monitoring cycle");
                    cycle.set_phase(MonitorPhase::Failed);
                    let text = cycle.formatter().failure(&message);
                    cycle.announce(&text).await;
                    return Err(MonitorError::CycleFailed(message));
                }
            }

            info!("Sleeping for {} seconds", self.interval.as_secs());
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Monitor stopped by user");
                    cycle.set_phase(MonitorPhase::Stopped);
                    let text = cycle.formatter().stopped();
                    cycle.announce(&text).await;
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

impl Default for PollingScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
