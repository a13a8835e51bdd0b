//! The retention loop: sweep, sleep to the next aligned boundary, repeat.
//!
//! Two states: `Sweeping` (a blocking worker walks the tree) and `Sleeping`
//! (awaiting the next epoch-aligned boundary). SIGINT/SIGTERM moves the
//! daemon to `Stopped`: a sleeping daemon exits immediately, a sweeping one
//! finishes its in-flight file operation and starts no new deletion.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::{Result, SweepError};
use crate::policy::RetentionPolicy;
use crate::schedule;
use crate::sweep;

pub struct Daemon {
    policy: Arc<RetentionPolicy>,
    interval_secs: u64,
    dry_run: bool,
    clock: Arc<dyn Clock>,
    stop: Arc<AtomicBool>,
}

impl Daemon {
    #[must_use]
    pub fn new(
        policy: RetentionPolicy,
        interval_secs: u64,
        dry_run: bool,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            interval_secs,
            dry_run,
            clock,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs until SIGINT/SIGTERM. Sweeps immediately on startup (matching
    /// the documented initial-state choice), then on every aligned boundary.
    pub async fn run(&self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs until `shutdown` resolves. A sleeping daemon exits right away;
    /// a sweeping one finishes its in-flight file operation first.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            root = %self.policy.root.display(),
            retention_days = self.policy.max_age_days,
            interval_secs = self.interval_secs,
            "retention sweeper started"
        );

        tokio::pin!(shutdown);

        loop {
            // Sweeping.
            let policy = Arc::clone(&self.policy);
            let stop = Arc::clone(&self.stop);
            let now = self.clock.now();
            let dry_run = self.dry_run;
            info!(retention_days = policy.max_age_days, "sweep started");

            let mut job =
                tokio::task::spawn_blocking(move || sweep::sweep_once(&policy, now, dry_run, &stop));

            let outcome = tokio::select! {
                outcome = &mut job => outcome,
                () = &mut shutdown => {
                    // Let the in-flight file operation finish; the flag
                    // stops the walk before the next deletion.
                    self.stop.store(true, Ordering::Relaxed);
                    job.await
                }
            };

            match outcome {
                Ok(Ok(report)) => {
                    info!(
                        scanned = report.scanned,
                        deleted = report.deleted,
                        errors = report.errors,
                        "sweep finished"
                    );
                }
                Ok(Err(err @ SweepError::RootUnreachable { .. })) => {
                    warn!(error = %err, "sweep skipped, retrying on next tick");
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "sweep failed, retrying on next tick");
                }
                Err(err) => {
                    error!(error = %err, "sweep worker panicked");
                }
            }

            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            // Sleeping.
            let now = self.clock.now();
            let tick = schedule::next_tick(now, self.interval_secs);
            let wait = schedule::sleep_duration(now, tick);
            debug!(next_tick = %tick, "sleeping until next boundary");

            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                () = &mut shutdown => {
                    self.stop.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }

        info!("retention sweeper stopped");
        Ok(())
    }
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
