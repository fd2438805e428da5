//! Interval job scheduler
//!
//! Every registered job gets its own driver task with an independent timer.
//! A driver never starts a run while the previous run of the same job is
//! still executing; such ticks are dropped. Interval changes travel over a
//! per-job watch channel and re-arm only that job's timer.

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Unit of work run on every tick of a scheduled job
#[async_trait]
pub trait Job: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("job '{0}' is not registered")]
    JobNotFound(String),

    #[error("job '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("job '{0}' interval must be at least 1 second")]
    InvalidInterval(String),
}

struct JobEntry {
    job: Arc<dyn Job>,
    interval: watch::Sender<Duration>,
    /// Set while a run of this job is executing
    in_flight: Arc<AtomicBool>,
}

struct Running {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

/// Scheduler of named, independently timed jobs
pub struct Scheduler {
    enabled: bool,
    jobs: RwLock<HashMap<String, JobEntry>>,
    // Lock order: `running` before `jobs`
    running: Mutex<Option<Running>>,
}

impl Scheduler {
    /// A disabled scheduler accepts registrations but never fires
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            jobs: RwLock::new(HashMap::new()),
            running: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.jobs.read().contains_key(name)
    }

    /// Current interval of a registered job
    pub fn interval_of(&self, name: &str) -> Option<Duration> {
        self.jobs.read().get(name).map(|entry| *entry.interval.borrow())
    }

    /// Register a job. If the scheduler is already running the job starts
    /// ticking right away; its first run is one interval from now.
    pub fn register(
        &self,
        name: impl Into<String>,
        interval: Duration,
        job: Arc<dyn Job>,
    ) -> Result<(), SchedulerError> {
        let name = name.into();
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval(name));
        }

        let running = self.running.lock();
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&name) {
            return Err(SchedulerError::AlreadyRegistered(name));
        }

        let (interval_tx, _) = watch::channel(interval);
        let entry = JobEntry {
            job,
            interval: interval_tx,
            in_flight: Arc::new(AtomicBool::new(false)),
        };
        if let Some(running) = running.as_ref() {
            spawn_driver(&name, &entry, running);
        }
        jobs.insert(name.clone(), entry);

        tracing::debug!(job = %name, interval_secs = interval.as_secs(), "job registered");
        Ok(())
    }

    /// Start every registered job. Returns `false` when the scheduler is
    /// disabled or already running.
    pub fn start(&self) -> bool {
        if !self.enabled {
            tracing::info!("scheduler disabled, no jobs will run");
            return false;
        }

        let mut running = self.running.lock();
        if running.is_some() {
            tracing::warn!("scheduler already running");
            return false;
        }

        let state = Running {
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };
        let jobs = self.jobs.read();
        for (name, entry) in jobs.iter() {
            spawn_driver(name, entry, &state);
        }
        *running = Some(state);

        tracing::info!(jobs = jobs.len(), "scheduler started");
        true
    }

    /// Stop all timers and wait for in-flight runs to finish
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };

        running.cancel.cancel();
        running.tracker.close();
        running.tracker.wait().await;

        tracing::info!("scheduler stopped");
    }

    /// Change a job's interval in place. The next run happens one new
    /// interval from now; the job is not run immediately.
    pub fn reschedule(&self, name: &str, interval: Duration) -> Result<(), SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval(name.to_string()));
        }

        let jobs = self.jobs.read();
        let entry = jobs
            .get(name)
            .ok_or_else(|| SchedulerError::JobNotFound(name.to_string()))?;
        let previous = entry.interval.send_replace(interval);

        tracing::info!(
            job = %name,
            from_secs = previous.as_secs(),
            to_secs = interval.as_secs(),
            "job rescheduled"
        );
        Ok(())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.cancel.cancel();
        }
    }
}

fn spawn_driver(name: &str, entry: &JobEntry, running: &Running) {
    running.tracker.spawn(drive(
        name.to_string(),
        entry.job.clone(),
        entry.interval.subscribe(),
        entry.in_flight.clone(),
        running.cancel.clone(),
        running.tracker.clone(),
    ));
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn drive(
    name: String,
    job: Arc<dyn Job>,
    mut interval_rx: watch::Receiver<Duration>,
    in_flight: Arc<AtomicBool>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut timer = ticker(*interval_rx.borrow_and_update());

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            changed = interval_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                timer = ticker(*interval_rx.borrow_and_update());
            }

            _ = timer.tick() => {
                if in_flight.swap(true, Ordering::AcqRel) {
                    tracing::debug!(job = %name, "previous run still in progress, tick dropped");
                    continue;
                }
                tracker.spawn(execute(name.clone(), job.clone(), in_flight.clone()));
            }
        }
    }

    tracing::debug!(job = %name, "job driver exited");
}

/// Clears the in-flight flag however the run ends
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn execute(name: String, job: Arc<dyn Job>, in_flight: Arc<AtomicBool>) {
    let _in_flight = InFlight(in_flight);

    match AssertUnwindSafe(job.run()).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!(job = %name, error = %format!("{e:#}"), "job run failed");
        }
        Err(payload) => {
            tracing::error!(job = %name, panic = panic_message(payload.as_ref()), "job run panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
