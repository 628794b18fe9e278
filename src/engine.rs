use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::{ConfigError, MonitorError};
use crate::guard::InFlightGuard;
use crate::prober::{HttpTransport, Prober, Transport};
use crate::reporter::Reporter;
use crate::table::StatusTable;
use crate::task_group::TaskGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    Running = 0,
    Draining = 1,
    Stopped = 2,
}

impl SchedulerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => SchedulerState::Running,
            1 => SchedulerState::Draining,
            _ => SchedulerState::Stopped,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub probes_dispatched: u64,
    pub probes_skipped: u64,
    pub reports_dispatched: u64,
}

#[derive(Debug, Default)]
struct Counters {
    probes_dispatched: AtomicU64,
    probes_skipped: AtomicU64,
    reports_dispatched: AtomicU64,
}

pub struct Monitor {
    pub config: MonitorConfig,
    pub state: Arc<StatusTable>,
    endpoints: Arc<[String]>,
    in_flight: Arc<InFlightGuard>,
    prober: Prober,
    reporter: Reporter,
    scheduler_state: AtomicU8,
    counters: Counters,
}

impl Monitor {
    /// Monitor probing over HTTP and reporting to stdout.
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, Arc::new(HttpTransport::new()), Reporter::stdout())
    }

    pub fn from_sites(sites: Vec<String>, check_interval: Duration) -> Result<Self, ConfigError> {
        Self::new(MonitorConfig::new(sites, check_interval))
    }

    pub fn with_parts(
        config: MonitorConfig,
        transport: Arc<dyn Transport>,
        reporter: Reporter,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let endpoints: Arc<[String]> = config.sites.clone().into();
        let prober = Prober::new(transport, config.probe_timeout());

        Ok(Self {
            in_flight: Arc::new(InFlightGuard::new(endpoints.len())),
            endpoints,
            state: Arc::new(StatusTable::new()),
            prober,
            reporter,
            scheduler_state: AtomicU8::new(SchedulerState::Stopped as u8),
            counters: Counters::default(),
            config,
        })
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.scheduler_state.load(Ordering::Acquire))
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            probes_dispatched: self.counters.probes_dispatched.load(Ordering::Relaxed),
            probes_skipped: self.counters.probes_skipped.load(Ordering::Relaxed),
            reports_dispatched: self.counters.reports_dispatched.load(Ordering::Relaxed),
        }
    }

    /// Probes and reports on their timers until `cancel` fires, then waits
    /// for every dispatched task before returning. Only ever returns the
    /// cancellation.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), MonitorError> {
        info!(
            endpoints = self.endpoints.len(),
            max_concurrency = self.config.max_concurrency,
            check_interval_ms = self.config.check_interval_ms,
            report_interval_ms = self.config.report_interval_ms,
            "Monitor running"
        );
        self.enter(SchedulerState::Running);

        let mut group = TaskGroup::new(self.config.max_concurrency);
        let mut check_timer = ticker(self.config.check_interval());
        let mut report_timer = ticker(self.config.report_interval());

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = check_timer.tick() => self.dispatch_probes(&mut group, &cancel).await,
                _ = report_timer.tick() => self.dispatch_report(&mut group, &cancel).await,
            }
        }

        self.enter(SchedulerState::Draining);
        info!(outstanding = group.outstanding(), "Cancellation received, draining tasks");
        let errors = group.wait().await;
        if !errors.is_empty() {
            warn!(count = errors.len(), "Tasks failed during run");
        }

        self.enter(SchedulerState::Stopped);
        let stats = self.stats();
        info!(
            probes_dispatched = stats.probes_dispatched,
            probes_skipped = stats.probes_skipped,
            reports_dispatched = stats.reports_dispatched,
            "Monitor stopped"
        );
        Err(MonitorError::Cancelled)
    }

    async fn dispatch_probes(&self, group: &mut TaskGroup, cancel: &CancellationToken) {
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if cancel.is_cancelled() {
                return;
            }

            let Some(lease) = self.in_flight.lease(index) else {
                debug!(endpoint = %endpoint, "Previous probe still in flight, skipping");
                self.counters.probes_skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            };

            let prober = self.prober.clone();
            let table = Arc::clone(&self.state);
            let endpoint = endpoint.clone();
            let probe_cancel = cancel.clone();

            // An unspawned task drops its lease, which clears the flag.
            let spawned = group
                .spawn(cancel, async move {
                    let _lease = lease;
                    let record = prober.probe(&endpoint, &probe_cancel).await;
                    table.write(record).await;
                    Ok(())
                })
                .await;
            if !spawned {
                return;
            }
            self.counters.probes_dispatched.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn dispatch_report(&self, group: &mut TaskGroup, cancel: &CancellationToken) {
        let reporter = self.reporter.clone();
        let table = Arc::clone(&self.state);

        if group
            .spawn(cancel, async move { reporter.report(&table).await })
            .await
        {
            self.counters.reports_dispatched.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn enter(&self, state: SchedulerState) {
        self.scheduler_state.store(state as u8, Ordering::Release);
        debug!(?state, "Scheduler state changed");
    }
}

/// First tick one full period from now; missed ticks are dropped.
fn ticker(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}
