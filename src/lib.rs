//! Periodic concurrent health-check monitor.
//!
//! A [`Monitor`] probes a fixed set of endpoints on one timer and prints a
//! snapshot of their latest status on another, running at most
//! `max_concurrency` tasks at once and stopping when its cancellation token
//! fires.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod models;
pub mod prober;
pub mod reporter;
pub mod table;
pub mod task_group;

pub use config::MonitorConfig;
pub use engine::{Monitor, RunStats, SchedulerState};
pub use error::{ConfigError, MonitorError, TaskError, TransportError};
pub use models::{Snapshot, StatusRecord, FAILURE_CODE};
pub use prober::{HttpTransport, Prober, Transport};
pub use reporter::{Reporter, Sink};
pub use table::StatusTable;
