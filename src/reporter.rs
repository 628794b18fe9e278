use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::TaskError;
use crate::models::Snapshot;
use crate::table::StatusTable;

/// Text stream the reporter writes to. Shared by concurrent report tasks.
pub type Sink = Arc<Mutex<dyn Write + Send>>;

/// Formats a snapshot as one header line plus one line per endpoint.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = format!("{} Current status\n", snapshot.taken_at.to_rfc3339());
    for record in &snapshot.records {
        let _ = writeln!(
            out,
            "{} {} {}",
            record.endpoint,
            record.code,
            record.timestamp.to_rfc3339()
        );
    }
    out
}

#[derive(Clone)]
pub struct Reporter {
    sink: Sink,
}

impl Reporter {
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(std::io::stdout())))
    }

    /// Snapshots `table` and writes the rendered report to the sink.
    pub async fn report(&self, table: &StatusTable) -> Result<(), TaskError> {
        let snapshot = table.snapshot().await;
        let out = render(&snapshot);

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(out.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}
