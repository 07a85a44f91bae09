// Status and log endpoints
//
// The two read paths the dashboard polls: the job snapshot and the log tail.

use tracing::debug;

use crate::client::RipperClient;
use crate::error::Error;
use crate::models::{LogBatch, LogEntry, StatusSnapshot};

impl RipperClient {
    /// Fetch the current job status.
    ///
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<StatusSnapshot, Error> {
        let url = self.api_url("status")?;
        self.get(url).await
    }

    /// Fetch the last `lines` entries of the service log file, oldest first.
    ///
    /// `GET /api/logs/tail?lines=N`
    pub async fn tail_logs(&self, lines: u32) -> Result<Vec<LogEntry>, Error> {
        let url = self.api_url(&format!("logs/tail?lines={lines}"))?;
        debug!(lines, "fetching log tail");
        let batch: LogBatch = self.get(url).await?;
        Ok(batch.logs)
    }

    /// Fetch the service's in-memory event log, newest first.
    ///
    /// `GET /api/logs?limit=N`
    pub async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, Error> {
        let url = self.api_url(&format!("logs?limit={limit}"))?;
        debug!(limit, "fetching recent logs");
        let batch: LogBatch = self.get(url).await?;
        Ok(batch.logs)
    }
}
