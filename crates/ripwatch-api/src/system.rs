// Service commands
//
// Fire-and-forget operations: only the response status is meaningful.

use tracing::debug;

use crate::client::RipperClient;
use crate::error::Error;

impl RipperClient {
    /// Eject the disc in the ripper's drive.
    ///
    /// `POST /api/eject`
    pub async fn eject(&self) -> Result<(), Error> {
        let url = self.api_url("eject")?;
        debug!("ejecting disc");
        self.post_empty(url).await
    }

    /// Restart the ripper service so it picks up a new configuration.
    ///
    /// `POST /api/restart`
    pub async fn restart(&self) -> Result<(), Error> {
        let url = self.api_url("restart")?;
        debug!("restarting service");
        self.post_empty(url).await
    }
}
