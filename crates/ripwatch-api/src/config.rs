// Configuration endpoints
//
// The settings screen reads the whole document, edits it, and posts the
// whole document back. There is no partial update.

use tracing::debug;

use crate::client::RipperClient;
use crate::error::Error;
use crate::models::{ConfigDocument, MessageBody};

impl RipperClient {
    /// Fetch the service configuration.
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<ConfigDocument, Error> {
        let url = self.api_url("config")?;
        debug!("fetching configuration");
        self.get(url).await
    }

    /// Replace the service configuration.
    ///
    /// `POST /api/config`. Returns the service's confirmation message,
    /// which may be empty.
    pub async fn save_config(&self, config: &ConfigDocument) -> Result<String, Error> {
        let url = self.api_url("config")?;
        debug!("saving configuration");
        let body: MessageBody = self.post_json(url, config).await?;
        Ok(body.message.unwrap_or_default())
    }
}
