use std::time::Duration;

const MILLISECONDS_PLACEHOLDER: &str = "{milliseconds}";

/// Dead man's switch ping sent after every successful check.
pub struct Heartbeat {
    client: reqwest::Client,
    url: String,
}

impl Heartbeat {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    fn url_for(&self, elapsed: Duration) -> String {
        self.url.replace(MILLISECONDS_PLACEHOLDER, &elapsed.as_millis().to_string())
    }

    /// Best effort: failures are logged and never fail the check.
    pub async fn ping(&self, elapsed: Duration) {
        let url = self.url_for(elapsed);
        log::debug!("Get {url}");

        let result = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        if let Err(e) = result {
            log::warn!("Heartbeat failed: {e}");
        }
    }
}
