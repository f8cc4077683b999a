use serde_json::Value;
use tracing::debug;

use super::{JsonFetcher, TransportError};

/// `JsonFetcher` over a blocking ureq agent.
///
/// No retries, and no timeouts beyond the ureq defaults.
pub struct HttpJsonFetcher {
    agent: ureq::Agent,
}

impl HttpJsonFetcher {
    pub fn new() -> Self {
        HttpJsonFetcher { agent: ureq::AgentBuilder::new().build() }
    }
}

impl Default for HttpJsonFetcher {
    fn default() -> Self {
        HttpJsonFetcher::new()
    }
}

impl JsonFetcher for HttpJsonFetcher {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let resp = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                return Err(TransportError::Status { status, text: resp.status_text().to_owned() });
            }
            Err(ureq::Error::Transport(transport)) => {
                // Transport's Display includes the URL, which carries the api key
                let detail = match transport.message() {
                    Some(message) => format!("{}: {}", transport.kind(), message),
                    None => transport.kind().to_string(),
                };
                return Err(TransportError::Network(detail));
            }
        };
        debug!(status = resp.status(), "response received");
        resp.into_json::<Value>()
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}
