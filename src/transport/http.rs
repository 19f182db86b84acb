//! HTTP/JSON transport on `reqwest`.

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::game::{is_falsy, Direction, GameState};
use crate::transport::GameServer;

/// Body of `GET currentStrategy`.
#[derive(Debug, Deserialize)]
struct StrategyResponse {
    strategy: String,
}

/// Game server reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpServer {
    client: Client,
    config: ClientConfig,
}

impl HttpServer {
    /// Create a transport for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self, operation: &str) -> String {
        self.config.endpoint(operation)
    }

    async fn post(&self, operation: &str) -> TransportResult<()> {
        let response = self.client.post(self.url(operation)).send().await?;
        ensure_success(response)?;
        Ok(())
    }

    fn decode_state(&self, value: &Value) -> GameState {
        let (state, malformed) = GameState::from_value(value, self.config.grid);
        for field in &malformed {
            debug!(%field, "malformed snapshot field, using default");
        }
        state
    }
}

fn ensure_success(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status(status.as_u16()))
    }
}

impl GameServer for HttpServer {
    async fn start(&self) -> TransportResult<()> {
        self.post("start").await
    }

    async fn state(&self) -> TransportResult<GameState> {
        let response = self.client.get(self.url("state")).send().await?;
        let value: Value = ensure_success(response)?.json().await?;
        Ok(self.decode_state(&value))
    }

    async fn move_ship(&self, direction: Direction) -> TransportResult<Option<GameState>> {
        let response = self
            .client
            .post(self.url("move"))
            .query(&[("direction", direction.as_str())])
            .send()
            .await?;
        let body = ensure_success(response)?.bytes().await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&body)?;
        if is_falsy(&value) {
            return Ok(None);
        }
        Ok(Some(self.decode_state(&value)))
    }

    async fn pause(&self) -> TransportResult<()> {
        self.post("pause").await
    }

    async fn resume(&self) -> TransportResult<()> {
        self.post("resume").await
    }

    async fn reset(&self) -> TransportResult<()> {
        self.post("reset").await
    }

    async fn clear_collision(&self) -> TransportResult<()> {
        self.post("clear-collision").await
    }

    async fn current_strategy(&self) -> TransportResult<String> {
        let response = self.client.get(self.url("currentStrategy")).send().await?;
        let body: StrategyResponse = ensure_success(response)?.json().await?;
        Ok(body.strategy)
    }

    async fn toggle_strategy(&self) -> TransportResult<()> {
        self.post("toggleStrategy").await
    }

    async fn activate_invisibility(&self) -> TransportResult<()> {
        self.post("activateInvisibility").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_config() {
        let config = ClientConfig {
            base_url: "http://game.test:8080/api/".to_string(),
            ..ClientConfig::default()
        };
        let server = HttpServer::new(&config).unwrap();
        assert_eq!(server.url("currentStrategy"), "http://game.test:8080/api/currentStrategy");
        assert_eq!(server.url("move"), config.endpoint("move"));
    }

    #[test]
    fn test_strategy_body() {
        let body: StrategyResponse = serde_json::from_str(r#"{"strategy":"Slow Chase"}"#).unwrap();
        assert_eq!(body.strategy, "Slow Chase");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            request_timeout: std::time::Duration::from_millis(200),
            ..ClientConfig::default()
        };
        let server = HttpServer::new(&config).unwrap();
        let err = server.state().await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
