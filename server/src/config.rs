//! Runtime settings for the server process.
//!
//! Gameplay constants are deliberately absent: they live in `shared` so the
//! server and every renderer agree on them.

use shared::TICK_RATE;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind to
    pub host: String,
    /// UDP port to listen on
    pub port: u16,
    /// Room updates per second
    pub tick_rate: u32,
    /// Maximum concurrent connections across all rooms
    pub max_clients: usize,
    /// Silence after which a client is disconnected
    pub client_timeout: Duration,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fixed step between two ticks of a room. A zero tick rate is treated as 1 Hz.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            tick_rate: TICK_RATE,
            max_clients: 64,
            client_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.client_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_tick_duration() {
        let config = ServerConfig::default();
        assert_approx_eq!(config.tick_duration().as_secs_f64(), 1.0 / 60.0, 1e-9);

        let zero = ServerConfig {
            tick_rate: 0,
            ..ServerConfig::default()
        };
        assert_eq!(zero.tick_duration(), Duration::from_secs(1));
    }
}
