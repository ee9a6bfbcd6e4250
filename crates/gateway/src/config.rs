//! Gateway configuration.

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Externally reachable base URL, used in verification links
    pub public_base_url: String,
}

impl GatewayConfig {
    /// Build a configuration; without an explicit base URL, links point at `localhost:<port>`.
    pub fn new(host: impl Into<String>, port: u16, public_base_url: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            public_base_url: public_base_url.unwrap_or_else(|| local_base_url(port)),
        }
    }

    /// Socket address string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 3000, None)
    }
}

fn local_base_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}
