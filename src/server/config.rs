use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Value every `/data` request must carry in the `X-API-Key` header.
    pub api_key: String,
    pub requests_logging_level: RequestsLoggingLevel,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("requests_logging_level", &self.requests_logging_level)
            .finish()
    }
}
