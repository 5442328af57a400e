use crate::service::EngineConfig;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub erp: ErpConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpConfig {
    pub base_url: String,
    pub auth_token: String,
    /// Status label written on approval.
    pub approved_status: String,
    /// Status label written when the order is sent back for review.
    pub review_status: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            erp: ErpConfig {
                base_url: "http://localhost:9090/api".to_string(),
                auth_token: String::new(),
                approved_status: "Approved".to_string(),
                review_status: "Sent back for review".to_string(),
            },
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables, falling back to the
    /// defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut engine = EngineConfig::default();
        if let Ok(prefix) = std::env::var("SHIPPING_PREFIX") {
            engine.shipping_prefix = prefix;
        }
        if let Ok(format) = std::env::var("TARGET_DATE_FORMAT") {
            engine.target_date_format = format;
        }

        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            erp: ErpConfig {
                base_url: std::env::var("ERP_BASE_URL").unwrap_or(defaults.erp.base_url),
                auth_token: std::env::var("ERP_AUTH_TOKEN").unwrap_or(defaults.erp.auth_token),
                approved_status: std::env::var("ERP_APPROVED_STATUS")
                    .unwrap_or(defaults.erp.approved_status),
                review_status: std::env::var("ERP_REVIEW_STATUS")
                    .unwrap_or(defaults.erp.review_status),
            },
            engine,
        }
    }
}
