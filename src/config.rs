// Client configuration for talking to the hotel service

use crate::room::CoercionPolicy;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub coercion: CoercionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
            user_agent: concat!("hotel-account/", env!("CARGO_PKG_VERSION")).to_string(),
            coercion: CoercionPolicy::Strict,
        }
    }
}
