use crate::geo::Coordinate;
use dotenvy::dotenv;
use std::env;

/// Fallback geofence center used until an administrator sets one.
pub const DEFAULT_REFERENCE_LOCATION: Coordinate = Coordinate {
    latitude: 39.9042,
    longitude: 116.4074,
};

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub data_dir: String,
    pub allowed_radius_m: f64,
    pub fix_wait_secs: u64,
    pub message_service_url: Option<String>,
    pub message_timeout_ms: u64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            allowed_radius_m: env::var("ALLOWED_RADIUS_M")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),
            fix_wait_secs: env::var("FIX_WAIT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),
            message_service_url: env::var("MESSAGE_SERVICE_URL").ok(),
            message_timeout_ms: env::var("MESSAGE_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
