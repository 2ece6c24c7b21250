use crate::amount::AmountPolicy;
use crate::error::{ClientError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    /// `None` leaves requests without a deadline.
    pub request_timeout: Option<Duration>,
    pub amount_policy: AmountPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            request_timeout: None,
            amount_policy: AmountPolicy::PassThrough,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("money-tracker")
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("MONEY_TRACKER_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "MONEY_TRACKER_API_URL must be an http(s) URL, got {:?}",
                api_base_url
            )));
        }
        let data_dir = env::var("MONEY_TRACKER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let request_timeout = match env::var("MONEY_TRACKER_TIMEOUT_SECS") {
            Ok(v) => Some(Duration::from_secs(v.trim().parse().map_err(|_| {
                ClientError::Config(format!("MONEY_TRACKER_TIMEOUT_SECS is not a number: {:?}", v))
            })?)),
            Err(_) => None,
        };
        let amount_policy = match env::var("MONEY_TRACKER_STRICT_AMOUNTS") {
            Ok(v) if parse_flag(&v) => AmountPolicy::RejectNonFinite,
            _ => AmountPolicy::PassThrough,
        };
        Ok(Self {
            api_base_url,
            data_dir,
            request_timeout,
            amount_policy,
        })
    }
}
