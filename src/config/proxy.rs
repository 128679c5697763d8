use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use std::env;
use std::time::Duration;

pub const DEFAULT_MEETING_LINK: &str = "https://meetings.hubspot.com/joseph792";
pub const DEFAULT_API_BASE: &str = "https://api.hubapi.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Proxy 的伺服器端設定，每次請求都從環境變數重新讀取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// 缺少時該次請求回 500，而不是在啟動時失敗
    pub api_key: Option<String>,
    pub meeting_link: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            meeting_link: DEFAULT_MEETING_LINK.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意 key → value 來源建立設定，空字串視同未設定
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_key: read("HUBSPOT_API_KEY"),
            meeting_link: read("HUBSPOT_MEETING_LINK")
                .unwrap_or_else(|| DEFAULT_MEETING_LINK.to_string()),
            api_base: read("HUBSPOT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_seconds: read("HUBSPOT_TIMEOUT_SECONDS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for ProxyConfig {
    fn validate(&self) -> Result<()> {
        // 驗證排程連結
        validate_url("meeting_link", &self.meeting_link)?;

        // 驗證 HubSpot API 位址
        validate_url("api_base", &self.api_base)?;

        validate_range("timeout_seconds", self.timeout_seconds, 1, 120)?;

        tracing::debug!("✅ Proxy configuration validation passed");
        Ok(())
    }
}
