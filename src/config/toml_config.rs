use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORTAL_ID: &str = "24411875";
pub const DEFAULT_FORM_ID: &str = "02a0e618-cd42-4dbd-8381-e168aa403dad";
pub const DEFAULT_MEETING_SLUG: &str = "joseph792";

/// 表單送出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// 透過自家的 contact upsert proxy
    #[default]
    Proxy,
    /// 直接送到 HubSpot Forms 的公開端點
    Direct,
}

/// Modal 端（前台）的設定檔
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub widget: WidgetSection,
    #[serde(default)]
    pub proxy: ProxySection,
    #[serde(default)]
    pub hubspot: HubSpotSection,
    #[serde(default)]
    pub page: PageSection,
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetSection {
    #[serde(default)]
    pub mode: SubmitMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySection {
    pub endpoint: String,
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4321/api/hubspot-contact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSpotSection {
    pub portal_id: String,
    pub form_id: String,
    pub forms_base: String,
    pub meetings_base: String,
    pub meeting_slug: String,
}

impl Default for HubSpotSection {
    fn default() -> Self {
        Self {
            portal_id: DEFAULT_PORTAL_ID.to_string(),
            form_id: DEFAULT_FORM_ID.to_string(),
            forms_base: "https://api.hsforms.com".to_string(),
            meetings_base: "https://meetings.hubspot.com/".to_string(),
            meeting_slug: DEFAULT_MEETING_SLUG.to_string(),
        }
    }
}

/// 送到 HubSpot Forms 的 context（頁面資訊）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSection {
    pub uri: String,
    pub name: String,
}

impl Default for PageSection {
    fn default() -> Self {
        Self {
            uri: "https://bindtarget.com/".to_string(),
            name: "Bindtarget".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_seconds: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
        }
    }
}

impl WidgetConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROXY_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// HubSpot Forms v3 送出端點
    pub fn form_submit_url(&self) -> String {
        format!(
            "{}/submissions/v3/integration/submit/{}/{}",
            self.hubspot.forms_base.trim_end_matches('/'),
            self.hubspot.portal_id,
            self.hubspot.form_id
        )
    }
}

impl Validate for WidgetConfig {
    fn validate(&self) -> Result<()> {
        match self.widget.mode {
            SubmitMode::Proxy => validate_url("proxy.endpoint", &self.proxy.endpoint)?,
            SubmitMode::Direct => {
                validate_url("hubspot.forms_base", &self.hubspot.forms_base)?;
                validate_url("hubspot.meetings_base", &self.hubspot.meetings_base)?;
                validate_non_empty_string("hubspot.portal_id", &self.hubspot.portal_id)?;
                validate_non_empty_string("hubspot.form_id", &self.hubspot.form_id)?;
                validate_non_empty_string("hubspot.meeting_slug", &self.hubspot.meeting_slug)?;
            }
        }

        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 120)?;

        Ok(())
    }
}
