use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid request body: {0}")]
    RequestBodyError(#[source] serde_json::Error),

    #[error("Request body could not be decoded: {reason}")]
    BodyEncodingError { reason: String },

    #[error("First name, last name, and email are required")]
    MissingFieldsError,

    #[error("Malformed email address: {email}")]
    InvalidEmailError { email: String },

    #[error("Free email provider is not accepted: {domain}")]
    FreeEmailError { domain: String },

    #[error("HubSpot API key not configured")]
    MissingCredentialError,

    #[error("CRM rejected the request with status {status}: {body}")]
    UpstreamRejectedError { status: u16, body: String },

    #[error("CRM unreachable: {reason}")]
    ServiceUnavailableError { reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Submission rejected with status {status}")]
    SubmissionRejectedError {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，決定對外的 HTTP 狀態與訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入問題，可直接修正後重送
    ClientValidation,
    /// 伺服器設定缺漏，需要維運人員處理
    ServerConfiguration,
    /// CRM 或網路失敗，提示稍後重試
    UpstreamService,
    Internal,
}

impl BookingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::RequestBodyError(_)
            | BookingError::BodyEncodingError { .. }
            | BookingError::MissingFieldsError
            | BookingError::InvalidEmailError { .. }
            | BookingError::FreeEmailError { .. } => ErrorCategory::ClientValidation,
            BookingError::MissingCredentialError
            | BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::UrlError(_) => ErrorCategory::ServerConfiguration,
            BookingError::UpstreamRejectedError { .. }
            | BookingError::ServiceUnavailableError { .. }
            | BookingError::ApiError(_)
            | BookingError::SubmissionRejectedError { .. } => ErrorCategory::UpstreamService,
            BookingError::IoError(_) | BookingError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// 對應 proxy 回應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::ClientValidation => 400,
            ErrorCategory::UpstreamService => 502,
            ErrorCategory::ServerConfiguration | ErrorCategory::Internal => 500,
        }
    }

    /// 可以直接回給呼叫端的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::RequestBodyError(_) | BookingError::BodyEncodingError { .. } => {
                "Invalid request body".to_string()
            }
            BookingError::MissingFieldsError => {
                "First name, last name, and email are required.".to_string()
            }
            BookingError::InvalidEmailError { .. } => {
                "Please enter a valid email address.".to_string()
            }
            BookingError::FreeEmailError { .. } => {
                "Please use your business email address.".to_string()
            }
            BookingError::MissingCredentialError => "HubSpot API key not configured".to_string(),
            BookingError::UpstreamRejectedError { .. } => {
                "Failed to save contact. Please try again.".to_string()
            }
            BookingError::ServiceUnavailableError { .. } | BookingError::ApiError(_) => {
                "Service temporarily unavailable. Please try again.".to_string()
            }
            BookingError::SubmissionRejectedError { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Submission failed. Please try again.".to_string()),
            BookingError::UrlError(_)
            | BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. } => {
                "Server misconfigured. Please try again later.".to_string()
            }
            BookingError::IoError(_) | BookingError::SerializationError(_) => {
                "Unexpected server error. Please try again.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::ClientValidation => "Correct the highlighted fields and resubmit",
            ErrorCategory::ServerConfiguration => {
                "Check HUBSPOT_API_KEY, HUBSPOT_MEETING_LINK and the widget config file"
            }
            ErrorCategory::UpstreamService => "Check network access to HubSpot and resubmit",
            ErrorCategory::Internal => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
