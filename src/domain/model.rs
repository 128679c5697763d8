use crate::core::classifier::{email_domain, is_business_email};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_email_syntax, validate_required_fields};
use serde::{Deserialize, Serialize};

/// 表單送出時建立的聯絡人資料，名字已 trim、email 已 trim 並轉小寫
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ContactSubmission {
    /// 依序檢查：必填 → email 格式 → 企業信箱
    pub fn from_form(
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self> {
        validate_required_fields(&[first_name, last_name, email])?;

        let email = email.unwrap_or_default().trim().to_lowercase();
        validate_email_syntax(&email)?;

        if !is_business_email(&email) {
            return Err(BookingError::FreeEmailError {
                domain: email_domain(&email).unwrap_or_default().to_string(),
            });
        }

        Ok(Self {
            first_name: first_name.unwrap_or_default().trim().to_string(),
            last_name: last_name.unwrap_or_default().trim().to_string(),
            email,
        })
    }
}

/// Proxy 收到的原始 JSON body；欄位可能缺漏
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactRequest {
    pub fn into_submission(self) -> Result<ContactSubmission> {
        ContactSubmission::from_form(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalStep {
    Form,
    Submitting,
    Scheduler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Open,
    SubmitAccepted,
    SubmitRejected,
    SubmitSucceeded,
    SubmitFailed,
    Close,
}

/// Proxy 回應的 JSON 形狀
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProxyBody {
    Success {
        success: bool,
        #[serde(rename = "meetingUrl")]
        meeting_url: String,
    },
    Failure {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: ProxyBody,
}

impl ProxyReply {
    pub fn success(meeting_url: String) -> Self {
        Self {
            status: 200,
            body: ProxyBody::Success {
                success: true,
                meeting_url,
            },
        }
    }

    pub fn failure(error: &BookingError) -> Self {
        Self {
            status: error.status_code(),
            body: ProxyBody::Failure {
                error: error.user_friendly_message(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, ProxyBody::Success { .. })
    }

    pub fn meeting_url(&self) -> Option<&str> {
        match &self.body {
            ProxyBody::Success { meeting_url, .. } => Some(meeting_url),
            ProxyBody::Failure { .. } => None,
        }
    }
}

/// CRM 建立聯絡人的結果；409 衝突不算錯誤
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created,
    Conflict { body: serde_json::Value },
    Rejected { status: u16, body: serde_json::Value },
}
