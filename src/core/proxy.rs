use crate::config::proxy::ProxyConfig;
use crate::core::scheduling::SchedulingLink;
use crate::domain::model::{ContactRequest, ContactSubmission, CreateOutcome, ProxyReply};
use crate::domain::ports::CrmContacts;
use crate::utils::error::{BookingError, ErrorCategory, Result};
use regex::Regex;
use std::sync::LazyLock;

static EXISTING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ID:\s*(\d+)").expect("existing id pattern compiles"));

/// 處理一次 `POST` 請求：驗證 → 建立或更新 CRM 聯絡人 → 回傳排程連結
pub async fn handle_contact_request<C: CrmContacts>(
    crm: &C,
    config: &ProxyConfig,
    body: &str,
) -> ProxyReply {
    match upsert_contact(crm, config, body).await {
        Ok(meeting_url) => ProxyReply::success(meeting_url),
        Err(e) => {
            match e.category() {
                ErrorCategory::ClientValidation => {
                    tracing::debug!("Rejected contact request: {}", e)
                }
                _ => tracing::error!("❌ Contact upsert failed: {}", e),
            }
            ProxyReply::failure(&e)
        }
    }
}

async fn upsert_contact<C: CrmContacts>(
    crm: &C,
    config: &ProxyConfig,
    body: &str,
) -> Result<String> {
    // 先檢查憑證，缺少時不發出任何外部呼叫
    let token = config
        .api_key
        .as_deref()
        .ok_or(BookingError::MissingCredentialError)?;
    // 排程連結設定錯誤時，也不能先寫入 CRM 再回 500
    let link = SchedulingLink::parse(&config.meeting_link)?;

    let request: ContactRequest =
        serde_json::from_str(body).map_err(BookingError::RequestBodyError)?;
    let contact = request.into_submission()?;

    match crm.create_contact(token, &contact).await? {
        CreateOutcome::Created => {
            tracing::info!("✅ Created CRM contact for {}", contact.email);
        }
        CreateOutcome::Conflict { body } => {
            refresh_existing_contact(crm, token, &contact, &body).await;
        }
        CreateOutcome::Rejected { status, body } => {
            return Err(BookingError::UpstreamRejectedError {
                status,
                body: body.to_string(),
            });
        }
    }

    Ok(link.for_contact(&contact).to_string())
}

/// 聯絡人已存在：盡量更新名字，任何失敗都不影響整體結果
async fn refresh_existing_contact<C: CrmContacts>(
    crm: &C,
    token: &str,
    contact: &ContactSubmission,
    conflict: &serde_json::Value,
) {
    let Some(existing_id) = existing_contact_id(conflict) else {
        tracing::warn!(
            "Contact {} already exists but no ID in conflict response: {}",
            contact.email,
            conflict
        );
        return;
    };

    match crm.update_contact_name(token, &existing_id, contact).await {
        Ok(()) => tracing::info!("✅ Updated existing CRM contact {}", existing_id),
        Err(e) => tracing::warn!("Could not update existing contact {}: {}", existing_id, e),
    }
}

/// 從 409 回應的 `message` 取出既有聯絡人 ID，例如 "Contact already exists. Existing ID: 12345"
pub fn existing_contact_id(conflict: &serde_json::Value) -> Option<String> {
    let message = conflict.get("message")?.as_str()?;
    EXISTING_ID
        .captures(message)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCrm {
        create: Option<CreateOutcome>,
        fail_update: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCrm {
        fn returning(outcome: CreateOutcome) -> Self {
            Self {
                create: Some(outcome),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrmContacts for FakeCrm {
        async fn create_contact(
            &self,
            token: &str,
            contact: &ContactSubmission,
        ) -> Result<CreateOutcome> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {} {}", token, contact.email));
            match &self.create {
                Some(outcome) => Ok(outcome.clone()),
                None => Err(BookingError::ServiceUnavailableError {
                    reason: "operation timed out".to_string(),
                }),
            }
        }

        async fn update_contact_name(
            &self,
            _token: &str,
            contact_id: &str,
            contact: &ContactSubmission,
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} {} {}", contact_id, contact.first_name, contact.last_name));
            if self.fail_update {
                Err(BookingError::UpstreamRejectedError {
                    status: 500,
                    body: "{}".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn config() -> ProxyConfig {
        ProxyConfig {
            api_key: Some("test-token".to_string()),
            ..ProxyConfig::default()
        }
    }

    const JANE: &str = r#"{"firstName":" Jane ","lastName":"Smith","email":"Jane@Acme.com"}"#;

    #[tokio::test]
    async fn test_created_contact_returns_meeting_url() {
        let crm = FakeCrm::returning(CreateOutcome::Created);
        let reply = handle_contact_request(&crm, &config(), JANE).await;

        assert_eq!(reply.status, 200);
        let url = reply.meeting_url().unwrap();
        assert!(url.starts_with("https://meetings.hubspot.com/joseph792?"));
        assert!(url.contains("email=jane%40acme.com"));
        assert!(url.contains("firstName=Jane&lastName=Smith"));
        assert_eq!(crm.calls(), vec!["create test-token jane@acme.com"]);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_crm() {
        let crm = FakeCrm::returning(CreateOutcome::Created);
        let reply = handle_contact_request(&crm, &ProxyConfig::default(), JANE).await;

        assert_eq!(reply.status, 500);
        assert!(!reply.is_success());
        assert!(crm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_client_errors() {
        let crm = FakeCrm::returning(CreateOutcome::Created);
        let cases = [
            ("not json", "Invalid request body"),
            (r#"{"firstName":"Jane","lastName":"","email":"j@acme.com"}"#, "First name, last name, and email are required."),
            (r#"{"firstName":"Jane","lastName":"Smith","email":"jane@acme"}"#, "Please enter a valid email address."),
            (r#"{"firstName":"Jane","lastName":"Smith","email":"jane@yahoo.com"}"#, "Please use your business email address."),
        ];

        for (body, message) in cases {
            let reply = handle_contact_request(&crm, &config(), body).await;
            assert_eq!(reply.status, 400, "{}", body);
            assert_eq!(
                reply.body,
                crate::domain::model::ProxyBody::Failure {
                    error: message.to_string()
                }
            );
        }
        assert!(crm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_conflict_updates_existing_contact() {
        let crm = FakeCrm::returning(CreateOutcome::Conflict {
            body: json!({"status": "error", "message": "Contact already exists. Existing ID: 90210"}),
        });
        let reply = handle_contact_request(&crm, &config(), JANE).await;

        assert_eq!(reply.status, 200);
        assert_eq!(crm.calls()[1], "update 90210 Jane Smith");
    }

    #[tokio::test]
    async fn test_conflict_succeeds_even_if_update_fails() {
        let crm = FakeCrm {
            create: Some(CreateOutcome::Conflict {
                body: json!({"message": "Contact already exists. Existing ID: 1"}),
            }),
            fail_update: true,
            ..Default::default()
        };
        let reply = handle_contact_request(&crm, &config(), JANE).await;
        assert!(reply.is_success());
    }

    #[tokio::test]
    async fn test_conflict_without_id_skips_update() {
        let crm = FakeCrm::returning(CreateOutcome::Conflict {
            body: json!({"message": "Contact already exists"}),
        });
        let reply = handle_contact_request(&crm, &config(), JANE).await;
        assert!(reply.is_success());
        assert_eq!(crm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_crm_rejection_and_outage_are_bad_gateway() {
        let crm = FakeCrm::returning(CreateOutcome::Rejected {
            status: 400,
            body: json!({"message": "Property values were not valid"}),
        });
        let reply = handle_contact_request(&crm, &config(), JANE).await;
        assert_eq!(reply.status, 502);
        assert_eq!(
            reply.body,
            crate::domain::model::ProxyBody::Failure {
                error: "Failed to save contact. Please try again.".to_string()
            }
        );

        let offline = FakeCrm::default();
        let reply = handle_contact_request(&offline, &config(), JANE).await;
        assert_eq!(reply.status, 502);
        assert_eq!(
            reply.body,
            crate::domain::model::ProxyBody::Failure {
                error: "Service temporarily unavailable. Please try again.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_bad_meeting_link_fails_before_crm() {
        let crm = FakeCrm::returning(CreateOutcome::Created);
        let config = ProxyConfig {
            meeting_link: "meetings.hubspot.com/joseph792".to_string(),
            ..config()
        };
        let reply = handle_contact_request(&crm, &config, JANE).await;

        assert_eq!(reply.status, 500);
        assert_eq!(
            reply.body,
            crate::domain::model::ProxyBody::Failure {
                error: "Server misconfigured. Please try again later.".to_string()
            }
        );
        assert!(crm.calls().is_empty());
    }

    #[test]
    fn test_existing_contact_id() {
        assert_eq!(
            existing_contact_id(&json!({"message": "Contact already exists. Existing ID: 12345"})),
            Some("12345".to_string())
        );
        assert_eq!(existing_contact_id(&json!({"message": "ID:42"})), Some("42".to_string()));
        assert_eq!(existing_contact_id(&json!({"message": "exists"})), None);
        assert_eq!(existing_contact_id(&serde_json::Value::Null), None);
    }
}
