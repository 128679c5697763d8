use crate::config::ProxyConfig;
use crate::domain::model::{ContactSubmission, CreateOutcome};
use crate::domain::ports::CrmContacts;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ContactProperties<'a> {
    properties: Properties<'a>,
}

#[derive(Debug, Serialize)]
struct Properties<'a> {
    firstname: &'a str,
    lastname: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

/// HubSpot CRM v3 contacts API
#[derive(Debug, Clone)]
pub struct HubSpotClient {
    client: Client,
    api_base: String,
}

impl HubSpotClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn contacts_url(&self) -> String {
        format!("{}/crm/v3/objects/contacts", self.api_base)
    }
}

/// 送不出去的請求（連線、逾時）歸類為上游無法使用
fn service_unavailable(err: reqwest::Error) -> BookingError {
    BookingError::ServiceUnavailableError {
        reason: err.to_string(),
    }
}

/// 讀取回應 body；不是 JSON 時以字串保留，方便記錄
async fn body_value(response: Response) -> serde_json::Value {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}

#[async_trait]
impl CrmContacts for HubSpotClient {
    async fn create_contact(
        &self,
        token: &str,
        contact: &ContactSubmission,
    ) -> Result<CreateOutcome> {
        let payload = ContactProperties {
            properties: Properties {
                firstname: &contact.first_name,
                lastname: &contact.last_name,
                email: Some(&contact.email),
            },
        };

        tracing::debug!("Creating HubSpot contact at {}", self.contacts_url());
        let response = self
            .client
            .post(self.contacts_url())
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(service_unavailable)?;

        let status = response.status();
        tracing::debug!("HubSpot create response status: {}", status);

        if status == StatusCode::CONFLICT {
            return Ok(CreateOutcome::Conflict {
                body: body_value(response).await,
            });
        }

        if !status.is_success() {
            let body = body_value(response).await;
            tracing::error!("HubSpot create error ({}): {}", status, body);
            return Ok(CreateOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(CreateOutcome::Created)
    }

    async fn update_contact_name(
        &self,
        token: &str,
        contact_id: &str,
        contact: &ContactSubmission,
    ) -> Result<()> {
        let payload = ContactProperties {
            properties: Properties {
                firstname: &contact.first_name,
                lastname: &contact.last_name,
                email: None,
            },
        };

        let response = self
            .client
            .patch(format!("{}/{}", self.contacts_url(), contact_id))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(service_unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookingError::UpstreamRejectedError {
                status: status.as_u16(),
                body: body_value(response).await.to_string(),
            });
        }

        Ok(())
    }
}
