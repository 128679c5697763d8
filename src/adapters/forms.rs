use crate::config::toml_config::PageSection;
use crate::config::WidgetConfig;
use crate::core::scheduling::SchedulingLink;
use crate::domain::model::ContactSubmission;
use crate::domain::ports::ContactSubmitter;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormSubmission<'a> {
    fields: [FormField<'a>; 3],
    context: FormContext<'a>,
    submitted_at: String,
}

#[derive(Debug, Serialize)]
struct FormField<'a> {
    name: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormContext<'a> {
    page_uri: &'a str,
    page_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct FormErrors {
    #[serde(default)]
    errors: Vec<FormError>,
}

#[derive(Debug, Deserialize)]
struct FormError {
    message: Option<String>,
}

/// 直接送到 HubSpot Forms 公開端點，成功後在本地組出內嵌排程器連結
#[derive(Debug, Clone)]
pub struct HubSpotFormSubmitter {
    client: Client,
    submit_url: String,
    page: PageSection,
    scheduler: SchedulingLink,
}

impl HubSpotFormSubmitter {
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(config.timeout()).build()?,
            submit_url: config.form_submit_url(),
            page: config.page.clone(),
            scheduler: SchedulingLink::embedded(
                &config.hubspot.meetings_base,
                &config.hubspot.meeting_slug,
            )?,
        })
    }
}

#[async_trait]
impl ContactSubmitter for HubSpotFormSubmitter {
    async fn submit(&self, contact: &ContactSubmission) -> Result<String> {
        let payload = FormSubmission {
            fields: [
                FormField {
                    name: "firstname",
                    value: &contact.first_name,
                },
                FormField {
                    name: "lastname",
                    value: &contact.last_name,
                },
                FormField {
                    name: "email",
                    value: &contact.email,
                },
            ],
            context: FormContext {
                page_uri: &self.page.uri,
                page_name: &self.page.name,
            },
            submitted_at: chrono::Utc::now().timestamp_millis().to_string(),
        };

        tracing::debug!("Submitting HubSpot form at {}", self.submit_url);
        let response = self
            .client
            .post(&self.submit_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: FormErrors = serde_json::from_str(&text).unwrap_or_default();
            tracing::warn!("HubSpot form submission failed ({}): {}", status, text);
            return Err(BookingError::SubmissionRejectedError {
                status: status.as_u16(),
                message: body.errors.into_iter().next().and_then(|e| e.message),
            });
        }

        Ok(self.scheduler.for_contact(contact).to_string())
    }
}
