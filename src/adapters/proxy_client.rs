use crate::domain::model::ContactSubmission;
use crate::domain::ports::ContactSubmitter;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyResponse {
    meeting_url: Option<String>,
    error: Option<String>,
}

/// 把表單送到自家的 contact upsert proxy
#[derive(Debug, Clone)]
pub struct ProxySubmitter {
    client: Client,
    endpoint: String,
}

impl ProxySubmitter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ContactSubmitter for ProxySubmitter {
    async fn submit(&self, contact: &ContactSubmission) -> Result<String> {
        tracing::debug!("Posting demo request to {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(contact).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body: ProxyResponse = serde_json::from_str(&text).unwrap_or_default();

        match (status.is_success(), body.meeting_url) {
            (true, Some(meeting_url)) => Ok(meeting_url),
            _ => Err(BookingError::SubmissionRejectedError {
                status: status.as_u16(),
                message: body.error,
            }),
        }
    }
}
