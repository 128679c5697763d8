#[cfg(feature = "lambda")]
use base64::{engine::general_purpose::STANDARD, Engine as _};
#[cfg(feature = "lambda")]
use demo_booking::domain::model::ProxyReply;
#[cfg(feature = "lambda")]
use demo_booking::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use demo_booking::{handle_contact_request, BookingError, HubSpotClient, ProxyConfig};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::collections::HashMap;

/// API Gateway / function URL 的 proxy 事件，只取需要的欄位
#[cfg(feature = "lambda")]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub http_method: Option<String>,
    pub request_context: Option<RequestContext>,
    pub body: Option<String>,
    /// function URL 與 HTTP API 可能把 body 以 base64 傳入
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Default, Deserialize)]
pub struct HttpContext {
    pub method: Option<String>,
}

#[cfg(feature = "lambda")]
impl Request {
    /// REST API 用 `httpMethod`，HTTP API / function URL 放在 `requestContext.http.method`
    fn method(&self) -> Option<&str> {
        self.http_method.as_deref().or_else(|| {
            self.request_context
                .as_ref()
                .and_then(|ctx| ctx.http.as_ref())
                .and_then(|http| http.method.as_deref())
        })
    }

    /// 還原成原始的 JSON 文字
    fn decoded_body(&self) -> Result<String, BookingError> {
        let raw = self.body.as_deref().unwrap_or("");
        if !self.is_base64_encoded {
            return Ok(raw.to_string());
        }

        let bytes = STANDARD
            .decode(raw)
            .map_err(|e| BookingError::BodyEncodingError {
                reason: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|e| BookingError::BodyEncodingError {
            reason: e.to_string(),
        })
    }
}

#[cfg(feature = "lambda")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[cfg(feature = "lambda")]
impl Response {
    fn json(status_code: u16, body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    fn from_reply(reply: ProxyReply) -> Result<Self, Error> {
        Ok(Self::json(reply.status, serde_json::to_string(&reply.body)?))
    }
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    // 每次請求重新讀取環境變數
    respond(event.payload, ProxyConfig::from_env()).await
}

#[cfg(feature = "lambda")]
async fn respond(request: Request, config: ProxyConfig) -> Result<Response, Error> {
    if let Some(method) = request.method() {
        if !method.eq_ignore_ascii_case("POST") {
            tracing::debug!("Rejected {} request", method);
            return Ok(Response::json(
                405,
                serde_json::json!({ "error": "Method not allowed" }).to_string(),
            ));
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Proxy configuration invalid: {}", e);
        return Response::from_reply(ProxyReply::failure(&e));
    }

    let body = match request.decoded_body() {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Rejected contact request: {}", e);
            return Response::from_reply(ProxyReply::failure(&e));
        }
    };

    let crm = HubSpotClient::new(&config).map_err(|e: BookingError| Box::new(e) as Error)?;
    let reply = handle_contact_request(&crm, &config, &body).await;

    tracing::info!("Contact request finished with status {}", reply.status);
    Response::from_reply(reply)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
