//! EmailJS REST transport.
//!
//! `POST {endpoint}/api/v1.0/email/send` with a JSON body carrying the
//! service, template, public key and template parameters. EmailJS answers
//! `200 OK` with the body `OK`, or an error status with a plain-text reason.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{Relay, RelayResponse};
use crate::config::RelayConfig;
use crate::error::{InquiryError, Result};
use crate::message::TemplateParams;

const SEND_PATH: &str = "/api/v1.0/email/send";

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a TemplateParams,
}

/// HTTP client for the EmailJS API. Not ready until [`EmailJsRelay::init`] succeeds.
pub struct EmailJsRelay {
    base_url: String,
    public_key: String,
    access_token: Option<String>,
    unset_keys: Vec<&'static str>,
    client: Client,
    ready: AtomicBool,
}

impl EmailJsRelay {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| InquiryError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            public_key: config.public_key.trim().to_string(),
            access_token: config.access_token.clone(),
            unset_keys: config.unset_keys(),
            client,
            ready: AtomicBool::new(false),
        })
    }

    /// Check the identifiers, credentials and endpoint, then mark the relay ready.
    ///
    /// Every blank relay key is reported at once.
    pub fn init(&self) -> Result<()> {
        if !self.unset_keys.is_empty() {
            return Err(InquiryError::Config(format!(
                "not set: {}",
                self.unset_keys.join(", ")
            )));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            InquiryError::Config(format!("invalid relay endpoint '{}': {e}", self.base_url))
        })?;
        self.ready.store(true, Ordering::Release);
        tracing::info!(endpoint = %self.base_url, "EmailJS relay initialized");
        Ok(())
    }

    fn send_url(&self) -> String {
        format!("{}{SEND_PATH}", self.base_url)
    }
}

#[async_trait]
impl Relay for EmailJsRelay {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<RelayResponse> {
        let body = SendRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            access_token: self.access_token.as_deref(),
            template_params: params,
        };

        tracing::debug!(service_id, template_id, fields = params.len(), "Sending via EmailJS");
        let resp = self.client.post(self.send_url()).json(&body).send().await?;

        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        tracing::debug!(status, %text, "EmailJS response");

        Ok(RelayResponse {
            status: Some(status),
            text: Some(text).filter(|t| !t.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_key: &str, endpoint: &str) -> RelayConfig {
        RelayConfig {
            endpoint: endpoint.into(),
            service_id: "service_x".into(),
            template_id: "template_y".into(),
            public_key: public_key.into(),
            recipient: "workshop@example.com".into(),
            ..RelayConfig::default()
        }
    }

    fn assert_init_names(cfg: RelayConfig, key: &str) {
        let relay = EmailJsRelay::new(&cfg).unwrap();
        match relay.init() {
            Err(InquiryError::Config(msg)) => assert!(msg.contains(key), "{msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
        assert!(!relay.is_ready());
    }

    #[test]
    fn test_init_requires_service_id() {
        let mut cfg = config("pk_123", "https://api.emailjs.com");
        cfg.service_id = String::new();
        assert_init_names(cfg, "relay.service_id");
    }

    #[test]
    fn test_init_requires_template_id() {
        let mut cfg = config("pk_123", "https://api.emailjs.com");
        cfg.template_id = "   ".into();
        assert_init_names(cfg, "relay.template_id");
    }

    #[test]
    fn test_init_requires_recipient() {
        let mut cfg = config("pk_123", "https://api.emailjs.com");
        cfg.recipient = String::new();
        assert_init_names(cfg, "relay.recipient");
    }

    #[test]
    fn test_default_config_is_never_ready() {
        let cfg = RelayConfig {
            public_key: "pk".into(),
            ..RelayConfig::default()
        };
        let relay = EmailJsRelay::new(&cfg).unwrap();
        assert!(relay.init().is_err());
        assert!(!relay.is_ready());
    }

    #[test]
    fn test_not_ready_before_init() {
        let relay = EmailJsRelay::new(&config("pk_123", "https://api.emailjs.com")).unwrap();
        assert!(!relay.is_ready());
        relay.init().unwrap();
        assert!(relay.is_ready());
    }

    #[test]
    fn test_init_requires_public_key() {
        let relay = EmailJsRelay::new(&config("  ", "https://api.emailjs.com")).unwrap();
        assert!(matches!(relay.init(), Err(InquiryError::Config(_))));
        assert!(!relay.is_ready());
    }

    #[test]
    fn test_init_rejects_bad_endpoint() {
        let relay = EmailJsRelay::new(&config("pk_123", "not a url")).unwrap();
        assert!(relay.init().is_err());
    }

    #[test]
    fn test_send_url_trims_trailing_slash() {
        let relay = EmailJsRelay::new(&config("pk", "http://localhost:8080/")).unwrap();
        assert_eq!(relay.send_url(), "http://localhost:8080/api/v1.0/email/send");
    }

    #[test]
    fn test_request_body_shape() {
        let mut params = TemplateParams::new();
        params.insert("from_name".into(), "Ada".into());
        let body = SendRequest {
            service_id: "service_x",
            template_id: "template_y",
            user_id: "pk",
            access_token: None,
            template_params: &params,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["service_id"], "service_x");
        assert_eq!(json["template_params"]["from_name"], "Ada");
        assert!(json.get("accessToken").is_none());
    }
}
