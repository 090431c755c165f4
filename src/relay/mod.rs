//! The hosted email relay that turns template parameters into an email.

pub mod emailjs;

use async_trait::async_trait;

use crate::error::Result;
use crate::message::TemplateParams;

pub use emailjs::EmailJsRelay;

/// What the relay answered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayResponse {
    /// HTTP-style status code, when the relay reports one.
    pub status: Option<u16>,
    /// Status text or response body.
    pub text: Option<String>,
}

impl RelayResponse {
    /// A delivery counts as done only when the relay says so explicitly.
    pub fn is_success(&self) -> bool {
        self.status == Some(200) || self.text.as_deref() == Some("OK")
    }
}

/// A remote service that delivers a templated email.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Whether the transport has been initialized and can accept calls.
    fn is_ready(&self) -> bool;

    /// Send `params` through template `template_id` of service `service_id`.
    ///
    /// `Ok` means the relay answered, not that it accepted the message; check
    /// [`RelayResponse::is_success`].
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<RelayResponse>;
}
