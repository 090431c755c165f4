//! Inquiry submission: validate a draft, assemble the outgoing message and
//! hand it to the relay.

use std::sync::Arc;

use chrono::Local;

use crate::config::Config;
use crate::error::{InquiryError, Result};
use crate::message::{MessageOptions, OutgoingMessage};
use crate::model::address::EmailAddress;
use crate::model::attachment::Attachment;
use crate::model::draft::InquiryDraft;
use crate::relay::{Relay, RelayResponse};

/// Identifiers and message options used for every submission.
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    pub service_id: String,
    pub template_id: String,
    pub message: MessageOptions,
}

impl SubmissionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            service_id: config.relay.service_id.clone(),
            template_id: config.relay.template_id.clone(),
            message: MessageOptions {
                recipient: config.relay.recipient.clone(),
                inline_image_cap: config.submission.inline_image_cap,
            },
        }
    }
}

/// Check required fields and the email shape.
///
/// Every missing field is reported at once; the email shape is only checked
/// once all required fields are present.
pub fn validate(draft: &InquiryDraft) -> Result<EmailAddress> {
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(InquiryError::Validation {
            fields: missing.iter().map(|f| f.label().to_string()).collect(),
        });
    }
    draft
        .email
        .as_deref()
        .and_then(EmailAddress::parse)
        .ok_or(InquiryError::InvalidEmail)
}

/// Sends inquiries through a relay.
pub struct Submission {
    relay: Arc<dyn Relay>,
    settings: SubmissionSettings,
}

impl Submission {
    pub fn new(relay: Arc<dyn Relay>, settings: SubmissionSettings) -> Self {
        Self { relay, settings }
    }

    /// Validate `draft` and build the message without sending it.
    pub fn prepare(
        &self,
        draft: &InquiryDraft,
        attachments: &[Attachment],
    ) -> Result<OutgoingMessage> {
        let email = validate(draft)?;
        Ok(OutgoingMessage::build(
            draft,
            &email,
            attachments,
            &self.settings.message,
            Local::now(),
        ))
    }

    /// Validate, assemble and send one inquiry.
    ///
    /// `attachments` is a snapshot; the intake itself is never touched here.
    pub async fn submit(
        &self,
        draft: &InquiryDraft,
        attachments: &[Attachment],
    ) -> Result<RelayResponse> {
        if !self.relay.is_ready() {
            return Err(InquiryError::ServiceNotReady);
        }

        let message = self.prepare(draft, attachments)?;
        tracing::info!(
            images = attachments.len(),
            service = %message.service_type,
            "Sending inquiry"
        );

        let response = self
            .relay
            .send(
                &self.settings.service_id,
                &self.settings.template_id,
                &message.template_params(),
            )
            .await?;

        if response.is_success() {
            tracing::info!(status = ?response.status, "Inquiry delivered");
            Ok(response)
        } else {
            tracing::warn!(status = ?response.status, text = ?response.text, "Relay refused inquiry");
            Err(InquiryError::Transport(format!(
                "Failed to send email: {}",
                response.text.as_deref().unwrap_or("Unknown error")
            )))
        }
    }
}
