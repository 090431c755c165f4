//! Assembly of the relay-ready outgoing message.

pub mod images;
pub mod sanitize;

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::model::address::EmailAddress;
use crate::model::attachment::Attachment;
use crate::model::draft::InquiryDraft;

use self::images::summarize;
use self::sanitize::sanitize_or;

/// Flat string-keyed parameters handed to the relay template.
pub type TemplateParams = BTreeMap<String, String>;

const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";

/// Settings that shape the outgoing message.
#[derive(Debug, Clone)]
pub struct MessageOptions {
    /// Workshop address the relay delivers to.
    pub recipient: String,
    /// Maximum number of images embedded inline.
    pub inline_image_cap: usize,
}

/// Sanitized payload for one inquiry. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to_email: String,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub phone: String,
    pub service_type: String,
    pub controller_type: String,
    pub color: String,
    pub timeline: String,
    pub message: String,
    pub image_html: String,
    pub image_text: String,
    pub image_count: String,
    pub submitted_at: String,
}

impl OutgoingMessage {
    /// Build the payload from a validated draft and a snapshot of the attachments.
    pub fn build(
        draft: &InquiryDraft,
        email: &EmailAddress,
        attachments: &[Attachment],
        options: &MessageOptions,
        submitted_at: DateTime<Local>,
    ) -> Self {
        let summary = summarize(attachments, options.inline_image_cap);
        let from_email = sanitize_or(Some(email.as_str()), NOT_PROVIDED);

        Self {
            to_email: sanitize_or(Some(options.recipient.as_str()), NOT_PROVIDED),
            from_name: sanitize_or(draft.full_name().as_deref(), "Unknown requester"),
            reply_to: from_email.clone(),
            from_email,
            phone: sanitize_or(draft.phone.as_deref(), NOT_PROVIDED),
            service_type: sanitize_or(draft.service.as_deref(), NOT_SPECIFIED),
            controller_type: sanitize_or(draft.controller_type.as_deref(), NOT_SPECIFIED),
            color: sanitize_or(draft.color.as_deref(), NOT_SPECIFIED),
            timeline: sanitize_or(draft.timeline.as_deref(), NOT_SPECIFIED),
            message: sanitize_or(draft.design_description.as_deref(), "No description"),
            image_html: summary.html,
            image_text: summary.text,
            image_count: summary.count.to_string(),
            submitted_at: submitted_at.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        }
    }

    /// Template parameters in the shape the relay expects.
    pub fn template_params(&self) -> TemplateParams {
        [
            ("to_email", &self.to_email),
            ("from_name", &self.from_name),
            ("from_email", &self.from_email),
            ("reply_to", &self.reply_to),
            ("phone", &self.phone),
            ("service_type", &self.service_type),
            ("controller_type", &self.controller_type),
            ("color", &self.color),
            ("timeline", &self.timeline),
            ("message", &self.message),
            ("image_html", &self.image_html),
            ("image_text", &self.image_text),
            ("image_count", &self.image_count),
            ("submitted_at", &self.submitted_at),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::images::{NO_IMAGES_HTML, NO_IMAGES_TEXT};
    use chrono::TimeZone;

    fn options() -> MessageOptions {
        MessageOptions {
            recipient: "workshop@example.com".into(),
            inline_image_cap: 5,
        }
    }

    fn draft() -> InquiryDraft {
        InquiryDraft::from_pairs([
            ("first_name", "Ada"),
            ("last_name", "O'Neil"),
            ("email", "ada@example.com"),
            ("service", "custom-build"),
            ("controller_type", "xbox"),
            ("design_description", r#"<script>"it's & done"</script>"#),
            ("shipping_confirm", "on"),
        ])
    }

    fn when() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_sanitizes_and_fills_defaults() {
        let email = EmailAddress::parse("ada@example.com").unwrap();
        let msg = OutgoingMessage::build(&draft(), &email, &[], &options(), when());

        assert_eq!(msg.from_name, "Ada O&#39;Neil");
        assert_eq!(msg.message, "script&quot;it&#39;s &amp; done&quot;/script");
        assert_eq!(msg.phone, "Not provided");
        assert_eq!(msg.color, "Not specified");
        assert_eq!(msg.timeline, "Not specified");
        assert_eq!(msg.reply_to, "ada@example.com");
        assert_eq!(msg.to_email, "workshop@example.com");
        assert_eq!(msg.image_html, NO_IMAGES_HTML);
        assert_eq!(msg.image_text, NO_IMAGES_TEXT);
        assert_eq!(msg.image_count, "0");
        assert!(msg.submitted_at.starts_with("2026-03-01 12:00:00"));
    }

    #[test]
    fn test_template_params_are_complete_and_non_empty() {
        let email = EmailAddress::parse("ada@example.com").unwrap();
        let params =
            OutgoingMessage::build(&draft(), &email, &[], &options(), when()).template_params();
        assert_eq!(params.len(), 14);
        assert!(params.values().all(|v| !v.is_empty()));
        assert_eq!(params["controller_type"], "xbox");
    }
}
