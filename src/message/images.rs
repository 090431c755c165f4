//! Attachment summary embedded in the outgoing email.
//!
//! Only the first `inline_cap` attachments are embedded; the remainder is
//! reported as a count so the message size stays bounded.

use std::fmt::Write as _;

use crate::model::attachment::Attachment;

use super::sanitize::sanitize_text;

pub const NO_IMAGES_HTML: &str = "<p><strong>No images uploaded</strong></p>";
pub const NO_IMAGES_TEXT: &str = "No images uploaded";

/// Rich and plain renderings of the attachment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub html: String,
    pub text: String,
    /// Total number of attachments, inline or not.
    pub count: usize,
}

/// Render the attachment summary for `attachments`.
pub fn summarize(attachments: &[Attachment], inline_cap: usize) -> ImageSummary {
    if attachments.is_empty() {
        return ImageSummary {
            html: NO_IMAGES_HTML.to_string(),
            text: NO_IMAGES_TEXT.to_string(),
            count: 0,
        };
    }

    let mut html = String::from(r#"<div style="margin: 20px 0;"><h3>Reference Images:</h3>"#);
    let mut text = String::from("Reference Images:\n");

    for (i, img) in attachments.iter().take(inline_cap).enumerate() {
        let name = sanitize_text(&img.name);
        let size = img.size_mb();
        let _ = write!(
            html,
            concat!(
                r#"<div style="display: inline-block; margin: 10px; border: 1px solid #ddd; padding: 10px; border-radius: 5px;">"#,
                r#"<img src="{src}" alt="{name}" style="max-width: 200px; max-height: 200px; display: block; margin-bottom: 5px;">"#,
                r#"<p style="font-size: 12px; margin: 0; text-align: center;"><strong>Image {n}:</strong> {name}</p>"#,
                r#"<p style="font-size: 11px; margin: 0; text-align: center; color: #666;">Size: {size}</p>"#,
                "</div>"
            ),
            src = sanitize_text(&img.encoded_data),
            name = name,
            n = i + 1,
            size = size,
        );
        let _ = writeln!(text, "Image {}: {} ({})", i + 1, name, size);
    }

    let remaining = attachments.len().saturating_sub(inline_cap);
    if remaining > 0 {
        let note = additional_note(remaining);
        let _ = write!(
            html,
            r#"<p style="font-size: 12px; color: #666;"><em>{note}</em></p>"#
        );
        let _ = writeln!(text, "{note}");
    }
    html.push_str("</div>");

    ImageSummary {
        html,
        text,
        count: attachments.len(),
    }
}

fn additional_note(remaining: usize) -> String {
    if remaining == 1 {
        "+1 additional image".to_string()
    } else {
        format!("+{remaining} additional images")
    }
}
