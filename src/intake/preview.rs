//! The visible list of selected images.
//!
//! Entries are appended as images finish decoding and the whole list is
//! regenerated after any removal. Each regeneration bumps a generation
//! counter so that handlers bound to an older list can be detected.

use unicode_width::UnicodeWidthChar;

use crate::i18n;
use crate::model::attachment::{format_mb, Attachment};

/// One row of the preview list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PreviewEntry {
    /// Position in the collection (0-based).
    pub position: usize,
    pub name: String,
    pub size_label: String,
    pub mime_type: String,
}

impl PreviewEntry {
    fn new(position: usize, attachment: &Attachment) -> Self {
        Self {
            position,
            name: attachment.name.clone(),
            size_label: format_mb(attachment.byte_size),
            mime_type: attachment.mime_type.clone(),
        }
    }
}

/// Mirror of the attachment collection.
#[derive(Debug, Clone, Default)]
pub struct PreviewList {
    generation: u64,
    entries: Vec<PreviewEntry>,
}

impl PreviewList {
    /// Append one entry for a freshly decoded attachment.
    pub fn push(&mut self, attachment: &Attachment) {
        let position = self.entries.len();
        self.entries.push(PreviewEntry::new(position, attachment));
    }

    /// Throw the current entries away and regenerate them from `attachments`.
    pub fn rebuild(&mut self, attachments: &[Attachment]) {
        self.generation += 1;
        self.entries = attachments
            .iter()
            .enumerate()
            .map(|(i, a)| PreviewEntry::new(i, a))
            .collect();
    }

    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Render one line per entry, or the empty-state placeholder.
    ///
    /// Names wider than `name_width` terminal columns are cut with an ellipsis.
    pub fn render_lines(&self, name_width: usize) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![i18n::preview_empty().to_string()];
        }
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "[{}] {}  {}",
                    e.position + 1,
                    truncate_to_width(&e.name, name_width),
                    e.size_label
                )
            })
            .collect()
    }
}

/// Cut `s` so that it occupies at most `max` terminal columns.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(name: &str) -> Attachment {
        Attachment {
            name: name.into(),
            byte_size: 2 * 1024 * 1024,
            mime_type: "image/png".into(),
            encoded_data: "data:image/png;base64,".into(),
        }
    }

    #[test]
    fn test_empty_state_placeholder() {
        let list = PreviewList::default();
        assert_eq!(list.render_lines(40), vec!["No files selected".to_string()]);
    }

    #[test]
    fn test_rebuild_renumbers_and_bumps_generation() {
        let mut list = PreviewList::default();
        list.push(&att("a.png"));
        list.push(&att("b.png"));
        list.push(&att("c.png"));
        let before = list.generation();

        list.rebuild(&[att("a.png"), att("c.png")]);
        assert_eq!(list.generation(), before + 1);
        let names: Vec<(usize, &str)> = list
            .entries()
            .iter()
            .map(|e| (e.position, e.name.as_str()))
            .collect();
        assert_eq!(names, vec![(0, "a.png"), (1, "c.png")]);
    }

    #[test]
    fn test_render_lines() {
        let mut list = PreviewList::default();
        list.push(&att("left-grip.png"));
        assert_eq!(list.render_lines(40), vec!["[1] left-grip.png  2.00 MB"]);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short.png", 20), "short.png");
        assert_eq!(truncate_to_width("averyveryverylongname.png", 10), "averyvery\u{2026}");
        // Wide characters count as two columns.
        assert_eq!(truncate_to_width("画像画像画像.png", 5), "画像\u{2026}");
    }
}
