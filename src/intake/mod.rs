//! Attachment intake: turns file selections into validated, deduplicated,
//! encoded image attachments and keeps the preview list in step with them.
//!
//! The intake is shared between the page controller and the remove handlers
//! it hands out, so every operation takes `&self`; state lives behind a
//! mutex that is never held across an `.await`.

pub mod preview;
pub mod source;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{FuturesOrdered, StreamExt};

use crate::config::{EmptySelection, IntakeConfig};
use crate::error::{InquiryError, Result};
use crate::i18n;
use crate::model::attachment::{format_mb, Attachment, DedupeKey, RawFile};
use crate::notice::NoticeSink;

use self::preview::PreviewList;

/// Outcome of one `ingest` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Attachments appended to the collection.
    pub added: usize,
    /// Files skipped because the same name and size was already selected.
    pub duplicates: usize,
    /// Files refused for type or size, by name.
    pub rejected: Vec<String>,
    /// Files that could not be read, by name.
    pub failed: Vec<String>,
}

#[derive(Debug, Default)]
struct IntakeState {
    attachments: Vec<Attachment>,
    keys: HashSet<DedupeKey>,
    preview: PreviewList,
}

/// Owner of the attachment collection.
pub struct AttachmentIntake {
    config: IntakeConfig,
    state: Mutex<IntakeState>,
    busy: AtomicBool,
    notices: Arc<dyn NoticeSink>,
}

/// Where a decoded file ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Appended {
    Added,
    Duplicate,
    Full,
}

/// Clears the busy flag when ingestion ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AttachmentIntake {
    pub fn new(config: IntakeConfig, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            config,
            state: Mutex::new(IntakeState::default()),
            busy: AtomicBool::new(false),
            notices,
        }
    }

    /// Validate, deduplicate and encode `files`, appending them in input order.
    ///
    /// Only one ingestion may run at a time; a second call while one is in
    /// flight fails with [`InquiryError::IntakeBusy`]. If the surviving files
    /// do not all fit, the whole batch is refused.
    pub async fn ingest(&self, files: Vec<RawFile>) -> Result<IngestReport> {
        let _guard = self.claim()?;

        if files.is_empty() {
            match self.config.empty_selection {
                EmptySelection::Ignore => tracing::debug!("Empty selection ignored"),
                EmptySelection::Clear => {
                    tracing::debug!("Empty selection clears the collection");
                    self.reset();
                }
            }
            return Ok(IngestReport::default());
        }

        let total = files.len();
        let mut report = IngestReport::default();
        let candidates = self.screen(files, &mut report)?;

        let mut pending: FuturesOrdered<_> = candidates
            .into_iter()
            .map(|file| async move {
                let encoded = file.encode().await;
                (file, encoded)
            })
            .collect();

        while let Some((file, encoded)) = pending.next().await {
            match encoded {
                Ok(encoded_data) => {
                    let name = file.name.clone();
                    match self.append(file, encoded_data) {
                        Appended::Added => report.added += 1,
                        Appended::Duplicate => report.duplicates += 1,
                        Appended::Full => {
                            tracing::warn!(file = %name, "Collection full, file dropped");
                            report.rejected.push(name);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "Failed to decode image");
                    let reason = match e {
                        InquiryError::Decode { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    self.notices.error(format!(
                        "{} '{}': {}",
                        i18n::notice_decode_failed(),
                        file.name,
                        reason
                    ));
                    report.failed.push(file.name);
                }
            }
        }

        tracing::info!(
            added = report.added,
            duplicates = report.duplicates,
            rejected = report.rejected.len(),
            failed = report.failed.len(),
            "Ingestion finished"
        );
        if report.added == total {
            self.notices
                .success(format!("{} {}", total, i18n::notice_images_uploaded()));
        }
        Ok(report)
    }

    /// Remove the attachment at `position` and regenerate the preview list.
    pub fn remove(&self, position: usize) -> Result<Attachment> {
        self.remove_bound(position, None)
    }

    fn remove_bound(&self, position: usize, generation: Option<u64>) -> Result<Attachment> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if generation.is_some_and(|g| g != state.preview.generation()) {
            return Err(InquiryError::StaleBinding);
        }
        if position >= state.attachments.len() {
            return Err(InquiryError::InvalidPosition(position));
        }
        let removed = state.attachments.remove(position);
        state.keys.remove(&removed.dedupe_key());
        state.preview.rebuild(&state.attachments);
        tracing::debug!(file = %removed.name, position, "Removed attachment");
        Ok(removed)
    }

    /// One remove handler per preview entry, bound to this intake.
    pub fn remove_buttons(self: &Arc<Self>) -> Vec<RemoveButton> {
        let state = self.lock();
        let generation = state.preview.generation();
        state
            .preview
            .entries()
            .iter()
            .map(|e| RemoveButton {
                intake: Arc::clone(self),
                position: e.position,
                generation,
            })
            .collect()
    }

    /// Drop every attachment and show the empty state. Idempotent.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.attachments.clear();
        state.keys.clear();
        state.preview.rebuild(&[]);
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> Vec<Attachment> {
        self.lock().attachments.clone()
    }

    /// Copy of the current preview list.
    pub fn preview(&self) -> PreviewList {
        self.lock().preview.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Slots left before `max_attachments` is reached.
    pub fn remaining_slots(&self) -> usize {
        self.config.max_attachments.saturating_sub(self.len())
    }

    fn claim(&self) -> Result<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Ingestion already in flight, rejecting new selection");
            self.notices.info(i18n::notice_intake_busy().to_string());
            return Err(InquiryError::IntakeBusy);
        }
        Ok(BusyGuard(&self.busy))
    }

    /// Type and size check for one file.
    fn check(&self, file: &RawFile) -> Result<()> {
        if !file.is_image() {
            return Err(InquiryError::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
        if file.byte_size > self.config.max_file_size {
            return Err(InquiryError::FileTooLarge {
                name: file.name.clone(),
                size: file.byte_size,
                limit: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Type, size and duplicate checks, then the batch capacity check.
    fn screen(&self, files: Vec<RawFile>, report: &mut IngestReport) -> Result<Vec<RawFile>> {
        let state = self.lock();
        let mut batch_keys = HashSet::new();
        let mut candidates = Vec::new();

        for file in files {
            if let Err(e) = self.check(&file) {
                tracing::debug!(error = %e, "Rejected file");
                self.notices.error(rejection_notice(&e));
                report.rejected.push(file.name);
                continue;
            }
            let key = file.dedupe_key();
            if state.keys.contains(&key) || batch_keys.contains(&key) {
                tracing::info!(key = %key, "Skipping duplicate file");
                report.duplicates += 1;
                continue;
            }
            batch_keys.insert(key);
            candidates.push(file);
        }

        let remaining = self
            .config
            .max_attachments
            .saturating_sub(state.attachments.len());
        if candidates.len() > remaining {
            tracing::info!(
                attempted = candidates.len(),
                remaining,
                "Batch exceeds attachment limit"
            );
            self.notices.error(format!(
                "{} {}",
                i18n::notice_too_many_images(),
                remaining
            ));
            return Err(InquiryError::TooManyAttachments {
                remaining,
                attempted: candidates.len(),
            });
        }
        Ok(candidates)
    }

    /// Append one decoded file unless its key is present or the collection is full.
    fn append(&self, file: RawFile, encoded_data: String) -> Appended {
        let mut guard = self.lock();
        let state = &mut *guard;
        let key = file.dedupe_key();
        if state.keys.contains(&key) {
            return Appended::Duplicate;
        }
        if state.attachments.len() >= self.config.max_attachments {
            return Appended::Full;
        }
        let attachment = Attachment {
            name: file.name,
            byte_size: file.byte_size,
            mime_type: file.mime_type,
            encoded_data,
        };
        state.preview.push(&attachment);
        state.keys.insert(key);
        state.attachments.push(attachment);
        Appended::Added
    }

    fn lock(&self) -> MutexGuard<'_, IntakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Localized notice text for a file refused during screening.
fn rejection_notice(e: &InquiryError) -> String {
    match e {
        InquiryError::UnsupportedType { name, .. } => {
            format!("'{name}' {}", i18n::notice_not_an_image())
        }
        InquiryError::FileTooLarge { name, limit, .. } => format!(
            "'{name}' {} {}",
            i18n::notice_file_too_large(),
            format_mb(*limit)
        ),
        other => other.to_string(),
    }
}

/// Remove handler for one preview entry.
///
/// Bound to the preview generation it was created from; once the list has
/// been rebuilt the handler refuses to act.
#[derive(Clone)]
pub struct RemoveButton {
    intake: Arc<AttachmentIntake>,
    position: usize,
    generation: u64,
}

impl RemoveButton {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn click(&self) -> Result<Attachment> {
        self.intake
            .remove_bound(self.position, Some(self.generation))
    }
}
