//! The inquiry page controller.
//!
//! Owns the form, the selection pickers, the submit control and the
//! attachment intake, and routes file selections and submissions between
//! them. Collaborators are passed in explicitly; nothing is looked up
//! globally.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::i18n;
use crate::intake::{source, AttachmentIntake, IngestReport};
use crate::model::draft::{Field, InquiryDraft};
use crate::notice::NoticeSink;
use crate::relay::{Relay, RelayResponse};
use crate::submission::{Submission, SubmissionSettings};

/// Schedules the move away from the page after a successful submission.
pub trait Navigator: Send + Sync {
    fn navigate_after(&self, location: &str, delay: Duration);
}

/// Tells the terminal user where the flow continues.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate_after(&self, location: &str, delay: Duration) {
        tracing::info!(location, delay_secs = delay.as_secs(), "Navigation scheduled");
        eprintln!(
            "  {} {} ({}s)",
            i18n::msg_redirecting(),
            location,
            delay.as_secs()
        );
    }
}

/// The service / controller type / color pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub service: Option<String>,
    pub controller_type: Option<String>,
    pub color: Option<String>,
}

impl SelectionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The submit button: disabled and relabelled while a submission is in flight.
#[derive(Debug)]
pub struct SubmitControl {
    enabled: AtomicBool,
    label: Mutex<&'static str>,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            label: Mutex::new(i18n::submit_label()),
        }
    }
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        *self.label.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Disable the control until the returned guard is dropped.
    pub fn press(&self) -> PressedSubmit<'_> {
        let mut label = self.label.lock().unwrap_or_else(PoisonError::into_inner);
        let original = *label;
        *label = i18n::submit_sending();
        self.enabled.store(false, Ordering::Release);
        PressedSubmit {
            control: self,
            original,
        }
    }
}

/// Restores the submit control on drop, whatever the outcome was.
pub struct PressedSubmit<'a> {
    control: &'a SubmitControl,
    original: &'static str,
}

impl Drop for PressedSubmit<'_> {
    fn drop(&mut self) {
        *self
            .control
            .label
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = self.original;
        self.control.enabled.store(true, Ordering::Release);
    }
}

/// Top-level controller of the inquiry page.
pub struct InquiryPage {
    form: InquiryDraft,
    selection: SelectionState,
    submit_control: SubmitControl,
    intake: Arc<AttachmentIntake>,
    submission: Submission,
    notices: Arc<dyn NoticeSink>,
    navigator: Arc<dyn Navigator>,
    landing_page: String,
    redirect_delay: Duration,
}

impl InquiryPage {
    pub fn new(
        config: &Config,
        relay: Arc<dyn Relay>,
        notices: Arc<dyn NoticeSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let intake = Arc::new(AttachmentIntake::new(
            config.intake.clone(),
            Arc::clone(&notices),
        ));
        Self {
            form: InquiryDraft::default(),
            selection: SelectionState::default(),
            submit_control: SubmitControl::default(),
            intake,
            submission: Submission::new(relay, SubmissionSettings::from_config(config)),
            notices,
            navigator,
            landing_page: config.submission.landing_page.clone(),
            redirect_delay: config.submission.redirect_delay(),
        }
    }

    /// Shared handle to the intake, for remove handlers and previews.
    pub fn intake(&self) -> &Arc<AttachmentIntake> {
        &self.intake
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn form(&self) -> &InquiryDraft {
        &self.form
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit_control
    }

    /// Type into one form field.
    pub fn set_field(&mut self, field: Field, value: &str) {
        self.form.set(field, value);
    }

    /// Replace the form contents, keeping picker choices in sync.
    pub fn fill(&mut self, draft: InquiryDraft) {
        self.selection = SelectionState {
            service: draft.service.clone(),
            controller_type: draft.controller_type.clone(),
            color: draft.color.clone(),
        };
        self.form = draft;
    }

    pub fn select_service(&mut self, service: &str) {
        self.selection.service = Some(service.to_string());
        self.form.set(Field::Service, service);
    }

    pub fn select_controller_type(&mut self, controller_type: &str) {
        self.selection.controller_type = Some(controller_type.to_string());
        self.form.set(Field::ControllerType, controller_type);
    }

    pub fn select_color(&mut self, color: &str) {
        self.selection.color = Some(color.to_string());
        self.form.set(Field::Color, color);
    }

    /// Files chosen in the picker.
    pub async fn select_files(&self, paths: &[PathBuf]) -> Result<IngestReport> {
        let files = source::picker_selection(paths).inspect_err(|e| self.report(e))?;
        self.intake.ingest(files).await
    }

    /// Files or a directory dropped onto the form.
    pub async fn drop_files(&self, path: &Path) -> Result<IngestReport> {
        let files = source::drop_target(path).inspect_err(|e| self.report(e))?;
        self.intake.ingest(files).await
    }

    /// Submit the form with the current attachments.
    ///
    /// On success the form, the attachments and the pickers are cleared and
    /// navigation to the landing page is scheduled. On failure everything is
    /// left in place for a retry. The submit control is re-enabled either way.
    pub async fn submit(&mut self) -> Result<RelayResponse> {
        let _pressed = self.submit_control.press();

        let draft = self.form.clone();
        let attachments = self.intake.snapshot();
        let outcome = self.submission.submit(&draft, &attachments).await;

        match &outcome {
            Ok(_) => {
                self.notices
                    .success(i18n::notice_inquiry_sent().to_string());
                self.form = InquiryDraft::default();
                self.intake.reset();
                self.selection.reset();
                self.navigator
                    .navigate_after(&self.landing_page, self.redirect_delay);
            }
            Err(e) => {
                tracing::error!(error = %e, "Inquiry submission failed");
                self.report(e);
            }
        }
        outcome
    }

    fn report(&self, e: &crate::error::InquiryError) {
        let message = e.to_string();
        if message.is_empty() {
            self.notices.error(i18n::notice_inquiry_failed().to_string());
        } else {
            self.notices.error(message);
        }
    }
}
