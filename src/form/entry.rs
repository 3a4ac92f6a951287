//! Project entry form.
//!
//! Owns the record being edited, its per-field validation errors, the
//! attachment previews, and the Idle/Submitting gate around the upload.

use crate::api::models::EMPTY_ATTACHMENT;
use crate::api::{ApiError, Payload, PayloadPart};
use crate::form::preview::{Attachment, Preview};
use crate::form::validation;
use crate::schema::{FileSlot, TextField};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SUBMIT_SUCCESS: &str = "Architectural project added successfully!";

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please fix the errors before submitting.")]
    Invalid,

    #[error("A submission is already in progress.")]
    AlreadySubmitting,

    #[error("Error submitting form: {0}")]
    Transport(#[from] ApiError),

    #[error("Error submitting form: submission cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Record being edited: every text field and every attachment slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    text: BTreeMap<TextField, String>,
    files: BTreeMap<FileSlot, Option<Attachment>>,
}

impl Default for RecordDraft {
    fn default() -> Self {
        Self {
            text: TextField::all().map(|field| (field, String::new())).collect(),
            files: FileSlot::all().map(|slot| (slot, None)).collect(),
        }
    }
}

impl RecordDraft {
    pub fn text(&self, field: TextField) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn file(&self, slot: FileSlot) -> Option<&Attachment> {
        self.files.get(&slot).and_then(Option::as_ref)
    }

    /// True when every text field is empty and no slot holds a file.
    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.text.values().all(String::is_empty) && self.files.values().all(Option::is_none)
    }

    pub fn attachment_count(&self) -> usize {
        self.files.values().filter(|file| file.is_some()).count()
    }

    /// Serialize every slot in schema order; empty attachment slots become
    /// a `null` text part.
    pub fn to_payload(&self) -> Payload {
        let text = TextField::all().map(|field| PayloadPart::Text {
            key: field.key(),
            value: self.text(field).to_string(),
        });
        let files = FileSlot::all().map(|slot| match self.file(slot) {
            Some(file) => PayloadPart::File {
                key: slot.key(),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            },
            None => PayloadPart::Text {
                key: slot.key(),
                value: EMPTY_ATTACHMENT.to_string(),
            },
        });
        Payload {
            parts: text.chain(files).collect(),
        }
    }
}

/// Entry form state.
#[derive(Debug)]
pub struct EntryForm {
    draft: RecordDraft,
    errors: BTreeMap<TextField, &'static str>,
    previews: BTreeMap<FileSlot, Preview>,
    state: SubmissionState,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryForm {
    pub fn new() -> Self {
        Self {
            draft: RecordDraft::default(),
            errors: BTreeMap::new(),
            previews: BTreeMap::new(),
            state: SubmissionState::Idle,
        }
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn errors(&self) -> &BTreeMap<TextField, &'static str> {
        &self.errors
    }

    pub fn error(&self, field: TextField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn preview(&self, slot: FileSlot) -> Option<&Preview> {
        self.previews.get(&slot)
    }

    #[cfg(test)]
    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Set a text field and re-check that field only.
    pub fn mutate_scalar(&mut self, field: TextField, value: &str) {
        match validation::validate(field, value) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
        self.draft.text.insert(field, value.to_string());
    }

    /// Append a typed character to a text field.
    ///
    /// # Details
    /// Keys are ignored once the field holds its max length.
    pub fn push_char(&mut self, field: TextField, c: char) {
        let current = self.draft.text(field);
        if field
            .spec()
            .max_len
            .is_some_and(|max| current.chars().count() >= max)
        {
            return;
        }
        let mut value = current.to_string();
        value.push(c);
        self.mutate_scalar(field, &value);
    }

    /// Remove the last character of a text field.
    pub fn pop_char(&mut self, field: TextField) {
        let mut value = self.draft.text(field).to_string();
        value.pop();
        self.mutate_scalar(field, &value);
    }

    /// Put a file into (or clear) an attachment slot.
    ///
    /// # Details
    /// Any type and size is accepted. The previous preview of the slot is
    /// dropped, which releases its temporary file. If the new preview
    /// cannot be created the slot is left unchanged.
    pub fn mutate_file(&mut self, slot: FileSlot, file: Option<Attachment>) -> io::Result<()> {
        match file {
            Some(file) => {
                let preview = Preview::for_attachment(&file)?;
                debug!(slot = slot.key(), kind = ?preview.kind(), "attachment set");
                self.previews.insert(slot, preview);
                self.draft.files.insert(slot, Some(file));
            }
            None => {
                self.previews.remove(&slot);
                self.draft.files.insert(slot, None);
            }
        }
        Ok(())
    }

    /// Read a file from disk into an attachment slot.
    pub fn attach_path(&mut self, slot: FileSlot, path: &Path) -> anyhow::Result<()> {
        let attachment = Attachment::from_path(path)?;
        self.mutate_file(slot, Some(attachment))?;
        Ok(())
    }

    /// Enter the Submitting state and hand back the payload to upload.
    ///
    /// # Details
    /// Rejected while a submission is in flight, and rejected without any
    /// state change while a field is invalid.
    pub fn begin_submit(&mut self) -> Result<Payload, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::AlreadySubmitting);
        }
        if !self.errors.is_empty() {
            warn!(invalid = self.errors.len(), "submit blocked by validation errors");
            return Err(SubmitError::Invalid);
        }

        self.state = SubmissionState::Submitting;
        info!(attachments = self.draft.attachment_count(), "submitting project");
        Ok(self.draft.to_payload())
    }

    /// Apply the upload outcome and return to Idle.
    ///
    /// # Details
    /// On success the draft is reset to blank. Previews and errors are left
    /// as they are. On failure the draft is kept for another attempt.
    pub fn finish_submit(
        &mut self,
        outcome: Result<serde_json::Value, ApiError>,
    ) -> Result<serde_json::Value, SubmitError> {
        self.state = SubmissionState::Idle;
        match outcome {
            Ok(body) => {
                self.draft = RecordDraft::default();
                Ok(body)
            }
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "project upload failed");
                Err(SubmitError::Transport(err))
            }
        }
    }

    /// Abandon an in-flight submission.
    pub fn cancel_submit(&mut self) -> Option<SubmitError> {
        if !self.is_submitting() {
            return None;
        }
        self.state = SubmissionState::Idle;
        warn!("project upload cancelled");
        Some(SubmitError::Cancelled)
    }

    /// Validate, upload and apply the outcome in one call.
    #[cfg(test)]
    pub async fn submit(&mut self, client: &crate::api::ApiClient) -> Result<serde_json::Value, SubmitError> {
        let payload = self.begin_submit()?;
        let outcome = client.upload_project(payload).await;
        self.finish_submit(outcome)
    }

    /// Drop every preview, releasing image handles.
    pub fn release_previews(&mut self) {
        self.previews.clear();
    }
}
