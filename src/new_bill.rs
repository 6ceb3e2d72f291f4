//! The "new bill" form: attachment gate, record assembly and submission.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{AttachmentError, StoreError};
use crate::model::{AttachedFile, BillRecord, BillStatus, NewBillInput, SessionUser};
use crate::routes::{Navigator, Route};
use crate::store::{RemoteBillsClient, StoreResult};
use crate::views::{NewBillPage, Views};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, PartialEq)]
pub struct StagedAttachment {
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttachmentState {
    #[default]
    Empty,
    Valid(StagedAttachment),
    Invalid(AttachmentError),
}

impl AttachmentState {
    pub fn staged(&self) -> Option<&StagedAttachment> {
        match self {
            AttachmentState::Valid(staged) => Some(staged),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    NoAttachment,
    InvalidAttachment,
    /// No tokio runtime to carry the request.
    NoRuntime,
}

/// What `submit` did with the record.
#[derive(Debug)]
pub enum Submission {
    /// The record is on its way; the handle resolves with the store's answer.
    Dispatched(JoinHandle<StoreResult<()>>),
    Blocked(BlockReason),
}

impl Submission {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Submission::Dispatched(_))
    }

    /// Wait for the store. `None` when nothing was sent.
    pub async fn settled(self) -> Option<StoreResult<()>> {
        match self {
            Submission::Dispatched(handle) => Some(
                handle
                    .await
                    .unwrap_or_else(|e| Err(StoreError::Backend(e.to_string()))),
            ),
            Submission::Blocked(_) => None,
        }
    }
}

/// Strip any directory part, browsers report `C:\fakepath\name.png`.
pub fn base_name(name: &str) -> &str {
    name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name)
}

pub fn check_format(file_name: &str) -> Result<(), AttachmentError> {
    let extension = Path::new(base_name(file_name))
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AttachmentError::UnsupportedFormat {
            file_name: file_name.to_string(),
        }),
    }
}

pub struct NewBillForm {
    session: SessionUser,
    store: Arc<dyn RemoteBillsClient>,
    navigator: Arc<dyn Navigator>,
    attachment_base_url: String,
    attachment: AttachmentState,
}

impl NewBillForm {
    pub fn new(
        session: SessionUser,
        store: Arc<dyn RemoteBillsClient>,
        navigator: Arc<dyn Navigator>,
        attachment_base_url: impl Into<String>,
    ) -> Self {
        Self {
            session,
            store,
            navigator,
            attachment_base_url: attachment_base_url.into(),
            attachment: AttachmentState::Empty,
        }
    }

    pub fn attachment(&self) -> &AttachmentState {
        &self.attachment
    }

    /// Text of the inline error element, if it is shown.
    pub fn error_message(&self) -> Option<String> {
        match &self.attachment {
            AttachmentState::Invalid(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn handle_file_selection(&mut self, file: AttachedFile) -> &AttachmentState {
        self.attachment = match check_format(&file.name) {
            Ok(()) => {
                let file_name = base_name(&file.name).to_string();
                let file_url = format!(
                    "{}/{}",
                    self.attachment_base_url.trim_end_matches('/'),
                    file_name
                );
                tracing::info!(file = %file_name, size = file.bytes.len(), "attachment staged");
                AttachmentState::Valid(StagedAttachment {
                    file_name,
                    file_url,
                    mime_type: file.mime_type,
                    size: file.bytes.len(),
                })
            }
            Err(err) => {
                tracing::warn!(file = %file.name, mime = %file.mime_type, "attachment rejected");
                AttachmentState::Invalid(err)
            }
        };
        &self.attachment
    }

    pub fn build_record(&self, input: NewBillInput) -> Option<BillRecord> {
        let staged = self.attachment.staged()?;
        Some(BillRecord {
            email: self.session.email.clone(),
            expense_type: input.expense_type,
            expense_name: input.expense_name,
            amount: input.amount,
            date: input.date,
            vat_amount: input.vat_amount,
            vat_percent: input.vat_percent,
            commentary: input.commentary,
            file_url: staged.file_url.clone(),
            file_name: staged.file_name.clone(),
            status: BillStatus::Pending,
        })
    }

    /// Sends the bill without waiting for the store, then goes back to the
    /// bills list. Navigation happens even when nothing could be sent.
    ///
    /// The request runs on the current tokio runtime; outside of one the
    /// bill is not sent.
    pub fn submit(&mut self, input: NewBillInput) -> Submission {
        let runtime = Handle::try_current();
        let submission = match (self.build_record(input), runtime) {
            (Some(record), Ok(runtime)) => {
                tracing::info!(
                    email = %record.email,
                    expense = %record.expense_name,
                    amount = record.amount,
                    "submitting bill"
                );
                let store = Arc::clone(&self.store);
                Submission::Dispatched(runtime.spawn(async move {
                    let result = store.submit(record).await;
                    if let Err(err) = &result {
                        tracing::warn!(error = %err, "bill submission failed");
                    }
                    result
                }))
            }
            (Some(_), Err(err)) => {
                tracing::error!(error = %err, "no runtime to send the bill");
                Submission::Blocked(BlockReason::NoRuntime)
            }
            (None, _) => {
                let reason = match self.attachment {
                    AttachmentState::Invalid(_) => BlockReason::InvalidAttachment,
                    _ => BlockReason::NoAttachment,
                };
                tracing::warn!(?reason, "bill not sent");
                Submission::Blocked(reason)
            }
        };

        self.navigator.navigate(Route::Bills);
        submission
    }

    pub fn render(&self, views: &Views) -> Result<String, tera::Error> {
        views.render_new_bill(&NewBillPage::new(
            self.error_message(),
            self.attachment.staged().map(|s| s.file_name.clone()),
        ))
    }
}
