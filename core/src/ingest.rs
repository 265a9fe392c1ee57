//! CSV ingestion slots.
//!
//! The import page offers one [`UploadSlot`] per [`Dataset`]. Each slot is a
//! small state machine:
//!
//! ```text
//!   select(file) ──▶ Idle ──begin_upload()──▶ Loading ──complete(Ok)──▶ Success
//!                     │                          │
//!                     │ (no file)                └──complete(Err)──▶ Error
//!                     └──────────────────────────────────────────▶ Error
//!   clear() ──▶ Idle (no file, no preview)
//! ```
//!
//! Selecting or clearing starts a new slot generation; preview and upload
//! results carrying an older [`SlotTicket`] are ignored.

use std::fmt;

use crate::api::IngestReceipt;
use crate::error::ApiError;

/// Message shown after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Uploaded and ingested";

/// Message shown when uploading an empty slot.
pub const NO_FILE_MESSAGE: &str = "No file selected";

// =============================================================================
// Datasets
// =============================================================================

/// Target dataset of an ingestion upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    ManagementEntities,
    MasterFunds,
    Subfunds,
    LegalEntities,
    ShareClasses,
}

impl Dataset {
    /// Every dataset, in display order.
    pub const ALL: [Dataset; 5] = [
        Dataset::ManagementEntities,
        Dataset::MasterFunds,
        Dataset::Subfunds,
        Dataset::LegalEntities,
        Dataset::ShareClasses,
    ];

    /// Value of the multipart `target` field.
    pub fn key(&self) -> &'static str {
        match self {
            Dataset::ManagementEntities => "management_entities",
            Dataset::MasterFunds => "master_funds",
            Dataset::Subfunds => "subfunds",
            Dataset::LegalEntities => "legal_entities",
            Dataset::ShareClasses => "share_classes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::ManagementEntities => "Management Entities",
            Dataset::MasterFunds => "Master Funds",
            Dataset::Subfunds => "Subfunds",
            Dataset::LegalEntities => "Legal Entities",
            Dataset::ShareClasses => "Share Classes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Slot status
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl SlotStatus {
    pub fn tag(&self) -> &'static str {
        match self {
            SlotStatus::Idle => "idle",
            SlotStatus::Loading => "loading",
            SlotStatus::Success(_) => "success",
            SlotStatus::Error(_) => "error",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SlotStatus::Success(msg) | SlotStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SlotStatus::Loading)
    }
}

// =============================================================================
// Upload slot
// =============================================================================

/// Generation of a slot when an async step was started.
///
/// Selecting or clearing starts a new selection and makes every earlier
/// ticket stale. Starting an upload only supersedes earlier uploads of the
/// same selection, so a preview still being read stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket {
    selection: u64,
    upload: u64,
}

/// State of one dataset's upload slot. `F` is the platform file handle.
#[derive(Debug, Clone)]
pub struct UploadSlot<F> {
    dataset: Dataset,
    file: Option<F>,
    file_name: Option<String>,
    preview: Option<Result<Vec<Vec<String>>, String>>,
    status: SlotStatus,
    selection: u64,
    upload: u64,
}

impl<F: Clone> UploadSlot<F> {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            file: None,
            file_name: None,
            preview: None,
            status: SlotStatus::Idle,
            selection: 0,
            upload: 0,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Preview rows, or the reason there are none.
    pub fn preview(&self) -> Option<&Result<Vec<Vec<String>>, String>> {
        self.preview.as_ref()
    }

    pub fn status(&self) -> &SlotStatus {
        &self.status
    }

    /// A file was chosen. Resets preview and status; the returned ticket
    /// identifies the preview read that follows.
    pub fn select(&mut self, file: F, file_name: impl Into<String>) -> SlotTicket {
        self.file = Some(file);
        self.file_name = Some(file_name.into());
        self.preview = None;
        self.status = SlotStatus::Idle;
        self.next_selection()
    }

    /// Store the preview of the selected file. Returns `false` when the
    /// ticket is stale.
    pub fn set_preview(
        &mut self,
        ticket: SlotTicket,
        preview: Result<Vec<Vec<String>>, String>,
    ) -> bool {
        if ticket.selection != self.selection {
            return false;
        }
        self.preview = Some(preview);
        true
    }

    /// Upload was clicked. Without a file the slot goes to `Error` and
    /// `None` is returned; otherwise it goes to `Loading` and the file to
    /// send is returned with the ticket of this attempt.
    pub fn begin_upload(&mut self) -> Option<(F, SlotTicket)> {
        match self.file.clone() {
            Some(file) => {
                self.status = SlotStatus::Loading;
                self.upload += 1;
                Some((
                    file,
                    SlotTicket {
                        selection: self.selection,
                        upload: self.upload,
                    },
                ))
            }
            None => {
                self.status = SlotStatus::Error(NO_FILE_MESSAGE.to_string());
                None
            }
        }
    }

    /// Record the upload outcome. Returns `false` when the ticket is stale.
    pub fn complete(&mut self, ticket: SlotTicket, result: Result<IngestReceipt, ApiError>) -> bool {
        if ticket.upload == 0 || ticket != self.current_upload() {
            return false;
        }
        self.status = match result {
            Ok(_) => SlotStatus::Success(UPLOAD_SUCCESS_MESSAGE.to_string()),
            Err(err) => SlotStatus::Error(err.user_message()),
        };
        true
    }

    /// Forget file, preview and status.
    pub fn clear(&mut self) {
        self.file = None;
        self.file_name = None;
        self.preview = None;
        self.status = SlotStatus::Idle;
        self.next_selection();
    }

    fn next_selection(&mut self) -> SlotTicket {
        self.selection += 1;
        self.upload = 0;
        SlotTicket {
            selection: self.selection,
            upload: 0,
        }
    }

    fn current_upload(&self) -> SlotTicket {
        SlotTicket {
            selection: self.selection,
            upload: self.upload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Slot = UploadSlot<&'static str>;

    #[test]
    fn test_dataset_keys() {
        let keys: Vec<&str> = Dataset::ALL.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            vec![
                "management_entities",
                "master_funds",
                "subfunds",
                "legal_entities",
                "share_classes"
            ]
        );
        assert_eq!(Dataset::from_key("subfunds"), Some(Dataset::Subfunds));
        assert_eq!(Dataset::from_key("funds"), None);
        assert_eq!(Dataset::MasterFunds.label(), "Master Funds");
    }

    #[test]
    fn test_upload_without_file_errors() {
        let mut slot = Slot::new(Dataset::Subfunds);
        assert!(slot.begin_upload().is_none());
        assert_eq!(slot.status(), &SlotStatus::Error("No file selected".into()));
    }

    #[test]
    fn test_successful_upload() {
        let mut slot = Slot::new(Dataset::MasterFunds);
        slot.select("funds.csv", "funds.csv");
        assert_eq!(slot.status().tag(), "idle");

        let (file, ticket) = slot.begin_upload().unwrap();
        assert_eq!(file, "funds.csv");
        assert!(slot.status().is_loading());

        assert!(slot.complete(ticket, Ok(IngestReceipt::default())));
        assert_eq!(slot.status().message(), Some("Uploaded and ingested"));
    }

    #[test]
    fn test_failed_upload_keeps_server_detail() {
        let mut slot = Slot::new(Dataset::ShareClasses);
        slot.select("sc.csv", "sc.csv");
        let (_, ticket) = slot.begin_upload().unwrap();
        slot.complete(
            ticket,
            Err(ApiError::Status {
                status: 500,
                detail: Some("column 'fund_id' missing".into()),
            }),
        );
        assert_eq!(
            slot.status(),
            &SlotStatus::Error("column 'fund_id' missing".into())
        );
    }

    #[test]
    fn test_reselect_resets_to_idle() {
        let mut slot = Slot::new(Dataset::Subfunds);
        slot.begin_upload();
        assert_eq!(slot.status().tag(), "error");

        slot.select("a.csv", "a.csv");
        assert_eq!(slot.status(), &SlotStatus::Idle);
    }

    #[test]
    fn test_clear_resets_everything_and_drops_late_results() {
        let mut slot = Slot::new(Dataset::LegalEntities);
        let preview_ticket = slot.select("le.csv", "le.csv");
        assert!(slot.set_preview(preview_ticket, Ok(vec![vec!["id".into()]])));
        let (_, upload_ticket) = slot.begin_upload().unwrap();

        slot.clear();
        assert!(!slot.has_file());
        assert!(slot.preview().is_none());
        assert!(slot.file_name().is_none());
        assert_eq!(slot.status(), &SlotStatus::Idle);

        assert!(!slot.complete(upload_ticket, Ok(IngestReceipt::default())));
        assert_eq!(slot.status(), &SlotStatus::Idle);
    }

    #[test]
    fn test_preview_survives_upload_start() {
        let mut slot = Slot::new(Dataset::MasterFunds);
        let preview_ticket = slot.select("a.csv", "a.csv");
        let (_, upload_ticket) = slot.begin_upload().unwrap();

        assert!(slot.set_preview(preview_ticket, Ok(vec![vec!["fund_id".into()]])));
        assert_eq!(slot.preview(), Some(&Ok(vec![vec!["fund_id".to_string()]])));

        assert!(!slot.complete(preview_ticket, Ok(IngestReceipt::default())));
        assert!(slot.status().is_loading());
        assert!(slot.complete(upload_ticket, Ok(IngestReceipt::default())));
        assert_eq!(slot.status().tag(), "success");
    }

    #[test]
    fn test_second_upload_supersedes_first() {
        let mut slot = Slot::new(Dataset::Subfunds);
        slot.select("s.csv", "s.csv");
        let (_, first) = slot.begin_upload().unwrap();
        let (_, second) = slot.begin_upload().unwrap();

        assert!(!slot.complete(first, Err(ApiError::Network("offline".into()))));
        assert!(slot.status().is_loading());
        assert!(slot.complete(second, Ok(IngestReceipt::default())));
    }

    #[test]
    fn test_upload_result_ignored_after_reselect() {
        let mut slot = Slot::new(Dataset::ShareClasses);
        slot.select("a.csv", "a.csv");
        let (_, ticket) = slot.begin_upload().unwrap();
        slot.select("b.csv", "b.csv");

        assert!(!slot.complete(ticket, Ok(IngestReceipt::default())));
        assert_eq!(slot.status(), &SlotStatus::Idle);
    }

    #[test]
    fn test_stale_preview_ignored() {
        let mut slot = Slot::new(Dataset::ManagementEntities);
        let first = slot.select("old.csv", "old.csv");
        let second = slot.select("new.csv", "new.csv");

        assert!(!slot.set_preview(first, Ok(vec![vec!["old".into()]])));
        assert!(slot.set_preview(second, Err("CSV file is empty".into())));
        assert_eq!(slot.preview(), Some(&Err("CSV file is empty".to_string())));
        assert_eq!(slot.file_name(), Some("new.csv"));
    }
}
