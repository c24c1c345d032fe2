use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::{ActionError, ClientError};
use crate::domain::http::FilePart;
use crate::domain::ports::{MessageKind, ResourceView};
use crate::domain::records::upload::{csv_preview, detect_currency, detect_date_format, format_file_size};
use crate::domain::records::{UploadOptions, UploadOutcome, UploadResult};
use crate::interface_adapters::api::FinanceApi;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Statement file picked for upload, with its preview rows when it is a CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file: FilePart,
    pub size_label: String,
    pub preview: Option<Vec<Vec<String>>>,
}

/// Statement upload page. Holds at most one selected file and the options
/// that go with it; results are rendered as a single-item list.
pub struct UploadController {
    api: FinanceApi,
    view: Arc<dyn ResourceView<UploadResult>>,
    options: UploadOptions,
    selected: Option<SelectedFile>,
    last_result: Option<UploadResult>,
}

impl UploadController {
    pub fn new(api: FinanceApi, view: Arc<dyn ResourceView<UploadResult>>) -> Self {
        Self {
            api,
            view,
            options: UploadOptions::default(),
            selected: None,
            last_result: None,
        }
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: UploadOptions) {
        self.options = options;
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn last_result(&self) -> Option<&UploadResult> {
        self.last_result.as_ref()
    }

    pub fn can_upload(&self) -> bool {
        self.selected.is_some()
    }

    /// Validates and stages a file. CSV files are previewed and their first
    /// data row is used to guess the date format and currency.
    pub fn select_file(&mut self, file: FilePart) -> Result<&SelectedFile, ActionError> {
        let extension = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(self.reject("Invalid file type. Please select a CSV or Excel file."));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(self.reject("File too large. Maximum size is 10MB."));
        }

        let preview = if extension == "csv" {
            match std::str::from_utf8(&file.bytes) {
                Ok(text) => Some(csv_preview(text)),
                Err(_) => {
                    self.view
                        .show_message("Unable to generate file preview", MessageKind::Warning);
                    None
                }
            }
        } else {
            None
        };
        if let Some(rows) = &preview {
            self.auto_detect(rows);
        }

        tracing::debug!(file = %file.file_name, bytes = file.bytes.len(), "file selected");
        let size_label = format_file_size(file.bytes.len() as u64);
        Ok(&*self.selected.insert(SelectedFile {
            file,
            size_label,
            preview,
        }))
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.last_result = None;
    }

    #[tracing::instrument(name = "upload_transactions", skip_all)]
    pub async fn upload(&mut self) -> Result<UploadResult, ActionError> {
        let Some(selected) = self.selected.as_ref() else {
            return Err(self.reject("Please select a file to upload"));
        };

        let outcome = self
            .api
            .upload_transactions(selected.file.clone(), &self.options)
            .await;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    total = result.total_rows,
                    imported = result.successful_transactions,
                    failed = result.failed_transactions,
                    skipped = result.skipped_duplicates,
                    "upload processed"
                );
                let (title, kind) = match result.outcome() {
                    UploadOutcome::Failed => ("Upload Failed", MessageKind::Error),
                    UploadOutcome::Completed => ("Upload Completed", MessageKind::Success),
                    UploadOutcome::CompletedWithIssues => {
                        ("Upload Completed with Issues", MessageKind::Warning)
                    }
                };
                self.view.render_list(std::slice::from_ref(&result));
                self.view.show_message(title, kind);
                self.last_result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                self.view.show_message(
                    &format!("Upload failed: {}", err.user_message()),
                    MessageKind::Error,
                );
                Err(err.into())
            }
        }
    }

    pub async fn status(&self) -> Result<Value, ActionError> {
        self.lookup(self.api.upload_status().await, "Error checking upload status")
    }

    pub async fn formats(&self) -> Result<Value, ActionError> {
        self.lookup(self.api.upload_formats().await, "Error loading supported formats")
    }

    pub async fn template(&self) -> Result<Value, ActionError> {
        self.lookup(self.api.upload_template().await, "Error loading upload template")
    }

    fn lookup(
        &self,
        result: Result<Value, ClientError>,
        failure: &str,
    ) -> Result<Value, ActionError> {
        result.map_err(|err| {
            self.view.show_message(
                &format!("{failure}: {}", err.user_message()),
                MessageKind::Error,
            );
            ActionError::from(err)
        })
    }

    fn auto_detect(&mut self, rows: &[Vec<String>]) {
        let Some(first_row) = rows.get(1) else {
            return;
        };
        if let Some(format) = first_row.first().and_then(|cell| detect_date_format(cell)) {
            self.options.date_format = format.to_string();
            self.view.show_message(
                &format!("Auto-detected date format: {format}"),
                MessageKind::Info,
            );
        }
        if let Some(currency) = first_row.get(1).and_then(|cell| detect_currency(cell)) {
            self.options.currency = currency.to_string();
            self.view.show_message(
                &format!("Auto-detected currency: {currency}"),
                MessageKind::Info,
            );
        }
    }

    fn reject(&self, message: &str) -> ActionError {
        self.view.show_message(message, MessageKind::Error);
        ActionError::Validation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::http::{HttpMethod, RawResponse, RequestBody};
    use crate::use_cases::test_support::{Harness, RecordingView, ScriptedTransport};

    const STATEMENT: &str = "Date,Amount,Description\n12/31/2024,€12.50,Bakery\n01/02/2025,€40.00,Fuel\n";

    fn setup(
        responses: Vec<Result<RawResponse, String>>,
    ) -> (Harness, UploadController, Arc<RecordingView<UploadResult>>) {
        let harness = Harness::signed_in(ScriptedTransport::new(responses));
        let view = Arc::new(RecordingView::default());
        let controller = UploadController::new(harness.api.clone(), view.clone());
        (harness, controller, view)
    }

    fn statement() -> FilePart {
        FilePart {
            file_name: "statement.CSV".to_string(),
            bytes: STATEMENT.as_bytes().to_vec(),
        }
    }

    #[test]
    fn when_extension_is_not_a_spreadsheet_then_file_is_refused() {
        let (_harness, mut controller, view) = setup(vec![]);

        let result = controller.select_file(FilePart {
            file_name: "notes.txt".to_string(),
            bytes: b"hello".to_vec(),
        });

        assert!(matches!(result, Err(ActionError::Validation(_))));
        assert!(!controller.can_upload());
        assert_eq!(view.last_message().map(|(_, kind)| kind), Some(MessageKind::Error));
    }

    #[test]
    fn when_file_is_too_large_then_file_is_refused() {
        let (_harness, mut controller, _view) = setup(vec![]);

        let result = controller.select_file(FilePart {
            file_name: "big.xlsx".to_string(),
            bytes: vec![0; MAX_UPLOAD_BYTES + 1],
        });

        assert_eq!(
            result.map(|_| ()),
            Err(ActionError::Validation(
                "File too large. Maximum size is 10MB.".to_string()
            ))
        );
    }

    #[test]
    fn csv_selection_previews_and_detects_format() {
        let (_harness, mut controller, view) = setup(vec![]);

        let selected = controller.select_file(statement()).expect("accepted").clone();

        let preview = selected.preview.expect("csv preview");
        assert_eq!(preview.len(), 3);
        assert_eq!(controller.options().date_format, "MM/dd/yyyy");
        assert_eq!(controller.options().currency, "EUR");
        assert_eq!(view.messages().len(), 2);
    }

    #[tokio::test]
    async fn when_nothing_is_selected_then_upload_is_refused() {
        let (harness, mut controller, _view) = setup(vec![]);

        let result = controller.upload().await;

        assert!(matches!(result, Err(ActionError::Validation(_))));
        assert!(harness.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn upload_sends_multipart_and_renders_result() {
        let (harness, mut controller, view) = setup(vec![Ok(RawResponse::json(
            200,
            r#"{"totalRows": 2, "successfulTransactions": 2, "failedTransactions": 0,
                "skippedDuplicates": 0, "errors": [], "warnings": [], "processingTime": "40ms"}"#,
        ))]);
        controller.select_file(statement()).expect("accepted");

        let result = controller.upload().await.expect("uploaded");

        assert_eq!(result.successful_transactions, 2);
        let sent = &harness.transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert!(sent.header("Content-Type").is_none());
        let RequestBody::Multipart(form) = &sent.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.file.as_ref().map(|f| f.file_name.as_str()), Some("statement.CSV"));
        assert!(form.fields.contains(&("currency".to_string(), "EUR".to_string())));
        assert_eq!(view.last_list(), Some(vec![result]));
        assert_eq!(
            view.last_message(),
            Some(("Upload Completed".to_string(), MessageKind::Success))
        );
    }

    #[tokio::test]
    async fn when_backend_rejects_upload_then_failure_is_reported() {
        let (_harness, mut controller, view) = setup(vec![Ok(RawResponse::json(
            400,
            "{\"message\":\"Unsupported date format\"}",
        ))]);
        controller.select_file(statement()).expect("accepted");

        let result = controller.upload().await;

        assert!(result.is_err());
        assert!(controller.last_result().is_none());
        assert_eq!(
            view.last_message(),
            Some((
                "Upload failed: Unsupported date format".to_string(),
                MessageKind::Error
            ))
        );
    }
}
