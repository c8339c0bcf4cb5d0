use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::{
    db::{
        dao::{FeedbackDao, NewFeedback},
        entities::feedback::{self, FeedbackType, StoredFile, StoredFiles},
    },
    error::AppError,
    services::notifier::Notifier,
};

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_URL_CHARS: usize = 1000;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct FeedbackUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Raw multipart fields; everything is checked by [`FeedbackService::submit`].
#[derive(Debug, Clone, Default)]
pub struct FeedbackInput {
    pub feedback_type: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub files: Vec<FeedbackUpload>,
}

#[derive(Clone)]
pub struct FeedbackService {
    feedback: FeedbackDao,
    notifier: Notifier,
    storage_dir: PathBuf,
}

impl FeedbackService {
    pub fn new(feedback: FeedbackDao, notifier: Notifier, storage_dir: PathBuf) -> Self {
        Self {
            feedback,
            notifier,
            storage_dir,
        }
    }

    /// Stores attachments, persists the row and files the issue in the background.
    pub async fn submit(
        &self,
        input: FeedbackInput,
        user_id: Option<Uuid>,
    ) -> Result<feedback::Model, AppError> {
        let feedback_type = parse_type(&input.feedback_type)?;
        check_length("url", &input.url, MAX_URL_CHARS)?;
        check_length("title", &input.title, MAX_TITLE_CHARS)?;
        check_length("description", &input.description, MAX_DESCRIPTION_CHARS)?;
        if let Some(file) = input.files.iter().find(|f| f.bytes.len() > MAX_FILE_BYTES) {
            return Err(AppError::validation(format!(
                "File '{}' exceeds the 5 MiB limit",
                file.original_name
            )));
        }

        let files = self.store_files(input.files).await?;
        let row = self
            .feedback
            .create_feedback(NewFeedback {
                user_id,
                feedback_type,
                url: input.url,
                title: input.title,
                description: input.description,
                files,
            })
            .await?;
        info!(feedback_id = %row.id, kind = ?row.feedback_type, "feedback received");

        self.notifier.feedback_received(&row);
        Ok(row)
    }

    async fn store_files(&self, uploads: Vec<FeedbackUpload>) -> Result<StoredFiles, AppError> {
        if uploads.is_empty() {
            return Ok(StoredFiles::default());
        }
        tokio::fs::create_dir_all(&self.storage_dir)
            .await
            .map_err(|err| AppError::internal(format!("Could not create upload directory: {err}")))?;

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let path = self
                .storage_dir
                .join(stored_name(Uuid::new_v4(), &upload.original_name));
            tokio::fs::write(&path, &upload.bytes)
                .await
                .map_err(|err| AppError::internal(format!("Could not store upload: {err}")))?;
            stored.push(StoredFile {
                original_name: upload.original_name,
                path: path.to_string_lossy().into_owned(),
            });
        }
        Ok(StoredFiles(stored))
    }
}

fn parse_type(value: &str) -> Result<FeedbackType, AppError> {
    match value.trim() {
        "feedback" => Ok(FeedbackType::Feedback),
        "feature" => Ok(FeedbackType::Feature),
        _ => Err(AppError::validation("type must be 'feedback' or 'feature'")),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(AppError::validation(format!(
            "{field} must be between 1 and {max} characters"
        )));
    }
    Ok(())
}

/// Keeps the client's extension only; the name itself is never trusted.
fn stored_name(id: Uuid, original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    match extension {
        Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}
