//! Resume upload: pulls raw resume text out of a multipart form.
//!
//! Accepted fields:
//! - `resume`: the file. PDFs (by content type or `.pdf` name) go through `pdf-extract`
//!   on a blocking thread; anything else must be UTF-8 text.
//! - `publish`: optional `true`/`false`.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::builder::BuildRequest;

#[derive(Debug)]
struct ResumeFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl ResumeFile {
    fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self
                .file_name
                .as_deref()
                .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false)
            || self.data.starts_with(b"%PDF-")
    }
}

/// Reads the multipart form into a `BuildRequest`.
pub async fn read_upload(mut multipart: Multipart) -> Result<BuildRequest, AppError> {
    let mut resume: Option<ResumeFile> = None;
    let mut publish = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume = Some(ResumeFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("publish") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read publish: {e}")))?;
                publish = parse_publish_flag(&value)?;
            }
            _ => {}
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("Missing `resume` file field".to_string()))?;
    let raw_text = resume_text(resume).await?;

    Ok(BuildRequest { raw_text, publish })
}

async fn resume_text(resume: ResumeFile) -> Result<String, AppError> {
    let text = if resume.is_pdf() {
        info!("Extracting text from PDF resume ({} bytes)", resume.data.len());
        let data = resume.data;
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::Validation(format!("Could not read PDF resume: {e}")))?
    } else {
        String::from_utf8(resume.data.to_vec())
            .map_err(|_| AppError::Validation("Resume must be a PDF or UTF-8 text".to_string()))?
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation("raw_text missing".to_string()));
    }
    Ok(text)
}

fn parse_publish_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        other => Err(AppError::Validation(format!(
            "publish must be true or false, got '{other}'"
        ))),
    }
}
