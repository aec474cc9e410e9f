//! Analysis endpoint.

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use distill_core::{Analysis, AnalysisRequest, ContentType, ExtractionRequest, Task};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for an analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub title: &'static str,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Form fields collected from the multipart body.
#[derive(Debug, Default)]
struct AnalyzeForm {
    task: Option<String>,
    text: Option<String>,
    file: Option<ExtractionRequest>,
    job_description: Option<String>,
    max_marks: Option<String>,
    include_raw: bool,
}

impl AnalyzeForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "task" => form.task = Some(text_field(field).await?),
                "text" => form.text = Some(text_field(field).await?),
                "job_description" => form.job_description = Some(text_field(field).await?),
                "max_marks" => form.max_marks = Some(text_field(field).await?),
                "include_raw" => form.include_raw = is_checked(&text_field(field).await?),
                "file" => form.file = file_field(field).await?,
                other => debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    fn into_request(self) -> ApiResult<AnalysisRequest> {
        let task = self
            .task
            .ok_or_else(|| ApiError::validation("Missing form field: task"))?
            .parse::<Task>()?;

        let mut request = AnalysisRequest::new(task).with_raw(self.include_raw);
        if let Some(text) = self.text {
            request = request.with_text(text);
        }
        if let Some(upload) = self.file {
            request = request.with_upload(upload);
        }
        if let Some(job_description) = self.job_description {
            request = request.with_job_description(job_description);
        }
        if let Some(max_marks) = self.max_marks.filter(|m| !m.trim().is_empty()) {
            let max_marks = max_marks.trim().parse::<u32>().map_err(|_| {
                ApiError::validation(format!("max_marks must be a whole number, got {}", max_marks))
            })?;
            request = request.with_max_marks(max_marks);
        }

        Ok(request)
    }
}

async fn text_field(field: Field<'_>) -> ApiResult<String> {
    field.text().await.map_err(multipart_error)
}

/// Buffer an uploaded file. A file part with no name and no bytes means
/// nothing was chosen.
async fn file_field(field: Field<'_>) -> ApiResult<Option<ExtractionRequest>> {
    let file_name = field.file_name().map(str::to_string);
    let declared = field.content_type().map(str::to_string);
    let payload = field.bytes().await.map_err(multipart_error)?;

    if payload.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
        return Ok(None);
    }

    let content_type = match (declared.as_deref(), file_name.as_deref()) {
        (Some(mime), _) if !is_generic_mime(mime) => ContentType::from_mime(mime),
        (_, Some(name)) if !name.is_empty() => ContentType::from_file_name(name),
        (Some(mime), _) => ContentType::from_mime(mime),
        (None, _) => ContentType::Unknown(String::new()),
    };

    debug!(
        file_name = file_name.as_deref().unwrap_or(""),
        content_type = %content_type,
        bytes = payload.len(),
        "Received upload"
    );
    Ok(Some(ExtractionRequest::new(content_type, payload.to_vec())))
}

/// MIME labels that say nothing about the format.
fn is_generic_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/octet-stream") || essence.is_empty()
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::new(e.status(), "BAD_MULTIPART", e.body_text())
}

/// Run one analysis from a multipart form.
/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let request = AnalyzeForm::read(multipart).await?.into_request()?;
    let title = request.task.title();

    let analysis = state.analyzer.analyze(request).await?;

    Ok(Json(AnalyzeResponse { title, analysis }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_checked() {
        assert!(is_checked("on"));
        assert!(is_checked(" TRUE "));
        assert!(!is_checked("false"));
        assert!(!is_checked(""));
    }

    #[test]
    fn test_generic_mime() {
        assert!(is_generic_mime("application/octet-stream"));
        assert!(is_generic_mime(""));
        assert!(!is_generic_mime("application/pdf"));
    }

    #[test]
    fn test_form_requires_task() {
        let err = AnalyzeForm::default().into_request().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_form_rejects_non_numeric_marks() {
        let form = AnalyzeForm {
            task: Some("exam".to_string()),
            max_marks: Some("ten".to_string()),
            ..Default::default()
        };
        let err = form.into_request().unwrap_err();
        assert!(err.message.contains("max_marks"));
    }

    #[test]
    fn test_form_into_request() {
        let form = AnalyzeForm {
            task: Some("ats".to_string()),
            job_description: Some("Rust".to_string()),
            max_marks: Some(" ".to_string()),
            include_raw: true,
            ..Default::default()
        };
        let request = form.into_request().unwrap();
        assert_eq!(request.task, Task::Ats);
        assert_eq!(request.job_description.as_deref(), Some("Rust"));
        assert!(request.max_marks.is_none());
        assert!(request.include_raw);
    }
}
