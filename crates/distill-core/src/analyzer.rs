//! The analysis workflow: validate, extract, prompt, complete, render.

use distill_extractors::{ExtractedText, ExtractionPipeline, ExtractionRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{DistillConfig, TaskBudgets};
use crate::error::{DistillError, DistillResult, ErrorCode};
use crate::presentation::{render, MarkerPolicy, Rendered};
use crate::tasks::{build_prompt, PromptInput, Task, DEFAULT_MAX_MARKS, MAX_MARKS_RANGE};
use crate::traits::{CompletionService, TokenUsage};

/// One analysis request. Built per interaction and consumed by [`Analyzer::analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub task: Task,
    /// Pasted text.
    pub text: Option<String>,
    /// Uploaded file, already buffered.
    pub upload: Option<ExtractionRequest>,
    pub job_description: Option<String>,
    /// Exam maximum marks; defaults to 10.
    pub max_marks: Option<u32>,
    /// Attach the full provider response.
    pub include_raw: bool,
}

impl AnalysisRequest {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            text: None,
            upload: None,
            job_description: None,
            max_marks: None,
            include_raw: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_upload(mut self, upload: ExtractionRequest) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn with_job_description(mut self, job_description: impl Into<String>) -> Self {
        self.job_description = Some(job_description.into());
        self
    }

    pub fn with_max_marks(mut self, max_marks: u32) -> Self {
        self.max_marks = Some(max_marks);
        self
    }

    pub fn with_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    fn pasted_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn job_description(&self) -> Option<&str> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Result of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub task: Task,
    pub model: String,
    /// Trimmed completion text.
    pub output: String,
    pub rendered: Rendered,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Full provider response, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Runs analysis requests against one extraction pipeline and one completion service.
pub struct Analyzer {
    pipeline: Arc<ExtractionPipeline>,
    completion: Arc<dyn CompletionService>,
    budgets: TaskBudgets,
    marker_policy: MarkerPolicy,
    max_upload_bytes: usize,
}

impl Analyzer {
    /// Create an analyzer with a pipeline built from `config.extraction`.
    pub fn new(config: &DistillConfig, completion: Arc<dyn CompletionService>) -> Self {
        Self::with_pipeline(
            config,
            Arc::new(ExtractionPipeline::from_config(&config.extraction)),
            completion,
        )
    }

    /// Create an analyzer with a custom pipeline.
    pub fn with_pipeline(
        config: &DistillConfig,
        pipeline: Arc<ExtractionPipeline>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            pipeline,
            completion,
            budgets: config.budgets,
            marker_policy: config.marker_policy,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn model_name(&self) -> &str {
        self.completion.model_name()
    }

    pub fn budgets(&self) -> &TaskBudgets {
        &self.budgets
    }

    pub fn marker_policy(&self) -> MarkerPolicy {
        self.marker_policy
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Run one request.
    ///
    /// Input warnings are returned before any completion call. At most one
    /// completion call is made.
    pub async fn analyze(&self, mut request: AnalysisRequest) -> DistillResult<Analysis> {
        let task = request.task;
        let max_marks = self.check_request(&request)?;

        let upload = request.upload.take();
        let document = self.document_for(&request, upload).await?;
        let mut input = PromptInput::new(&document).with_max_marks(max_marks);
        if let Some(job_description) = request.job_description() {
            input = input.with_job_description(job_description);
        }
        let prompt = build_prompt(task, &input);
        let max_tokens = self.budgets.for_task(task);

        info!(
            task = %task,
            model = self.completion.model_name(),
            max_tokens,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );
        let completion = self.completion.complete(&prompt, max_tokens).await?;

        let output = completion.text.trim().to_string();
        debug!(output_chars = output.len(), "Completion received");
        let rendered = render(task, &output, self.marker_policy)?;

        Ok(Analysis {
            task,
            model: self.completion.model_name().to_string(),
            output,
            rendered,
            usage: completion.usage,
            raw: if request.include_raw {
                completion.raw
            } else {
                None
            },
        })
    }

    /// Extract an upload off the async executor.
    pub async fn extract(&self, upload: ExtractionRequest) -> DistillResult<ExtractedText> {
        if upload.len() > self.max_upload_bytes {
            return Err(payload_too_large(upload.len(), self.max_upload_bytes));
        }

        let pipeline = Arc::clone(&self.pipeline);
        let extracted = tokio::task::spawn_blocking(move || pipeline.extract_request(&upload))
            .await
            .map_err(|e| DistillError::Internal(format!("Extraction task failed: {}", e)))??;

        debug!(
            content_type = %extracted.content_type,
            chars = extracted.len(),
            blocks = extracted.blocks,
            "Extracted upload"
        );
        Ok(extracted)
    }

    /// Checks that need no extraction. Returns the effective max marks.
    fn check_request(&self, request: &AnalysisRequest) -> DistillResult<u32> {
        let task = request.task;

        let max_marks = request.max_marks.unwrap_or(DEFAULT_MAX_MARKS);
        if task.uses_max_marks() && !MAX_MARKS_RANGE.contains(&max_marks) {
            return Err(DistillError::validation_with_suggestion(
                ErrorCode::ValOutOfRange,
                format!("Maximum marks must be between 1 and 100, got {}", max_marks),
                "Choose maximum marks between 1 and 100",
            ));
        }

        if let Some(upload) = &request.upload {
            if task.accepts_upload() && upload.len() > self.max_upload_bytes {
                return Err(payload_too_large(upload.len(), self.max_upload_bytes));
            }
        }

        match task {
            Task::Ats if request.upload.is_none() || request.job_description().is_none() => {
                Err(DistillError::input_missing(
                    ErrorCode::InputMissingJobDescription,
                    "Please upload resume and job description",
                ))
            }
            Task::Exam if request.upload.is_none() => Err(DistillError::input_missing(
                ErrorCode::InputMissingUpload,
                "Please upload a test paper",
            )),
            Task::Summarize if request.upload.is_none() && request.pasted_text().is_none() => {
                Err(DistillError::input_missing(
                    ErrorCode::InputMissingText,
                    "Please provide text or upload a file",
                ))
            }
            Task::OneSentence | Task::Sentiment if request.pasted_text().is_none() => {
                Err(DistillError::input_missing(
                    ErrorCode::InputMissingText,
                    "Please enter some text",
                ))
            }
            _ => Ok(max_marks),
        }
    }

    /// The text embedded in the prompt. An upload takes precedence over pasted text.
    async fn document_for(
        &self,
        request: &AnalysisRequest,
        upload: Option<ExtractionRequest>,
    ) -> DistillResult<String> {
        match (upload, request.task.accepts_upload()) {
            (Some(upload), true) => {
                if request.pasted_text().is_some() {
                    debug!("Upload present, ignoring pasted text");
                }
                let content_type = upload.content_type.clone();
                let extracted = self.extract(upload).await?;
                if extracted.is_empty() {
                    return Err(DistillError::empty_extraction(content_type));
                }
                Ok(extracted.into_string())
            }
            (upload, _) => {
                if upload.is_some() {
                    debug!("Task reads pasted text only, ignoring upload");
                }
                request
                    .pasted_text()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        DistillError::input_missing(
                            ErrorCode::InputMissingText,
                            "Please provide text or upload a file",
                        )
                    })
            }
        }
    }
}

fn payload_too_large(len: usize, max: usize) -> DistillError {
    DistillError::validation_with_suggestion(
        ErrorCode::ValPayloadTooLarge,
        format!("Upload is {} bytes, limit is {} bytes", len, max),
        "Upload a smaller file",
    )
}
