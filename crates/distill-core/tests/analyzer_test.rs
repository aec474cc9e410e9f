//! Integration tests for the analysis workflow with a recording completion service.

use async_trait::async_trait;
use distill_core::{
    AnalysisRequest, Analyzer, Completion, CompletionService, ContentType, DistillConfig,
    DistillError, DistillResult, ErrorCode, ExtractionRequest, MarkerPolicy, Rendered, Sentiment,
    Task, TokenUsage,
};
use distill_extractors::{ExtractorConfig, OcrConfig};
use std::sync::{Arc, Mutex};

/// Completion service that records every call and replies with fixed text.
struct RecordingCompletion {
    reply: String,
    calls: Mutex<Vec<(String, u32)>>,
}

impl RecordingCompletion {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for RecordingCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> DistillResult<Completion> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        Ok(Completion::text(self.reply.clone())
            .with_usage(TokenUsage {
                prompt_tokens: 42,
                completion_tokens: 7,
                total_tokens: 49,
            })
            .with_raw(serde_json::json!({ "id": "chatcmpl-test", "object": "chat.completion" })))
    }

    fn model_name(&self) -> &str {
        "recording-model"
    }
}

fn analyzer(config: &DistillConfig, fake: &Arc<RecordingCompletion>) -> Analyzer {
    Analyzer::new(config, fake.clone() as Arc<dyn CompletionService>)
}

fn txt(content: &str) -> ExtractionRequest {
    ExtractionRequest::from_mime("text/plain", content)
}

#[tokio::test]
async fn test_empty_input_warns_without_remote_call() {
    let fake = RecordingCompletion::new("unused");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(AnalysisRequest::new(Task::Summarize).with_text("   "))
        .await
        .unwrap_err();

    assert!(err.is_user_warning());
    assert_eq!(err.code(), ErrorCode::InputMissingText);
    assert_eq!(err.suggestion(), Some("Please provide text or upload a file"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_ats_without_job_description_warns_without_remote_call() {
    let fake = RecordingCompletion::new("unused");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(
            AnalysisRequest::new(Task::Ats)
                .with_upload(txt("Jane Doe\nRust engineer"))
                .with_job_description("  "),
        )
        .await
        .unwrap_err();

    assert!(err.is_user_warning());
    assert_eq!(err.code(), ErrorCode::InputMissingJobDescription);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_ats_sections_rendered() {
    let fake = RecordingCompletion::new("ATS_SCORE:\n85/100\n\nMISSING_SKILLS:\n- SQL\n");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let analysis = analyzer
        .analyze(
            AnalysisRequest::new(Task::Ats)
                .with_upload(txt("Jane Doe\nRust engineer"))
                .with_job_description("Backend engineer: Rust, SQL"),
        )
        .await
        .unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, 700);
    assert!(calls[0].0.contains("Jane Doe\nRust engineer"));
    assert!(calls[0].0.contains("Backend engineer: Rust, SQL"));

    match analysis.rendered {
        Rendered::Sections { sections } => {
            assert_eq!(sections.len(), 2);
            assert_eq!(sections[0].label, "ATS Score");
            assert_eq!(sections[0].body, "85/100");
            assert_eq!(sections[1].label, "Missing Skills");
            assert_eq!(sections[1].body, "- SQL");
        }
        other => panic!("expected sections, got {:?}", other),
    }
    assert_eq!(analysis.model, "recording-model");
    assert!(analysis.raw.is_none());
}

#[tokio::test]
async fn test_strict_policy_rejects_missing_markers() {
    let fake = RecordingCompletion::new("ATS_SCORE:\n85/100\n\nMISSING_SKILLS:\n- SQL");
    let config = DistillConfig::builder()
        .marker_policy(MarkerPolicy::Strict)
        .build()
        .unwrap();
    let analyzer = analyzer(&config, &fake);

    let err = analyzer
        .analyze(
            AnalysisRequest::new(Task::Ats)
                .with_upload(txt("resume"))
                .with_job_description("jd"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ParseMissingSection);
    assert!(err.to_string().contains("STRENGTHS:"));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_upload_takes_precedence_over_pasted_text() {
    let fake = RecordingCompletion::new("A summary.");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let analysis = analyzer
        .analyze(
            AnalysisRequest::new(Task::Summarize)
                .with_text("pasted paragraph")
                .with_upload(txt("uploaded paragraph")),
        )
        .await
        .unwrap();

    let calls = fake.calls();
    assert!(calls[0].0.contains("uploaded paragraph"));
    assert!(!calls[0].0.contains("pasted paragraph"));
    assert_eq!(calls[0].1, 150);
    assert_eq!(
        analysis.rendered,
        Rendered::Plain {
            text: "A summary.".to_string()
        }
    );
}

#[tokio::test]
async fn test_sentiment_reads_text_and_trims_reply() {
    let fake = RecordingCompletion::new("  Positive\n");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let analysis = analyzer
        .analyze(
            AnalysisRequest::new(Task::Sentiment)
                .with_text("I really enjoyed this course")
                .with_raw(true),
        )
        .await
        .unwrap();

    assert_eq!(fake.calls()[0].1, 10);
    assert_eq!(analysis.output, "Positive");
    assert_eq!(
        analysis.rendered,
        Rendered::Sentiment {
            sentiment: Some(Sentiment::Positive),
            text: "Positive".to_string()
        }
    );
    assert_eq!(analysis.usage.unwrap().total_tokens, 49);
    assert_eq!(analysis.raw.unwrap()["id"], "chatcmpl-test");
}

#[tokio::test]
async fn test_sentiment_ignores_upload() {
    let fake = RecordingCompletion::new("Neutral");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(AnalysisRequest::new(Task::Sentiment).with_upload(txt("from a file")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InputMissingText);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_exam_max_marks_range() {
    let fake = RecordingCompletion::new("TOTAL_MARKS:\n7/10");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    for max_marks in [0, 101] {
        let err = analyzer
            .analyze(
                AnalysisRequest::new(Task::Exam)
                    .with_upload(txt("Q1. What is H2O?\nA1. Water"))
                    .with_max_marks(max_marks),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
    }
    assert!(fake.calls().is_empty());

    analyzer
        .analyze(AnalysisRequest::new(Task::Exam).with_upload(txt("Q1. What is H2O?\nA1. Water")))
        .await
        .unwrap();
    assert!(fake.calls()[0].0.contains("assign marks out of 10"));
}

#[tokio::test]
async fn test_exam_without_upload_warns() {
    let fake = RecordingCompletion::new("unused");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(AnalysisRequest::new(Task::Exam).with_text("pasted answers"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InputMissingUpload);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_empty_extraction_warns_without_remote_call() {
    let fake = RecordingCompletion::new("unused");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(AnalysisRequest::new(Task::Exam).with_upload(txt(" \n\n ")))
        .await
        .unwrap_err();
    assert!(matches!(err, DistillError::EmptyExtraction { .. }));

    let err = analyzer
        .analyze(
            AnalysisRequest::new(Task::Summarize)
                .with_upload(ExtractionRequest::from_mime("application/zip", vec![1, 2, 3])),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DistillError::EmptyExtraction {
            content_type: ContentType::Unknown(_),
            ..
        }
    ));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_missing_ocr_engine_is_fatal() {
    let fake = RecordingCompletion::new("unused");
    let config = DistillConfig::builder()
        .extraction(ExtractorConfig {
            ocr: OcrConfig::with_engine_path("/definitely/not/here/tesseract"),
            ..Default::default()
        })
        .build()
        .unwrap();
    let analyzer = analyzer(&config, &fake);

    let err = analyzer
        .analyze(
            AnalysisRequest::new(Task::Exam)
                .with_upload(ExtractionRequest::from_mime("image/png", vec![0u8; 32])),
        )
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(err.code(), ErrorCode::ExtEngineNotFound);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_utf8_upload_propagates() {
    let fake = RecordingCompletion::new("unused");
    let analyzer = analyzer(&DistillConfig::default(), &fake);

    let err = analyzer
        .analyze(
            AnalysisRequest::new(Task::Summarize)
                .with_upload(ExtractionRequest::from_mime("text/plain", vec![0xC3, 0x28])),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ExtDecoding);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_upload_size_cap() {
    let fake = RecordingCompletion::new("unused");
    let config = DistillConfig::builder().max_upload_bytes(8).build().unwrap();
    let analyzer = analyzer(&config, &fake);

    let err = analyzer
        .analyze(AnalysisRequest::new(Task::Summarize).with_upload(txt("more than eight bytes")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValPayloadTooLarge);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_budget_override() {
    let fake = RecordingCompletion::new("One sentence.");
    let config = DistillConfig::builder()
        .budget(Task::OneSentence, 60)
        .build()
        .unwrap();
    let analyzer = analyzer(&config, &fake);

    analyzer
        .analyze(AnalysisRequest::new(Task::OneSentence).with_text("A long paragraph."))
        .await
        .unwrap();

    assert_eq!(fake.calls()[0].1, 60);
}
