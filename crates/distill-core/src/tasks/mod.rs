//! Analysis tasks, their token budgets and response markers.

mod prompts;

pub use prompts::{build_prompt, PromptInput};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DistillError;

/// Default maximum marks for exam grading.
pub const DEFAULT_MAX_MARKS: u32 = 10;

/// Accepted range for exam maximum marks.
pub const MAX_MARKS_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// A section marker the model is instructed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marker {
    /// Literal prefix, matched case- and character-exact.
    pub token: &'static str,
    /// Human-readable heading shown instead of the marker.
    pub label: &'static str,
    /// What the model should put under this marker.
    pub instruction: &'static str,
}

const ATS_MARKERS: &[Marker] = &[
    Marker {
        token: "ATS_SCORE:",
        label: "ATS Score",
        instruction: "ATS match score from 0 to 100, written as N/100",
    },
    Marker {
        token: "KEYWORD_MATCH:",
        label: "Keyword Match",
        instruction: "keyword match percentage between the resume and the job description",
    },
    Marker {
        token: "MISSING_SKILLS:",
        label: "Missing Skills",
        instruction: "important skills from the job description missing in the resume, one per line starting with -",
    },
    Marker {
        token: "STRENGTHS:",
        label: "Strengths",
        instruction: "resume strengths, one per line starting with -",
    },
    Marker {
        token: "FORMATTING_ISSUES:",
        label: "Formatting Issues",
        instruction: "ATS formatting issues, one per line starting with -",
    },
    Marker {
        token: "SUGGESTIONS:",
        label: "Suggestions",
        instruction: "suggestions to improve the ATS score, one per line starting with -",
    },
];

const EXAM_MARKERS: &[Marker] = &[
    Marker {
        token: "TOTAL_MARKS:",
        label: "Total Marks",
        instruction: "total marks obtained, written as N/MAX",
    },
    Marker {
        token: "CORRECT_POINTS:",
        label: "Correct Points",
        instruction: "correct answers and good points, one per line starting with -",
    },
    Marker {
        token: "MISSING_POINTS:",
        label: "Missing Points",
        instruction: "wrong or missing points, one per line starting with -",
    },
    Marker {
        token: "FEEDBACK:",
        label: "Feedback",
        instruction: "short feedback for improvement",
    },
];

/// How a task's response is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rendering {
    /// Trimmed text as-is.
    Plain,
    /// A single sentiment label.
    Sentiment,
    /// Marker-split labeled sections.
    Sections,
}

/// Analysis task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Clear, concise summary of pasted text or an upload.
    Summarize,
    /// One-sentence summary of a paragraph.
    OneSentence,
    /// Positive / Negative / Neutral label.
    Sentiment,
    /// Resume scored against a job description.
    Ats,
    /// Exam paper graded out of a maximum mark.
    Exam,
}

impl Task {
    /// All tasks in catalogue order.
    pub fn all() -> &'static [Task] {
        &[
            Task::Summarize,
            Task::OneSentence,
            Task::Sentiment,
            Task::Ats,
            Task::Exam,
        ]
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Summarize => "summarize",
            Task::OneSentence => "one_sentence",
            Task::Sentiment => "sentiment",
            Task::Ats => "ats",
            Task::Exam => "exam",
        }
    }

    /// Parse from string with flexible matching.
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        match lower.as_str() {
            "summarize" | "summarise" | "summary" => Some(Task::Summarize),
            "one_sentence" | "onesentence" | "sentence" => Some(Task::OneSentence),
            "sentiment" => Some(Task::Sentiment),
            "ats" | "resume" => Some(Task::Ats),
            "exam" | "test" | "grade" => Some(Task::Exam),
            _ => None,
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            Task::Summarize => "Summary",
            Task::OneSentence => "One-Sentence Summary",
            Task::Sentiment => "Sentiment",
            Task::Ats => "ATS Resume Analysis",
            Task::Exam => "Evaluation Result",
        }
    }

    /// Built-in max-token budget.
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            Task::Summarize => 150,
            Task::OneSentence => 100,
            Task::Sentiment => 10,
            Task::Ats | Task::Exam => 700,
        }
    }

    /// Whether an uploaded file is read for this task.
    pub fn accepts_upload(&self) -> bool {
        matches!(self, Task::Summarize | Task::Ats | Task::Exam)
    }

    /// Whether an uploaded file is mandatory.
    pub fn requires_upload(&self) -> bool {
        matches!(self, Task::Ats | Task::Exam)
    }

    /// Whether pasted text is read for this task.
    pub fn accepts_text(&self) -> bool {
        matches!(self, Task::Summarize | Task::OneSentence | Task::Sentiment)
    }

    pub fn requires_job_description(&self) -> bool {
        matches!(self, Task::Ats)
    }

    pub fn uses_max_marks(&self) -> bool {
        matches!(self, Task::Exam)
    }

    pub fn rendering(&self) -> Rendering {
        match self {
            Task::Summarize | Task::OneSentence => Rendering::Plain,
            Task::Sentiment => Rendering::Sentiment,
            Task::Ats | Task::Exam => Rendering::Sections,
        }
    }

    /// Section markers expected in the response; empty for plain tasks.
    pub fn markers(&self) -> &'static [Marker] {
        match self {
            Task::Ats => ATS_MARKERS,
            Task::Exam => EXAM_MARKERS,
            _ => &[],
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = DistillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_flexible(s).ok_or_else(|| {
            DistillError::validation_with_suggestion(
                crate::error::ErrorCode::ValInvalidInput,
                format!("Unknown task: {}", s),
                format!(
                    "Use one of: {}",
                    Task::all()
                        .iter()
                        .map(Task::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budgets() {
        assert_eq!(Task::Summarize.default_max_tokens(), 150);
        assert_eq!(Task::OneSentence.default_max_tokens(), 100);
        assert_eq!(Task::Sentiment.default_max_tokens(), 10);
        assert_eq!(Task::Ats.default_max_tokens(), 700);
        assert_eq!(Task::Exam.default_max_tokens(), 700);
    }

    #[test]
    fn test_round_trip_names() {
        for task in Task::all() {
            assert_eq!(Task::from_str_flexible(task.as_str()), Some(*task));
            assert_eq!(task.as_str().parse::<Task>().unwrap(), *task);
        }
    }

    #[test]
    fn test_flexible_aliases() {
        assert_eq!(Task::from_str_flexible("One-Sentence"), Some(Task::OneSentence));
        assert_eq!(Task::from_str_flexible(" Resume "), Some(Task::Ats));
        assert_eq!(Task::from_str_flexible("summarise"), Some(Task::Summarize));
        assert_eq!(Task::from_str_flexible("translate"), None);
    }

    #[test]
    fn test_unknown_task_is_validation_error() {
        let err = "translate".parse::<Task>().unwrap_err();
        assert!(err.is_user_warning());
        assert!(err.suggestion().unwrap().contains("one_sentence"));
    }

    #[test]
    fn test_markers_only_for_section_tasks() {
        for task in Task::all() {
            let has_markers = !task.markers().is_empty();
            assert_eq!(has_markers, task.rendering() == Rendering::Sections);
        }
        assert_eq!(Task::Ats.markers().len(), 6);
        assert_eq!(Task::Exam.markers()[0].token, "TOTAL_MARKS:");
    }

    #[test]
    fn test_markers_end_with_colon() {
        for task in Task::all() {
            for marker in task.markers() {
                assert!(marker.token.ends_with(':'));
                assert!(!marker.token.contains(char::is_whitespace));
            }
        }
    }

    #[test]
    fn test_input_requirements() {
        assert!(Task::Summarize.accepts_upload() && Task::Summarize.accepts_text());
        assert!(!Task::Sentiment.accepts_upload());
        assert!(Task::Ats.requires_upload() && Task::Ats.requires_job_description());
        assert!(Task::Exam.requires_upload() && Task::Exam.uses_max_marks());
        assert!(!Task::Exam.accepts_text());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Task::OneSentence).unwrap();
        assert_eq!(json, "\"one_sentence\"");
    }
}
