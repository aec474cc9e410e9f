//! Prompt templates for each task.

use super::{Marker, Task};

/// Inputs substituted into a prompt template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    /// Pasted text or extracted upload text.
    pub document: &'a str,
    /// Job description (ATS only).
    pub job_description: Option<&'a str>,
    /// Maximum marks (exam only).
    pub max_marks: u32,
}

impl<'a> PromptInput<'a> {
    pub fn new(document: &'a str) -> Self {
        Self {
            document,
            job_description: None,
            max_marks: super::DEFAULT_MAX_MARKS,
        }
    }

    pub fn with_job_description(mut self, job_description: &'a str) -> Self {
        self.job_description = Some(job_description);
        self
    }

    pub fn with_max_marks(mut self, max_marks: u32) -> Self {
        self.max_marks = max_marks;
        self
    }
}

/// Build the prompt for a task.
pub fn build_prompt(task: Task, input: &PromptInput<'_>) -> String {
    match task {
        Task::Summarize => format!(
            "Summarize the following content clearly and concisely:\n\n{}\n",
            input.document
        ),
        Task::OneSentence => format!(
            "Read the following paragraph carefully and summarize all its content \
             in one concise sentence:\n\n{}\n",
            input.document
        ),
        Task::Sentiment => format!(
            "Analyze the sentiment of the following text.\n\
             Respond with only one word: Positive, Negative, or Neutral.\n\n\
             Text:\n{}\n",
            input.document
        ),
        Task::Ats => format!(
            "You are an ATS system and professional HR recruiter.\n\n\
             Analyze the resume against the job description.\n\n\
             Resume:\n{}\n\n\
             Job Description:\n{}\n\n\
             {}",
            input.document,
            input.job_description.unwrap_or_default(),
            format_instructions(task.markers(), None)
        ),
        Task::Exam => format!(
            "You are an experienced exam evaluator.\n\n\
             The following document contains exam questions along with student answers.\n\
             Evaluate the paper using general subject knowledge. Understand each question, \
             evaluate the student's answers and assign marks out of {max}.\n\n\
             Test Paper Content:\n{doc}\n\n\
             {instructions}",
            max = input.max_marks,
            doc = input.document,
            instructions = format_instructions(task.markers(), Some(input.max_marks))
        ),
    }
}

/// Response-format block listing every marker in order.
fn format_instructions(markers: &[Marker], max_marks: Option<u32>) -> String {
    let mut out = String::from(
        "Respond using exactly these section markers, in this order. Start each section \
         with its marker on its own line, put the content on the following lines, and \
         separate sections with one blank line:\n\n",
    );
    for marker in markers {
        let instruction = match max_marks {
            Some(max) => marker.instruction.replace("MAX", &max.to_string()),
            None => marker.instruction.to_string(),
        };
        out.push_str(&format!("{}\n<{}>\n\n", marker.token, instruction));
    }
    out.push_str("Do not add any text outside these sections.\n");
    out
}
