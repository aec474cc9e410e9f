//! Presentation of completion responses.

mod sections;

pub use sections::{split_blocks, MarkerPolicy, Section, SectionParser};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DistillError, DistillResult};
use crate::tasks::{Rendering, Task};

/// Sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse a one-word model reply. Surrounding punctuation and case are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        match word.as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    Plain {
        text: String,
    },
    Sentiment {
        /// `None` when the reply was not one of the three labels.
        sentiment: Option<Sentiment>,
        text: String,
    },
    Sections {
        sections: Vec<Section>,
    },
}

/// Render trimmed completion text for a task.
pub fn render(task: Task, text: &str, policy: MarkerPolicy) -> DistillResult<Rendered> {
    match task.rendering() {
        Rendering::Plain => Ok(Rendered::Plain {
            text: text.to_string(),
        }),
        Rendering::Sentiment => {
            let sentiment = Sentiment::parse(text);
            if sentiment.is_none() && policy == MarkerPolicy::Strict {
                return Err(DistillError::parse(format!(
                    "Expected Positive, Negative or Neutral, got: {}",
                    text
                )));
            }
            Ok(Rendered::Sentiment {
                sentiment,
                text: text.to_string(),
            })
        }
        Rendering::Sections => {
            let sections = SectionParser::new(task.markers(), policy).parse(text)?;
            Ok(Rendered::Sections { sections })
        }
    }
}
