//! Marker-based section parsing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::{DistillError, DistillResult};
use crate::tasks::Marker;

/// What to do when an expected marker is absent from a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPolicy {
    /// Missing sections are silently omitted.
    #[default]
    Lenient,
    /// Any missing section is a parse error.
    Strict,
}

impl FromStr for MarkerPolicy {
    type Err = DistillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(MarkerPolicy::Lenient),
            "strict" => Ok(MarkerPolicy::Strict),
            other => Err(DistillError::Configuration(format!(
                "Unknown marker policy: {} (expected lenient or strict)",
                other
            ))),
        }
    }
}

/// A labeled section recovered from a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub marker: &'static str,
    pub label: &'static str,
    /// Text after the marker, trimmed.
    pub body: String,
}

/// Split text into blocks separated by one or more blank lines.
///
/// Lines containing only whitespace count as blank. Blocks keep their
/// internal newlines.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

/// Parses responses that use literal section markers.
#[derive(Debug, Clone, Copy)]
pub struct SectionParser {
    markers: &'static [Marker],
    policy: MarkerPolicy,
}

impl SectionParser {
    pub fn new(markers: &'static [Marker], policy: MarkerPolicy) -> Self {
        Self { markers, policy }
    }

    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Parse a response into sections, in response order.
    ///
    /// A block becomes a section when its text starts with a known marker.
    /// Blocks without a marker are dropped.
    pub fn parse(&self, text: &str) -> DistillResult<Vec<Section>> {
        let mut sections = Vec::new();
        let mut unmarked = 0usize;

        for block in split_blocks(text) {
            let block = block.trim();
            match self.markers.iter().find(|m| block.starts_with(m.token)) {
                Some(marker) => sections.push(Section {
                    marker: marker.token,
                    label: marker.label,
                    body: block[marker.token.len()..].trim().to_string(),
                }),
                None => unmarked += 1,
            }
        }

        let missing: Vec<&str> = self
            .markers
            .iter()
            .map(|m| m.token)
            .filter(|token| !sections.iter().any(|s| s.marker == *token))
            .collect();

        debug!(
            sections = sections.len(),
            unmarked,
            missing = missing.len(),
            "Parsed marker sections"
        );

        if self.policy == MarkerPolicy::Strict && !missing.is_empty() {
            return Err(DistillError::missing_sections(&missing));
        }

        Ok(sections)
    }
}
