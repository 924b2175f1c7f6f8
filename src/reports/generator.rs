use crate::reports::formatters::{JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};
use crate::types::{ClassificationResult, Person};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported format: {}", s)),
        }
    }
}

/// One classification, ready to be rendered
#[derive(Debug, Clone, Serialize)]
pub struct KinshipReport {
    pub generated_at: DateTime<Utc>,
    pub person_a: Person,
    pub person_b: Person,
    pub result: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
}

impl KinshipReport {
    pub fn new(person_a: Person, person_b: Person, result: ClassificationResult) -> Self {
        Self {
            generated_at: Utc::now(),
            person_a,
            person_b,
            result,
            phrase: None,
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }
}

/// Report generator for creating various output formats
#[derive(Debug, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate report in the specified format
    pub fn generate(&self, report: &KinshipReport, format: &str) -> Result<String> {
        let format: OutputFormat = format.parse()?;
        self.render(report, format)
    }

    pub fn render(&self, report: &KinshipReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn ReportFormatter = match format {
            OutputFormat::Text => &TextFormatter,
            OutputFormat::Markdown => &MarkdownFormatter,
            OutputFormat::Json => &JsonFormatter,
        };
        formatter.format(report)
    }
}
