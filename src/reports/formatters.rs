use crate::reports::generator::KinshipReport;
use crate::types::Person;
use anyhow::Result;
use std::fmt::Write;

/// Trait for report formatters
pub trait ReportFormatter {
    fn format(&self, report: &KinshipReport) -> Result<String>;
}

fn subject(person: &Person) -> String {
    format!("{} ({})", person.name, person.id)
}

/// Plain text formatter
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &KinshipReport) -> Result<String> {
        let result = &report.result;
        let mut out = String::new();

        writeln!(out, "Kinship Report")?;
        writeln!(out, "==============")?;
        if let Some(phrase) = &report.phrase {
            writeln!(out, "Phrase: {}", phrase)?;
        }
        writeln!(
            out,
            "{} is {} of {}",
            subject(&report.person_a),
            result.role_of_a,
            subject(&report.person_b)
        )?;
        writeln!(
            out,
            "{} is {} of {}",
            subject(&report.person_b),
            result.role_of_b,
            subject(&report.person_a)
        )?;

        if !result.evidence.is_empty() {
            writeln!(out, "\nEvidence:")?;
            for line in &result.evidence {
                writeln!(out, "  - {}", line)?;
            }
        }

        writeln!(out, "\nGenerated at: {}", report.generated_at.to_rfc3339())?;
        Ok(out)
    }
}

/// Markdown formatter
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &KinshipReport) -> Result<String> {
        let result = &report.result;
        let mut out = String::new();

        writeln!(out, "# Kinship Report\n")?;
        if let Some(phrase) = &report.phrase {
            writeln!(out, "> {}\n", phrase)?;
        }

        writeln!(out, "| Person | Role | Id |")?;
        writeln!(out, "|--------|------|----|")?;
        writeln!(
            out,
            "| {} | {} | `{}` |",
            report.person_a.name, result.role_of_a, report.person_a.id
        )?;
        writeln!(
            out,
            "| {} | {} | `{}` |",
            report.person_b.name, result.role_of_b, report.person_b.id
        )?;

        if let Some(ancestor) = result.common_ancestor() {
            writeln!(out, "\n**Common ancestor**: `{}`", ancestor)?;
        }

        if !result.evidence.is_empty() {
            writeln!(out, "\n## Evidence\n")?;
            for line in &result.evidence {
                writeln!(out, "- {}", line)?;
            }
        }

        writeln!(out, "\n---\n*Generated at: {}*", report.generated_at.to_rfc3339())?;
        Ok(out)
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &KinshipReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
