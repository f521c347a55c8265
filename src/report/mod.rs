//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is rendered as console remediation text or JSON
//! - Each formatter encapsulates the rules for its specific output format
//! - Domain logic remains pure while supporting multiple presentation needs

pub mod style;

use crate::domain::violations::{
    PreflightError, PreflightResult, Severity, ValidationReport, ValidationStatus, Violation,
    ViolationKind,
};
use serde_json::Value as JsonValue;
use std::io::Write;

pub use style::{paint, Style};

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Remediation text as printed by the CLI
    Human,
    /// JSON format for programmatic consumption
    Json,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to print example and migration snippets
    pub show_guidance: bool,
    /// Whether to print the closing summary line
    pub show_summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, show_guidance: true, show_summary: true }
    }
}

/// Renders validation reports
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> PreflightResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> PreflightResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn format_human(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        for violation in &report.violations {
            if violation.kind == ViolationKind::AutoFixed {
                output.push_str(&self.format_auto_fix(violation));
            } else {
                output.push_str(&self.format_violation(violation));
            }
        }

        if self.options.show_summary {
            output.push_str(&self.format_summary(report));
        }

        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let mut block = format!("\n⚠️  {}\n", violation.message);

        if self.options.show_guidance {
            if let Some(guidance) = &violation.guidance {
                block.push('\n');
                for line in guidance.lines() {
                    block.push_str(&self.format_guidance_line(line));
                    block.push('\n');
                }
            }
        }

        block.push('\n');
        block
    }

    /// Headings such as "Example:" or "OLD WAY:" start at column zero
    fn format_guidance_line(&self, line: &str) -> String {
        let is_heading = !line.starts_with(' ') && line.ends_with(':');
        if is_heading {
            paint(line, Style::Green, self.options.use_colors)
        } else {
            line.to_string()
        }
    }

    fn format_auto_fix(&self, violation: &Violation) -> String {
        let mut block = String::from("\n");
        block.push_str(&paint(" ⚠️  WARNING", Style::Yellow, self.options.use_colors));
        block.push('\n');
        for line in violation.message.lines() {
            block.push_str(&format!(" {}\n", line.trim_start()));
        }
        block.push_str(&format!(" Rewritten: {}\n\n", violation.file_path.display()));
        block
    }

    fn format_summary(&self, report: &ValidationReport) -> String {
        let colors = self.options.use_colors;
        match &report.status {
            ValidationStatus::Halted { rule_id } => {
                let errors = report.counts.error;
                let text = format!(
                    "❌ Legacy validation failed at '{}': {} error{}",
                    rule_id,
                    errors,
                    if errors == 1 { "" } else { "s" }
                );
                format!("{}\n", paint(&text, Style::Red, colors))
            }
            ValidationStatus::Passed => {
                let fixed = report.auto_fixed().count();
                let text = if fixed == 0 {
                    "✅ No legacy patterns found".to_string()
                } else {
                    format!(
                        "✅ Legacy validation passed, {} file{} rewritten",
                        fixed,
                        if fixed == 1 { "" } else { "s" }
                    )
                };
                format!("{}\n", paint(&text, Style::Green, colors))
            }
        }
    }

    fn format_json(&self, report: &ValidationReport) -> PreflightResult<String> {
        let json_violations: Vec<JsonValue> = report
            .violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "kind": v.kind.as_str(),
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.display().to_string(),
                    "message": v.message,
                    "guidance": v.guidance,
                    "detected_at": v.detected_at.to_rfc3339()
                })
            })
            .collect();

        let halted_at = match &report.status {
            ValidationStatus::Halted { rule_id } => Some(rule_id.as_str()),
            ValidationStatus::Passed => None,
        };

        let status = if halted_at.is_some() { "halted" } else { "passed" };
        let files_read: Vec<String> =
            report.files_read.iter().map(|p| p.display().to_string()).collect();

        let json_report = serde_json::json!({
            "status": status,
            "halted_at": halted_at,
            "violations": json_violations,
            "summary": {
                "violations_by_severity": {
                    "error": report.counts.error,
                    "warning": report.counts.warning,
                    "info": report.counts.info
                },
                "files_read": files_read,
                "validated_at": report.validated_at.to_rfc3339()
            },
            "exit_code": report.exit_code()
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| PreflightError::config(format!("JSON serialization failed: {e}")))
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

/// Color used for a severity label
pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::Red,
        Severity::Warning => Style::Yellow,
        Severity::Info => Style::Grey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions { use_colors: false, ..Default::default() })
    }

    fn halted_report() -> ValidationReport {
        let mut report = ValidationReport::new();
        report.add_violation(
            Violation::new(
                "root_component_app_id",
                ViolationKind::RequiredPatternMissing,
                Severity::Error,
                PathBuf::from("/app/src/App.vue"),
                "Your newer Quasar CLI requires a minor change to the root component:",
            )
            .with_guidance("Example:\n  <template>\n    <div id=\"q-app\">"),
        );
        report.record_read(&PathBuf::from("/app/src/App.vue"));
        report.halt("root_component_app_id");
        report
    }

    #[test]
    fn test_human_format_halted() {
        let output = plain().format_report(&halted_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("⚠️  Your newer Quasar CLI requires a minor change to the root component:"));
        assert!(output.contains("\nExample:\n  <template>\n"));
        assert!(output.contains("❌ Legacy validation failed at 'root_component_app_id': 1 error"));
    }

    #[test]
    fn test_human_format_without_guidance() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            show_guidance: false,
            ..Default::default()
        });
        let output = formatter.format_report(&halted_report(), OutputFormat::Human).unwrap();
        assert!(!output.contains("Example:"));
    }

    #[test]
    fn test_human_format_auto_fix() {
        let mut report = ValidationReport::new();
        report.add_violation(Violation::new(
            "babelrc_transform_runtime",
            ViolationKind::AutoFixed,
            Severity::Warning,
            PathBuf::from("/app/.babelrc"),
            "Your newer Quasar CLI requires a change to .babelrc file.\n Doing it automatically. Please review the changes.",
        ));

        let output = plain().format_report(&report, OutputFormat::Human).unwrap();

        assert!(output.contains(" ⚠️  WARNING\n"));
        assert!(output.contains(" Doing it automatically. Please review the changes.\n"));
        assert!(output.contains("Rewritten: /app/.babelrc"));
        assert!(output.contains("✅ Legacy validation passed, 1 file rewritten"));
    }

    #[test]
    fn test_empty_report() {
        let output = plain().format_report(&ValidationReport::new(), OutputFormat::Human).unwrap();
        assert_eq!(output, "✅ No legacy patterns found\n");
    }

    #[test]
    fn test_json_format() {
        let output = plain().format_report(&halted_report(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["status"], "halted");
        assert_eq!(json["halted_at"], "root_component_app_id");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["violations"][0]["kind"], "required_pattern_missing");
        assert_eq!(json["summary"]["files_read"][0], "/app/src/App.vue");
    }

    #[test]
    fn test_write_report() {
        let mut buffer = Vec::new();
        plain()
            .write_report(&ValidationReport::new(), OutputFormat::Human, &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "✅ No legacy patterns found\n");
    }
}
