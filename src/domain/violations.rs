//! Core domain models for legacy-pattern findings and validation results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - Violations know whether they block the build and how to render a one-line summary
//! - ValidationReport acts as an aggregate root over findings, files read and final status
//! - Halting is recorded as data; deciding to stop the process belongs to the caller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity levels for legacy findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Findings that were handled without stopping the build
    Warning,
    /// Findings that stop the build
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// What a rule found wrong with a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required project file does not exist
    MissingFile,
    /// File content matches an obsolete signature
    DeprecatedPatternFound,
    /// File content lacks a signature the current CLI requires
    RequiredPatternMissing,
    /// A deprecated pattern that was repaired by rewriting the file
    AutoFixed,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::DeprecatedPatternFound => "deprecated_pattern",
            Self::RequiredPatternMissing => "required_pattern_missing",
            Self::AutoFixed => "auto_fixed",
        }
    }
}

/// A legacy finding detected during validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that produced this finding
    pub rule_id: String,
    /// What kind of problem this is
    pub kind: ViolationKind,
    /// Severity level of this finding
    pub severity: Severity,
    /// Project file the rule looked at
    pub file_path: PathBuf,
    /// Remediation text shown to the user
    pub message: String,
    /// Extra example or migration snippet, if the rule carries one
    pub guidance: Option<String>,
    /// When this finding was detected
    pub detected_at: DateTime<Utc>,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        rule_id: impl Into<String>,
        kind: ViolationKind,
        severity: Severity,
        file_path: PathBuf,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            kind,
            severity,
            file_path,
            message: message.into(),
            guidance: None,
            detected_at: Utc::now(),
        }
    }

    /// Attach an example or migration snippet
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    /// Whether this violation stops the build
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// How a validation run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Every rule ran; the build may continue
    Passed,
    /// A fatal rule (or the batched index-template group) stopped evaluation
    Halted { rule_id: String },
}

/// Complete validation report containing all findings and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings, in the order the rules produced them
    pub violations: Vec<Violation>,
    /// Counts by severity
    pub counts: ViolationCounts,
    /// Project files read while validating, in read order
    pub files_read: Vec<PathBuf>,
    /// Final outcome
    pub status: ValidationStatus,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Create a new, passing report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            counts: ViolationCounts::default(),
            files_read: Vec::new(),
            status: ValidationStatus::Passed,
            validated_at: Utc::now(),
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.counts.add(violation.severity);
        self.violations.push(violation);
    }

    pub fn record_read(&mut self, path: &Path) {
        self.files_read.push(path.to_path_buf());
    }

    /// Stop the run at the given rule
    pub fn halt(&mut self, rule_id: impl Into<String>) {
        self.status = ValidationStatus::Halted { rule_id: rule_id.into() };
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.counts.has_blocking()
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.status, ValidationStatus::Halted { .. })
    }

    /// Files the auto-fix rule rewrote during this run
    pub fn auto_fixed(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.kind == ViolationKind::AutoFixed)
    }

    /// Process exit status the CLI driver should use
    pub fn exit_code(&self) -> i32 {
        if self.is_halted() {
            1
        } else {
            0
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur outside of rule evaluation
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A project file required by a rule could not be read
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },

    /// The bundled auto-fix template could not be loaded or written
    #[error("Template error: {message}")]
    Template { message: String },

    /// The CLI package manifest could not be parsed
    #[error("Manifest error: {message}")]
    Manifest { message: String },
}

impl PreflightError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create an analysis error
    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis { file: file.into(), message: message.into() }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template { message: message.into() }
    }

    /// Create a manifest error
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest { message: message.into() }
    }
}

/// Result type for preflight operations
pub type PreflightResult<T> = Result<T, PreflightError>;
