//! Quasar Preflight - Build banners and legacy-pattern validation for Quasar CLI projects
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from file system and terminal concerns
//! - The validator reports findings; the CLI driver decides whether the process stops
//! - Version information and build context are passed explicitly, never read from globals

pub mod banner;
pub mod config;
pub mod domain;
pub mod report;
pub mod rules;
pub mod validator;

// Re-export main types for convenient access
pub use domain::violations::{
    PreflightError, PreflightResult, Severity, ValidationReport, ValidationStatus, Violation,
    ViolationCounts, ViolationKind,
};

pub use config::{
    BuildContext, BuildMode, ConfigBuilder, PreflightConfig, SourceFiles, ToolInfo, ToolSettings,
};

pub use banner::{Banner, BuildDetails, Command};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::{LegacyRule, RuleAction, RuleCheck, RuleCondition, RuleTarget};

pub use validator::{DiskFs, LegacyValidator, ProjectFs};

use std::path::Path;

/// One CLI invocation: resolved context, version info and output settings
pub struct Preflight {
    context: BuildContext,
    tool: ToolInfo,
    report_formatter: ReportFormatter,
    use_colors: bool,
}

impl Preflight {
    /// Create an invocation from a loaded configuration
    pub fn new_with_config(config: PreflightConfig) -> PreflightResult<Self> {
        config.validate()?;
        let tool = ToolInfo::resolve(&config.tool)?;
        Ok(Self {
            context: config.context,
            tool,
            report_formatter: ReportFormatter::default(),
            use_colors: true,
        })
    }

    /// Create an invocation with default configuration rooted at `project_root`
    pub fn for_project<P: AsRef<Path>>(project_root: P) -> PreflightResult<Self> {
        let mut config = PreflightConfig::discover(&project_root)?.unwrap_or_default();
        config.context.project_root = project_root.as_ref().to_path_buf();
        Self::new_with_config(config)
    }

    /// Create an invocation loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> PreflightResult<Self> {
        let config = PreflightConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatting options
    pub fn with_report_options(mut self, options: ReportOptions) -> Self {
        self.use_colors = options.use_colors;
        self.report_formatter = ReportFormatter::new(options);
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn tool(&self) -> &ToolInfo {
        &self.tool
    }

    /// Run the legacy checklist against the project on disk
    pub fn validate(&self) -> PreflightResult<ValidationReport> {
        LegacyValidator::new(&self.context).validate()
    }

    /// Banner formatter for this invocation
    pub fn banner(&self) -> Banner<'_> {
        Banner::new(&self.context, &self.tool).with_colors(self.use_colors)
    }

    /// Format a validation report for output
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> PreflightResult<String> {
        self.report_formatter.format_report(report, format)
    }
}

/// Convenience function to validate a project with default settings
pub fn validate_project<P: AsRef<Path>>(project_root: P) -> PreflightResult<ValidationReport> {
    Preflight::for_project(project_root)?.validate()
}
