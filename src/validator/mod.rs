//! Legacy validation orchestrator for Quasar Preflight
//!
//! CDD Principle: Domain Services - LegacyValidator walks the fixed checklist against a project
//! - Batched rules accumulate findings; the run halts once the batch is over
//! - Fatal rules halt at the first failure and no later file is read
//! - The auto-fix rule repairs its target and lets the run continue

pub mod fs;

use crate::config::BuildContext;
use crate::domain::violations::{
    PreflightError, PreflightResult, Severity, ValidationReport, Violation, ViolationKind,
};
use crate::rules::{legacy_rules, LegacyRule, RuleAction, RuleCheck, RuleTarget};
use std::path::{Path, PathBuf};

pub use fs::{DiskFs, ProjectFs, BUNDLED_BABELRC};

/// Runs the legacy checklist for one build invocation
pub struct LegacyValidator<'a, F: ProjectFs = DiskFs> {
    /// Invocation being validated
    ctx: &'a BuildContext,
    /// Project file access
    fs: F,
    /// Checklist in evaluation order
    rules: &'static [LegacyRule],
}

impl<'a> LegacyValidator<'a, DiskFs> {
    /// Create a validator reading the project from disk
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self::with_fs(ctx, DiskFs)
    }
}

impl<'a, F: ProjectFs> LegacyValidator<'a, F> {
    /// Create a validator over a custom file-system adapter
    pub fn with_fs(ctx: &'a BuildContext, fs: F) -> Self {
        Self { ctx, fs, rules: legacy_rules() }
    }

    /// Evaluate every applicable rule in order and report the outcome.
    ///
    /// Rule failures are recorded in the returned report; `Err` is reserved for
    /// files that exist but cannot be read, and for a failed auto-fix write.
    pub fn validate(&self) -> PreflightResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let mut loaded: Option<(PathBuf, String)> = None;
        let mut missing: Vec<PathBuf> = Vec::new();
        let mut batch_failure: Option<&'static str> = None;

        for rule in self.rules {
            if rule.action != RuleAction::Batched {
                if let Some(rule_id) = batch_failure.take() {
                    tracing::debug!("Batched checks failed, halting before '{}'", rule.id);
                    report.halt(rule_id);
                    return Ok(report);
                }
            }

            if !rule.applies_to(self.ctx) {
                tracing::debug!("Skipping rule '{}' ({})", rule.id, rule.condition.as_str());
                continue;
            }

            let path = rule.target.resolve(self.ctx);
            let failed = match rule.check {
                RuleCheck::FileExists => {
                    let present = self.fs.exists(&path);
                    if !present {
                        missing.push(path.clone());
                    }
                    !present
                }
                check => {
                    if missing.contains(&path) {
                        tracing::debug!("Skipping rule '{}': {} is missing", rule.id, path.display());
                        continue;
                    }
                    let content = self.load(&path, &mut loaded, &mut report)?;
                    check.fails_on(content)
                }
            };

            tracing::debug!(
                "Rule '{}' on {}: {}",
                rule.id,
                path.display(),
                if failed { "failed" } else { "ok" }
            );
            if !failed {
                continue;
            }

            match rule.action {
                RuleAction::Batched => {
                    report.add_violation(self.violation(rule, &path, rule.check.violation_kind()));
                    if batch_failure.is_none() {
                        batch_failure = Some(rule.id);
                    }
                }
                RuleAction::Fatal => {
                    report.add_violation(self.violation(rule, &path, rule.check.violation_kind()));
                    report.halt(rule.id);
                    return Ok(report);
                }
                RuleAction::AutoFix => {
                    self.apply_fix(rule, &path)?;
                    loaded = None;
                    report.add_violation(self.violation(rule, &path, ViolationKind::AutoFixed));
                }
            }
        }

        if let Some(rule_id) = batch_failure {
            report.halt(rule_id);
        }

        Ok(report)
    }

    /// Read `path` unless it is the file the previous rule already read
    fn load<'c>(
        &self,
        path: &Path,
        loaded: &'c mut Option<(PathBuf, String)>,
        report: &mut ValidationReport,
    ) -> PreflightResult<&'c str> {
        let cached = matches!(loaded.as_ref(), Some((previous, _)) if previous.as_path() == path);
        if !cached {
            let content = self.fs.read_to_string(path).map_err(|e| {
                PreflightError::analysis(path.display().to_string(), format!("Failed to read file: {e}"))
            })?;
            report.record_read(path);
            *loaded = Some((path.to_path_buf(), content));
        }

        Ok(loaded.as_ref().map(|(_, content)| content.as_str()).unwrap_or_default())
    }

    fn apply_fix(&self, rule: &LegacyRule, path: &Path) -> PreflightResult<()> {
        let template = match rule.target {
            RuleTarget::BabelConfig => {
                fs::load_babelrc_template(self.ctx.babelrc_template.as_deref())?
            }
            other => {
                return Err(PreflightError::template(format!(
                    "No bundled template for the {} (rule '{}')",
                    other.as_str(),
                    rule.id
                )))
            }
        };

        self.fs.write(path, &template).map_err(|e| {
            PreflightError::template(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!("Rewrote {} from the bundled template", path.display());
        Ok(())
    }

    fn violation(&self, rule: &LegacyRule, path: &Path, kind: ViolationKind) -> Violation {
        let severity = if kind == ViolationKind::AutoFixed {
            Severity::Warning
        } else {
            rule.action.severity()
        };

        let violation =
            Violation::new(rule.id, kind, severity, path.to_path_buf(), rule.render_message(path));
        match rule.guidance {
            Some(guidance) => violation.with_guidance(guidance),
            None => violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::domain::violations::ValidationStatus;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use tempfile::TempDir;

    const GOOD_INDEX: &str = "<!DOCTYPE html>\n<html>\n<head><title>app</title></head>\n<body><div id=\"q-app\"></div></body>\n</html>\n";
    const GOOD_APP: &str = "<template>\n  <div id=\"q-app\">\n    <router-view />\n  </div>\n</template>\n";
    const GOOD_ROUTER: &str = "export default function (/* { store } */) {\n  return new VueRouter({ routes })\n}\n";
    const OLD_ROUTER: &str = "const Router = new VueRouter({ routes })\nexport default Router\n";
    const GOOD_STORE: &str = "export default function () {\n  return new Vuex.Store({})\n}\n";
    const OLD_STORE: &str = "const store = new Vuex.Store({})\nexport default store\n";
    const GOOD_BABELRC: &str = "{ \"presets\": [\"@babel/preset-env\"] }";
    const OLD_BABELRC: &str = "{ \"plugins\": [\"transform-runtime\"] }";

    /// In-memory project that records every read and write
    #[derive(Default)]
    struct SpyFs {
        files: RefCell<HashMap<PathBuf, String>>,
        reads: RefCell<Vec<PathBuf>>,
        writes: RefCell<Vec<PathBuf>>,
    }

    impl SpyFs {
        fn project() -> Self {
            let spy = Self::default();
            spy.put("src/index.template.html", GOOD_INDEX);
            spy.put("src/App.vue", GOOD_APP);
            spy.put("src/router/index.js", GOOD_ROUTER);
            spy.put("src/store/index.js", GOOD_STORE);
            spy.put(".babelrc", GOOD_BABELRC);
            spy
        }

        fn put(&self, relative: &str, content: &str) {
            self.files.borrow_mut().insert(Path::new("/app").join(relative), content.to_string());
        }

        fn remove(&self, relative: &str) {
            self.files.borrow_mut().remove(&Path::new("/app").join(relative));
        }

        fn content(&self, relative: &str) -> Option<String> {
            self.files.borrow().get(&Path::new("/app").join(relative)).cloned()
        }

        fn was_read(&self, relative: &str) -> bool {
            self.reads.borrow().contains(&Path::new("/app").join(relative))
        }
    }

    impl ProjectFs for SpyFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.borrow().contains_key(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            self.writes.borrow_mut().push(path.to_path_buf());
            self.files.borrow_mut().insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    fn context(mode: BuildMode, store: bool) -> BuildContext {
        BuildContext { mode, store, project_root: PathBuf::from("/app"), ..Default::default() }
    }

    fn rule_ids(report: &ValidationReport) -> Vec<&str> {
        report.violations.iter().map(|v| v.rule_id.as_str()).collect()
    }

    #[test]
    fn test_clean_project_passes() {
        let spy = SpyFs::project();
        let ctx = context(BuildMode::Ssr, true);
        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(report.status, ValidationStatus::Passed);
        assert!(!report.has_violations());
        assert_eq!(report.exit_code(), 0);
        assert!(spy.writes.borrow().is_empty());
    }

    #[rstest]
    #[case("<base href=\"<%= htmlWebpackPlugin.options.appBase %>\">", "index_base_href")]
    #[case("<link rel=\"<%= chunk.initial ? 'preload' : 'prefetch' %>\">", "index_chunk_preload")]
    #[case("<link rel=\"manifest\" href=\"statics/manifest.json\">", "index_pwa_manifest")]
    #[case("<%= htmlWebpackPlugin.options.headScripts %>", "index_head_scripts")]
    #[case("<%= htmlWebpackPlugin.options.bodyScripts %>", "index_body_scripts")]
    fn test_each_index_marker_in_isolation(#[case] snippet: &str, #[case] rule_id: &str) {
        let spy = SpyFs::project();
        spy.put("src/index.template.html", &format!("<html><head>{snippet}</head></html>"));
        let ctx = context(BuildMode::Spa, false);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(rule_ids(&report), vec![rule_id]);
        assert!(report.violations[0].message.contains("/src/index.template.html"));
        assert!(report.violations[0].guidance.is_some());
        assert_eq!(report.status, ValidationStatus::Halted { rule_id: rule_id.to_string() });
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_all_index_markers_reported_together() {
        let spy = SpyFs::project();
        spy.put(
            "src/index.template.html",
            r#"<base href="/">
<link rel="<%= chunk.initial ? 'preload' : 'prefetch' %>">
<link rel="manifest" href="statics/manifest.json">
<%= htmlWebpackPlugin.options.headScripts %>
<%= htmlWebpackPlugin.options.bodyScripts %>"#,
        );
        let ctx = context(BuildMode::Spa, false);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(
            rule_ids(&report),
            vec![
                "index_base_href",
                "index_chunk_preload",
                "index_pwa_manifest",
                "index_head_scripts",
                "index_body_scripts",
            ]
        );
        assert_eq!(report.counts.error, 5);
        assert_eq!(
            report.status,
            ValidationStatus::Halted { rule_id: "index_base_href".to_string() }
        );
    }

    #[test]
    fn test_index_failure_halts_before_later_reads() {
        let spy = SpyFs::project();
        spy.put("src/index.template.html", "<base href=\"/\">");
        spy.put("src/App.vue", "<template><div></div></template>");
        spy.put("src/router/index.js", OLD_ROUTER);
        let ctx = context(BuildMode::Ssr, true);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert!(report.is_halted());
        assert_eq!(*spy.reads.borrow(), vec![PathBuf::from("/app/src/index.template.html")]);
        assert_eq!(report.files_read, vec![PathBuf::from("/app/src/index.template.html")]);
    }

    #[test]
    fn test_index_template_read_once_for_the_batch() {
        let spy = SpyFs::project();
        let ctx = context(BuildMode::Spa, false);
        LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        let index_reads = spy
            .reads
            .borrow()
            .iter()
            .filter(|p| p.ends_with("src/index.template.html"))
            .count();
        assert_eq!(index_reads, 1);
    }

    #[test]
    fn test_missing_index_template_halts_without_reading() {
        let spy = SpyFs::project();
        spy.remove("src/index.template.html");
        let ctx = context(BuildMode::Spa, false);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(rule_ids(&report), vec!["index_template_missing"]);
        assert_eq!(report.violations[0].kind, ViolationKind::MissingFile);
        assert!(spy.reads.borrow().is_empty());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_root_component_without_app_id_halts() {
        let spy = SpyFs::project();
        spy.put("src/App.vue", "<template><div id=\"app\"></div></template>");
        let ctx = context(BuildMode::Ssr, true);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(rule_ids(&report), vec!["root_component_app_id"]);
        let violation = &report.violations[0];
        assert_eq!(violation.kind, ViolationKind::RequiredPatternMissing);
        assert!(violation.message.contains("/app/src/App.vue"));
        assert!(violation.guidance.as_deref().unwrap().starts_with("Example:"));
        assert!(!spy.was_read("src/router/index.js"));
        assert!(!spy.was_read(".babelrc"));
        assert_eq!(report.exit_code(), 1);
    }

    #[rstest]
    #[case(BuildMode::Spa)]
    #[case(BuildMode::Pwa)]
    #[case(BuildMode::Cordova)]
    #[case(BuildMode::Electron)]
    fn test_router_not_inspected_outside_ssr(#[case] mode: BuildMode) {
        let spy = SpyFs::project();
        spy.put("src/router/index.js", OLD_ROUTER);
        let ctx = context(mode, true);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(report.status, ValidationStatus::Passed);
        assert!(!spy.was_read("src/router/index.js"));
        assert!(!spy.was_read("src/store/index.js"));
    }

    #[test]
    fn test_ssr_router_without_function_export_halts() {
        let spy = SpyFs::project();
        spy.put("src/router/index.js", OLD_ROUTER);
        let ctx = context(BuildMode::Ssr, true);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(rule_ids(&report), vec!["router_default_export_function"]);
        assert!(report.violations[0].guidance.as_deref().unwrap().contains("NEW WAY:"));
        assert!(!spy.was_read("src/store/index.js"));
        assert_eq!(report.exit_code(), 1);
    }

    #[rstest]
    #[case(BuildMode::Ssr, true, true)]
    #[case(BuildMode::Ssr, false, false)]
    #[case(BuildMode::Spa, true, false)]
    #[case(BuildMode::Spa, false, false)]
    fn test_store_checked_only_for_ssr_with_store(
        #[case] mode: BuildMode,
        #[case] store: bool,
        #[case] inspected: bool,
    ) {
        let spy = SpyFs::project();
        spy.put("src/store/index.js", OLD_STORE);
        let ctx = context(mode, store);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(spy.was_read("src/store/index.js"), inspected);
        assert_eq!(report.is_halted(), inspected);
        if inspected {
            assert_eq!(rule_ids(&report), vec!["store_default_export_function"]);
        }
    }

    #[test]
    fn test_missing_babelrc_halts() {
        let spy = SpyFs::project();
        spy.remove(".babelrc");
        let ctx = context(BuildMode::Spa, false);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(rule_ids(&report), vec!["babelrc_missing"]);
        assert_eq!(report.violations[0].kind, ViolationKind::MissingFile);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_transform_runtime_is_fixed_without_halting() {
        let spy = SpyFs::project();
        spy.put(".babelrc", OLD_BABELRC);
        let ctx = context(BuildMode::Spa, false);

        let report = LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();

        assert_eq!(report.status, ValidationStatus::Passed);
        assert_eq!(report.exit_code(), 0);
        assert!(!report.has_errors());
        assert_eq!(report.auto_fixed().count(), 1);
        assert_eq!(report.violations[0].severity, Severity::Warning);
        assert_eq!(spy.content(".babelrc").as_deref(), Some(BUNDLED_BABELRC));
        assert_eq!(*spy.writes.borrow(), vec![PathBuf::from("/app/.babelrc")]);
    }

    #[test]
    fn test_unreadable_root_component_is_an_error() {
        struct Unreadable;
        impl ProjectFs for Unreadable {
            fn exists(&self, _path: &Path) -> bool {
                true
            }
            fn read_to_string(&self, path: &Path) -> io::Result<String> {
                if path.ends_with("App.vue") {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                } else {
                    Ok(GOOD_INDEX.to_string())
                }
            }
            fn write(&self, _path: &Path, _contents: &str) -> io::Result<()> {
                Ok(())
            }
        }

        let ctx = context(BuildMode::Spa, false);
        let err = LegacyValidator::with_fs(&ctx, Unreadable).validate().unwrap_err();
        assert!(matches!(err, PreflightError::Analysis { .. }));
    }

    #[test]
    fn test_auto_fix_on_disk_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/index.template.html"), GOOD_INDEX).unwrap();
        std::fs::write(root.join("src/App.vue"), GOOD_APP).unwrap();
        std::fs::write(root.join(".babelrc"), OLD_BABELRC).unwrap();

        let ctx = BuildContext { project_root: root.to_path_buf(), ..Default::default() };

        let first = LegacyValidator::new(&ctx).validate().unwrap();
        assert_eq!(first.auto_fixed().count(), 1);
        assert_eq!(std::fs::read_to_string(root.join(".babelrc")).unwrap(), BUNDLED_BABELRC);

        let second = LegacyValidator::new(&ctx).validate().unwrap();
        assert!(!second.has_violations());
        assert_eq!(second.status, ValidationStatus::Passed);
    }

    #[test]
    fn test_latin1_index_template_still_reports_markers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(
            root.join("src/index.template.html"),
            b"<html>\n<head><title>caf\xe9</title>\n<base href=\"/\">\n</head>\n</html>\n",
        )
        .unwrap();

        let ctx = BuildContext { project_root: root.to_path_buf(), ..Default::default() };
        let report = LegacyValidator::new(&ctx).validate().unwrap();

        assert_eq!(
            report.status,
            ValidationStatus::Halted { rule_id: "index_base_href".to_string() }
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.files_read, vec![root.join("src/index.template.html")]);
    }

    #[test]
    fn test_custom_template_used_for_fix() {
        let temp_dir = TempDir::new().unwrap();
        let template = temp_dir.path().join("babelrc");
        std::fs::write(&template, "{ \"custom\": true }").unwrap();

        let spy = SpyFs::project();
        spy.put(".babelrc", OLD_BABELRC);
        let ctx = BuildContext { babelrc_template: Some(template), ..context(BuildMode::Spa, false) };

        LegacyValidator::with_fs(&ctx, &spy).validate().unwrap();
        assert_eq!(spy.content(".babelrc").as_deref(), Some("{ \"custom\": true }"));
    }
}
