//! Configuration loading and management for Quasar Preflight
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML and JSON formats
//! - Raw YAML structures are converted to an immutable BuildContext
//! - Version strings from the packaged manifest become an explicit ToolInfo value
//! - Defaults mirror the stock Quasar project layout

use crate::domain::violations::{PreflightError, PreflightResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names looked up in the project root, in order
pub const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["quasar-preflight.yaml", "quasar-preflight.yml", ".quasar-preflight.yaml"];

/// Main configuration structure for Quasar Preflight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightConfig {
    /// Configuration format version
    pub version: String,
    /// The build invocation being described
    #[serde(default)]
    pub context: BuildContext,
    /// Where to find version information
    #[serde(default)]
    pub tool: ToolSettings,
}

/// Build target requested from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Spa,
    Pwa,
    Ssr,
    Cordova,
    Electron,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spa => "spa",
            Self::Pwa => "pwa",
            Self::Ssr => "ssr",
            Self::Cordova => "cordova",
            Self::Electron => "electron",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project source files checked by the legacy validator, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub index_html_template: PathBuf,
    pub root_component: PathBuf,
    pub router: PathBuf,
    pub store: PathBuf,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            index_html_template: PathBuf::from("src/index.template.html"),
            root_component: PathBuf::from("src/App.vue"),
            router: PathBuf::from("src/router/index.js"),
            store: PathBuf::from("src/store/index.js"),
        }
    }
}

/// Immutable description of the current CLI invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildContext {
    /// Build target
    pub mode: BuildMode,
    /// PWA takeover flag, combined with SSR mode
    pub pwa: bool,
    /// Theme name (mat, ios)
    pub theme: String,
    /// Whether a debug build was requested
    pub debug: bool,
    /// Whether the project declares a Vuex store
    pub store: bool,
    /// Directory every relative source path is resolved against
    pub project_root: PathBuf,
    /// Files the legacy validator reads
    pub source_files: SourceFiles,
    /// Replacement for the bundled .babelrc template
    pub babelrc_template: Option<PathBuf>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            pwa: false,
            theme: "mat".to_string(),
            debug: false,
            store: false,
            project_root: PathBuf::from("."),
            source_files: SourceFiles::default(),
            babelrc_template: None,
        }
    }
}

impl BuildContext {
    pub fn is_ssr(&self) -> bool {
        self.mode == BuildMode::Ssr
    }

    /// PWA is active for pwa mode, and for ssr mode with the pwa flag
    pub fn is_pwa(&self) -> bool {
        match self.mode {
            BuildMode::Pwa => true,
            BuildMode::Ssr => self.pwa,
            _ => false,
        }
    }

    /// Mode name as shown by the dev server, e.g. "ssr + pwa"
    pub fn mode_label(&self) -> String {
        if self.is_ssr() && self.is_pwa() {
            format!("{} + pwa", self.mode)
        } else {
            self.mode.to_string()
        }
    }

    /// Resolve a project-relative path against the project root
    pub fn resolve<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.project_root.join(relative)
        }
    }

    pub fn babelrc_path(&self) -> PathBuf {
        self.resolve(".babelrc")
    }
}

/// Where version information comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// A package.json whose `version` and `dependencies.quasar-framework` are reported
    pub manifest: Option<PathBuf>,
    /// Framework version used when no manifest is configured
    pub framework_version: Option<String>,
}

/// Process-wide version strings, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub cli_version: String,
    /// `None` when neither the manifest nor the config names a framework version
    pub framework_version: Option<String>,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            cli_version: env!("CARGO_PKG_VERSION").to_string(),
            framework_version: None,
        }
    }
}

#[derive(Deserialize)]
struct PackageManifest {
    version: Option<String>,
    #[serde(default)]
    dependencies: std::collections::HashMap<String, String>,
}

impl ToolInfo {
    /// Read versions from a package.json manifest
    pub fn from_manifest<P: AsRef<Path>>(path: P) -> PreflightResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PreflightError::manifest(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let manifest: PackageManifest = serde_json::from_str(&contents).map_err(|e| {
            PreflightError::manifest(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        Ok(Self {
            cli_version: manifest.version.unwrap_or_else(|| Self::default().cli_version),
            framework_version: manifest.dependencies.get("quasar-framework").cloned(),
        })
    }

    /// Resolve versions according to the tool settings
    pub fn resolve(settings: &ToolSettings) -> PreflightResult<Self> {
        if let Some(manifest) = &settings.manifest {
            return Self::from_manifest(manifest);
        }

        Ok(Self { framework_version: settings.framework_version.clone(), ..Self::default() })
    }
}

impl PreflightConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PreflightResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            PreflightError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            PreflightError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> PreflightResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| PreflightError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Look for one of the default config files under `root`
    pub fn discover<P: AsRef<Path>>(root: P) -> PreflightResult<Option<Self>> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = root.as_ref().join(name);
            if candidate.exists() {
                tracing::debug!("Loading configuration from {}", candidate.display());
                return Self::load_from_file(candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> PreflightResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(PreflightError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        if self.context.theme.trim().is_empty() {
            return Err(PreflightError::config("Theme name must not be empty"));
        }

        let files = &self.context.source_files;
        for (name, path) in [
            ("index_html_template", &files.index_html_template),
            ("root_component", &files.root_component),
            ("router", &files.router),
            ("store", &files.store),
        ] {
            if path.as_os_str().is_empty() {
                return Err(PreflightError::config(format!(
                    "Source file '{name}' must not be empty"
                )));
            }
        }

        if self.context.pwa && !matches!(self.context.mode, BuildMode::Ssr | BuildMode::Pwa) {
            tracing::warn!("pwa flag has no effect in {} mode", self.context.mode);
        }

        Ok(())
    }

    /// Create a fingerprint of the configuration, stable across runs with the same inputs
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);

        let ctx = &self.context;
        ctx.mode.hash(&mut hasher);
        ctx.pwa.hash(&mut hasher);
        ctx.theme.hash(&mut hasher);
        ctx.debug.hash(&mut hasher);
        ctx.store.hash(&mut hasher);
        ctx.project_root.hash(&mut hasher);
        ctx.babelrc_template.hash(&mut hasher);

        let files = &ctx.source_files;
        files.index_html_template.hash(&mut hasher);
        files.root_component.hash(&mut hasher);
        files.router.hash(&mut hasher);
        files.store.hash(&mut hasher);

        self.tool.manifest.hash(&mut hasher);
        self.tool.framework_version.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            context: BuildContext::default(),
            tool: ToolSettings::default(),
        }
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: PreflightConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: PreflightConfig::default() }
    }

    /// Start from a loaded configuration, e.g. to apply command-line overrides
    pub fn from_config(config: PreflightConfig) -> Self {
        Self { config }
    }

    pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.context.project_root = root.into();
        self
    }

    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.config.context.mode = mode;
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.config.context.theme = theme.into();
        self
    }

    pub fn pwa(mut self, pwa: bool) -> Self {
        self.config.context.pwa = pwa;
        self
    }

    pub fn store(mut self, store: bool) -> Self {
        self.config.context.store = store;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.context.debug = debug;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> PreflightResult<PreflightConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
