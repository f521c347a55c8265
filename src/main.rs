//! Quasar Preflight CLI - banners and legacy checks around Quasar builds
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Owns the external concerns: process exit codes, terminal colors, logging setup
//! - The validator only reports; this layer turns a halted report into exit status 1

use clap::{Args, Parser, Subcommand, ValueEnum};
use quasar_preflight::report::{paint, severity_style};
use quasar_preflight::rules::{find_rule, legacy_rules};
use quasar_preflight::{
    BuildDetails, BuildMode, Command, ConfigBuilder, OutputFormat, Preflight, PreflightConfig,
    PreflightResult, ReportOptions,
};
use std::path::PathBuf;
use std::process;

/// Quasar Preflight - legacy checks and build banners
#[derive(Parser)]
#[command(name = "quasar-preflight")]
#[command(version)]
#[command(about = "Build banners and legacy-pattern validation for Quasar CLI projects")]
#[command(long_about = "Quasar Preflight checks a Quasar project for patterns the current CLI no longer supports, prints remediation guidance, and formats the status banners shown around dev and build runs.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the project for legacy patterns
    Check {
        #[command(flatten)]
        context: ContextArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Hide example and migration snippets
        #[arg(long)]
        no_guidance: bool,
    },

    /// Print the build status banner
    Banner {
        #[command(flatten)]
        context: ContextArgs,

        /// Command the banner describes
        #[arg(long, value_enum, default_value = "build")]
        command: CommandArg,

        /// Output folder of a finished build; adds the post-build section
        #[arg(long)]
        output_folder: Option<PathBuf>,
    },

    /// Print the dev-server compilation summary
    DevSummary {
        #[command(flatten)]
        context: ContextArgs,

        /// URL the app is served on
        #[arg(long)]
        url: String,
    },

    /// List the legacy rules
    Rules,

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

/// Build context overrides shared by several commands
#[derive(Args, Clone, Default)]
struct ContextArgs {
    /// Build mode
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Theme name
    #[arg(short, long)]
    theme: Option<String>,

    /// PWA takeover (with ssr mode)
    #[arg(long)]
    pwa: bool,

    /// The project uses a Vuex store
    #[arg(long)]
    store: bool,

    /// Debug build
    #[arg(short, long)]
    debug: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ModeArg {
    Spa,
    Pwa,
    Ssr,
    Cordova,
    Electron,
}

impl From<ModeArg> for BuildMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Spa => BuildMode::Spa,
            ModeArg::Pwa => BuildMode::Pwa,
            ModeArg::Ssr => BuildMode::Ssr,
            ModeArg::Cordova => BuildMode::Cordova,
            ModeArg::Electron => BuildMode::Electron,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CommandArg {
    Dev,
    Build,
}

impl From<CommandArg> for Command {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Dev => Command::Dev,
            CommandArg::Build => Command::Build,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    #[cfg(feature = "colors")]
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run_command(cli) {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> PreflightResult<i32> {
    let use_colors = !cli.no_color;
    match cli.command {
        Commands::Check { context, format, no_guidance } => {
            let config = load_config(cli.config, cli.project, &context)?;
            run_check(config, format, no_guidance, use_colors)
        }
        Commands::Banner { context, command, output_folder } => {
            let config = load_config(cli.config, cli.project, &context)?;
            run_banner(config, command.into(), output_folder, use_colors)
        }
        Commands::DevSummary { context, url } => {
            let config = load_config(cli.config, cli.project, &context)?;
            run_dev_summary(config, &url, use_colors)
        }
        Commands::Rules => run_list_rules(use_colors),
        Commands::Explain { rule_id } => run_explain(&rule_id),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

/// Config file (explicit or discovered in the project root) plus command-line overrides
fn load_config(
    config_path: Option<PathBuf>,
    project: Option<PathBuf>,
    overrides: &ContextArgs,
) -> PreflightResult<PreflightConfig> {
    let root = project.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = match config_path {
        Some(path) => PreflightConfig::load_from_file(path)?,
        None => PreflightConfig::discover(&root)?.unwrap_or_default(),
    };

    let ctx = &config.context;
    let (pwa, store, debug) =
        (ctx.pwa || overrides.pwa, ctx.store || overrides.store, ctx.debug || overrides.debug);

    let mut builder = ConfigBuilder::from_config(config).pwa(pwa).store(store).debug(debug);
    if let Some(project) = project {
        builder = builder.project_root(project);
    }
    if let Some(mode) = overrides.mode {
        builder = builder.mode(mode.into());
    }
    if let Some(theme) = &overrides.theme {
        builder = builder.theme(theme.clone());
    }

    let config = builder.build()?;
    tracing::debug!("Build context {}: {:?}", config.fingerprint(), config.context);
    Ok(config)
}

fn run_check(
    config: PreflightConfig,
    format: OutputFormatArg,
    no_guidance: bool,
    use_colors: bool,
) -> PreflightResult<i32> {
    let preflight = Preflight::new_with_config(config)?.with_report_options(ReportOptions {
        use_colors: use_colors && format == OutputFormatArg::Human,
        show_guidance: !no_guidance,
        ..Default::default()
    });

    let report = preflight.validate()?;
    let formatted = preflight.format_report(&report, format.into())?;
    println!("{}", formatted);

    Ok(report.exit_code())
}

fn run_banner(
    config: PreflightConfig,
    command: Command,
    output_folder: Option<PathBuf>,
    use_colors: bool,
) -> PreflightResult<i32> {
    let preflight = Preflight::new_with_config(config)?
        .with_report_options(ReportOptions { use_colors, ..Default::default() });

    let details = output_folder.map(|output_folder| BuildDetails { output_folder });
    preflight.banner().print(command, details.as_ref());
    Ok(0)
}

fn run_dev_summary(config: PreflightConfig, url: &str, use_colors: bool) -> PreflightResult<i32> {
    let preflight = Preflight::new_with_config(config)?
        .with_report_options(ReportOptions { use_colors, ..Default::default() });

    println!("{}", preflight.banner().dev_compilation_success(url));
    Ok(0)
}

fn run_list_rules(use_colors: bool) -> PreflightResult<i32> {
    println!("📋 Legacy Rules\n");

    for (position, rule) in legacy_rules().iter().enumerate() {
        let severity = rule.action.severity();
        println!(
            "  {:>2}. {} [{}] {} - {}, {}",
            position + 1,
            rule.id,
            paint(severity.as_str(), severity_style(severity), use_colors),
            rule.target.as_str(),
            rule.action.as_str(),
            rule.condition.as_str()
        );
    }

    Ok(0)
}

fn run_explain(rule_id: &str) -> PreflightResult<i32> {
    let Some(rule) = find_rule(rule_id) else {
        eprintln!("❌ Rule '{}' not found", rule_id);
        println!();
        println!("Available rules:");
        for rule in legacy_rules() {
            println!("    - {}", rule.id);
        }
        return Ok(1);
    };

    println!("📖 Rule: {}", rule.id);
    println!("📂 Target: {}", rule.target.as_str());
    println!("⚠️ Severity: {}", rule.action.severity().as_str());
    println!("🔁 Action: {}", rule.action.as_str());
    println!("✅ Applies: {}", rule.condition.as_str());
    if let Some(marker) = rule.check.marker() {
        println!();
        println!("🔎 Marker:");
        println!("   {}", marker);
    }
    println!();
    println!("📝 Message:");
    for line in rule.message.lines() {
        println!("   {}", line.trim_start());
    }

    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> PreflightResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("quasar-preflight.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match PreflightConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let ctx = &config.context;
            println!("📊 Configuration summary:");
            println!("  Mode: {} (theme {})", ctx.mode_label(), ctx.theme);
            println!("  Store: {}", if ctx.store { "yes" } else { "no" });
            println!("  Index template: {}", ctx.source_files.index_html_template.display());
            println!("  Root component: {}", ctx.source_files.root_component.display());
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e);
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
