//! Status banners printed around dev and build runs
//!
//! Architecture: Presentation Layer - Banners are pure formatting over the build context
//! - Version strings arrive through ToolInfo, never from global state
//! - Rendering returns a String; printing is a thin wrapper around it

use crate::config::{BuildContext, BuildMode, ToolInfo};
use crate::report::{paint, Style};
use std::fmt;
use std::path::PathBuf;

/// CLI command the banner describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    Dev,
    #[default]
    Build,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information only known after a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDetails {
    pub output_folder: PathBuf,
}

const SSR_TIP: &str = r#" Tip: The output folder must be yarn/npm installed before using it,
      except when it is run inside your already yarn/npm installed project folder.

 Tip: Notice the package.json generated, where there's a script defined:
        "start": "node index.js"
      Running "$ yarn start" or "$ npm run start" from the output folder will
      start the webserver. Alternatively you can call "$ node index.js"
      yourself."#;

const CORDOVA_TIP: &str = r#" Tip: "src-cordova" is a Cordova project folder, so everything you know
      about Cordova applies to it. Quasar CLI only generates the content
      for "src-cordova/www" folder and then Cordova takes over and builds
      the mobile app.

 Tip: Feel free to use Cordova CLI or change any files in "src-cordova",
      except for "www" folder which must be built by Quasar CLI."#;

const WEB_TIP: &str = r#" Tip: Built files are meant to be served over an HTTP server
      Opening index.html over file:// won't work

 Tip: You can use "$ quasar serve" command to create a web server,
      both for testing or production. Type "$ quasar serve -h" for
      parameters. Also, an npm script (usually named "start") can
      be added for deployment environments.
      If you're using Vue Router "history" mode, don't forget to
      specify the "--history" parameter: "$ quasar serve --history""#;

/// Post-build tip for a mode, if it has one
pub fn mode_tip(mode: BuildMode) -> Option<&'static str> {
    match mode {
        BuildMode::Ssr => Some(SSR_TIP),
        BuildMode::Cordova => Some(CORDOVA_TIP),
        BuildMode::Spa | BuildMode::Pwa => Some(WEB_TIP),
        BuildMode::Electron => None,
    }
}

/// Formats status banners for one invocation
#[derive(Debug, Clone)]
pub struct Banner<'a> {
    ctx: &'a BuildContext,
    tool: &'a ToolInfo,
    use_colors: bool,
}

impl<'a> Banner<'a> {
    pub fn new(ctx: &'a BuildContext, tool: &'a ToolInfo) -> Self {
        Self { ctx, tool, use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn green(&self, text: &str) -> String {
        paint(text, Style::Green, self.use_colors)
    }

    /// Primary banner; `details` adds the output folder and a mode tip
    pub fn render(&self, command: Command, details: Option<&BuildDetails>) -> String {
        let mut banner = String::new();

        if details.is_some() {
            banner.push_str(&format!(
                "\n {}\n",
                paint("Build succeeded", Style::Underline, self.use_colors)
            ));
        }

        let mode_heading = match command {
            Command::Dev => "Dev mode..........",
            Command::Build => "Build mode........",
        };
        let debugging = if command == Command::Dev || self.ctx.debug {
            self.green("enabled")
        } else {
            paint("no", Style::Grey, self.use_colors)
        };

        banner.push_str(&format!("\n {} {}", mode_heading, self.green(self.ctx.mode.as_str())));
        banner.push_str(&format!("\n Quasar theme...... {}", self.green(&self.ctx.theme)));
        banner.push_str(&format!(
            "\n Quasar CLI........ {}",
            self.green(&format!("v{}", self.tool.cli_version))
        ));
        if let Some(framework) = &self.tool.framework_version {
            banner.push_str(&format!(
                "\n Quasar Framework.. {}",
                self.green(&format!("v{framework}"))
            ));
        }
        banner.push_str(&format!("\n Debugging......... {debugging}"));

        if let Some(details) = details {
            banner.push_str("\n ==================");
            banner.push_str(&format!(
                "\n Output folder..... {}",
                self.green(&details.output_folder.display().to_string())
            ));

            if let Some(tip) = mode_tip(self.ctx.mode) {
                banner.push_str("\n\n");
                banner.push_str(tip);
            }
        }

        banner.push('\n');
        banner
    }

    /// Write the primary banner to stdout
    pub fn print(&self, command: Command, details: Option<&BuildDetails>) {
        println!("{}", self.render(command, details));
    }

    /// Compact summary shown once the dev server has compiled
    pub fn dev_compilation_success(&self, url: &str) -> String {
        let mut summary = format!(
            "App URL........... {}\n    Dev mode.......... {}\n    Quasar theme...... {}\n    Quasar CLI........ {}\n",
            self.green(url),
            self.green(&self.ctx.mode_label()),
            self.green(&self.ctx.theme),
            self.green(&format!("v{}", self.tool.cli_version)),
        );
        if let Some(framework) = &self.tool.framework_version {
            summary.push_str(&format!(
                "    Quasar Framework.. {}\n",
                self.green(&format!("v{framework}"))
            ));
        }
        summary
    }
}
