//! Legacy rule definitions for Quasar projects
//!
//! Architectural Principle: Domain Knowledge - The checklist is data, the validator is behavior
//! - Each LegacyRule names the file it targets, the signature it looks for and what failure means
//! - Rules are fixed and ordered; evaluation order is table order
//! - Remediation text lives next to the signature it explains

use crate::config::BuildContext;
use crate::domain::violations::{Severity, ViolationKind};
use std::fmt;
use std::path::{Path, PathBuf};

/// Project file a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    IndexTemplate,
    RootComponent,
    Router,
    Store,
    BabelConfig,
}

impl RuleTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IndexTemplate => "index template",
            Self::RootComponent => "root component",
            Self::Router => "router",
            Self::Store => "store",
            Self::BabelConfig => ".babelrc",
        }
    }

    /// Absolute path of this target within the project
    pub fn resolve(self, ctx: &BuildContext) -> PathBuf {
        let files = &ctx.source_files;
        match self {
            Self::IndexTemplate => ctx.resolve(&files.index_html_template),
            Self::RootComponent => ctx.resolve(&files.root_component),
            Self::Router => ctx.resolve(&files.router),
            Self::Store => ctx.resolve(&files.store),
            Self::BabelConfig => ctx.babelrc_path(),
        }
    }
}

/// What a rule looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCheck {
    /// The target file must exist
    FileExists,
    /// The marker must not appear in the file
    Forbidden(&'static str),
    /// The marker must appear in the file
    Required(&'static str),
}

impl RuleCheck {
    /// Whether `content` fails this check. `FileExists` never fails on content.
    pub fn fails_on(self, content: &str) -> bool {
        match self {
            Self::FileExists => false,
            Self::Forbidden(marker) => content.contains(marker),
            Self::Required(marker) => !content.contains(marker),
        }
    }

    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::FileExists => None,
            Self::Forbidden(marker) | Self::Required(marker) => Some(marker),
        }
    }

    pub fn violation_kind(self) -> ViolationKind {
        match self {
            Self::FileExists => ViolationKind::MissingFile,
            Self::Forbidden(_) => ViolationKind::DeprecatedPatternFound,
            Self::Required(_) => ViolationKind::RequiredPatternMissing,
        }
    }
}

/// What happens when a rule fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Recorded; the run halts once the surrounding batch has finished
    Batched,
    /// Recorded; the run halts immediately
    Fatal,
    /// The target is rewritten from the bundled template and the run continues
    AutoFix,
}

impl RuleAction {
    pub fn severity(self) -> Severity {
        match self {
            Self::Batched | Self::Fatal => Severity::Error,
            Self::AutoFix => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Batched => "batched",
            Self::Fatal => "fatal",
            Self::AutoFix => "auto-fix",
        }
    }
}

/// When a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCondition {
    Always,
    /// Only when building with SSR
    SsrOnly,
    /// Only when building with SSR and the project declares a store
    SsrWithStore,
}

impl RuleCondition {
    pub fn holds(self, ctx: &BuildContext) -> bool {
        match self {
            Self::Always => true,
            Self::SsrOnly => ctx.is_ssr(),
            Self::SsrWithStore => ctx.is_ssr() && ctx.store,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::SsrOnly => "ssr mode",
            Self::SsrWithStore => "ssr mode with store",
        }
    }
}

/// A single entry of the legacy checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRule {
    pub id: &'static str,
    pub target: RuleTarget,
    pub check: RuleCheck,
    pub action: RuleAction,
    pub condition: RuleCondition,
    /// Remediation text; `{file}` expands to the resolved target path
    pub message: &'static str,
    /// Example or migration snippet printed after the message
    pub guidance: Option<&'static str>,
}

impl LegacyRule {
    pub fn applies_to(&self, ctx: &BuildContext) -> bool {
        self.condition.holds(ctx)
    }

    pub fn render_message(&self, file: &Path) -> String {
        self.message.replace("{file}", &file.display().to_string())
    }
}

impl fmt::Display for LegacyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.id,
            self.target.as_str(),
            self.action.as_str(),
            self.condition.as_str()
        )
    }
}

const INDEX_REMOVE_TAG: &str =
    "Your newer Quasar CLI requires a minor change to /src/index.template.html\n   Please remove this tag completely:";

const INDEX_REMOVE_SECTION: &str =
    "Your newer Quasar CLI requires a minor change to /src/index.template.html\n   Please remove this section completely:";

/// The fixed, ordered checklist evaluated by the legacy validator
pub static LEGACY_RULES: [LegacyRule; 11] = [
    LegacyRule {
        id: "index_template_missing",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::FileExists,
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: "Missing /src/index.template.html file...",
        guidance: None,
    },
    LegacyRule {
        id: "index_base_href",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::Forbidden("<base href"),
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: INDEX_REMOVE_TAG,
        guidance: Some(r#"  <base href="<%= htmlWebpackPlugin.options.appBase %>">"#),
    },
    LegacyRule {
        id: "index_chunk_preload",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::Forbidden("chunk.initial ? 'preload' : 'prefetch'"),
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: INDEX_REMOVE_SECTION,
        guidance: Some(
            r#"  <!--
    The following is optional if you DON'T build for PWA.
    Preloads/prefetches chunks/assets.
  -->
  <% if (!['cordova', 'electron'].includes(htmlWebpackPlugin.options.ctx.modeName) && htmlWebpackPlugin.options.ctx.prod) {
      for (var chunk of webpack.chunks) {
        for (var file of chunk.files) {
          if (file.match(/\.(js|css)$/)) { %>
    <link rel="<%= chunk.initial ? 'preload' : 'prefetch' %>" href="<%= file %>" as="<%= file.match(/\.css$/)? 'style' : 'script' %>">
  <% }}}} %>"#,
        ),
    },
    LegacyRule {
        id: "index_pwa_manifest",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::Forbidden(r#"<link rel="manifest""#),
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: INDEX_REMOVE_SECTION,
        guidance: Some(
            r#"   <% if (htmlWebpackPlugin.options.ctx.mode.pwa) { %>
    <!-- Add to home screen for Android and modern mobile browsers -->
    .....
   <% } %>"#,
        ),
    },
    LegacyRule {
        id: "index_head_scripts",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::Forbidden("htmlWebpackPlugin.options.headScripts"),
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: INDEX_REMOVE_SECTION,
        guidance: Some("   <%= htmlWebpackPlugin.options.headScripts %>"),
    },
    LegacyRule {
        id: "index_body_scripts",
        target: RuleTarget::IndexTemplate,
        check: RuleCheck::Forbidden("htmlWebpackPlugin.options.bodyScripts"),
        action: RuleAction::Batched,
        condition: RuleCondition::Always,
        message: INDEX_REMOVE_SECTION,
        guidance: Some("   <%= htmlWebpackPlugin.options.bodyScripts %>"),
    },
    LegacyRule {
        id: "root_component_app_id",
        target: RuleTarget::RootComponent,
        check: RuleCheck::Required(r#"id="q-app""#),
        action: RuleAction::Fatal,
        condition: RuleCondition::Always,
        message: "Your newer Quasar CLI requires a minor change to the root component:\n   {file}\n\n  Please add: id=\"q-app\"\n  to the outermost HTML element of the template.",
        guidance: Some(
            r#"Example:
  <template>
    <div id="q-app">
      ...
    </div>
  </template>"#,
        ),
    },
    LegacyRule {
        id: "router_default_export_function",
        target: RuleTarget::Router,
        check: RuleCheck::Required("export default function"),
        action: RuleAction::Fatal,
        condition: RuleCondition::SsrOnly,
        message: "In order to build with SSR mode you need a minor change to the ROUTER file\n   This won't break other build modes after you change it.\n\n   {file}\n\n You need to have a default export set to \"function ({ store })\" which returns a new\n instance of Router instead of default exporting the Router instance itself.",
        guidance: Some(
            r#"OLD WAY:
  import Vue from 'vue'
  import VueRouter from 'vue-router'
  import routes from './routes'
  Vue.use(VueRouter)

  // in the new way, we'll wrap the instantiation into:
  // export default function ({ store }) --> store is optional
  const Router = new VueRouter({
    scrollBehavior: () => ({ y: 0 }),
    routes,
    // Leave these as they are and change from quasar.conf.js instead!
    mode: process.env.VUE_ROUTER_MODE,
    base: process.env.VUE_ROUTER_BASE,
  })

  // in the new way, this will be no more
  export default Router

NEW WAY:
  import Vue from 'vue'
  import VueRouter from 'vue-router'
  import routes from './routes'
  Vue.use(VueRouter)

  // DO NOT import the store here as you will receive it as
  // parameter in the default exported function:

  export default function (/* { store } */) {
    // IMPORTANT! Instantiate Router inside this function

    const Router = new VueRouter({
      scrollBehavior: () => ({ y: 0 }),
      routes,
      // Leave these as they are and change from quasar.conf.js instead!
      mode: process.env.VUE_ROUTER_MODE,
      base: process.env.VUE_ROUTER_BASE,
    })

    return Router
  }"#,
        ),
    },
    LegacyRule {
        id: "store_default_export_function",
        target: RuleTarget::Store,
        check: RuleCheck::Required("export default function"),
        action: RuleAction::Fatal,
        condition: RuleCondition::SsrWithStore,
        message: "In order to build with SSR mode you need a minor change to the STORE file\n   This won't break other build modes after you change it.\n\n   {file}\n\n  You need to have a default export set to \"function ()\" which returns a new\n  instance of Vuex Store instead of default exporting the Store instance itself.",
        guidance: Some(
            r#"OLD WAY:
  import Vue from 'vue'
  import Vuex from 'vuex'
  import example from './module-example'
  Vue.use(Vuex)

  // in the new way, we'll wrap the instantiation into:
  // export default function ()
  const store = new Vuex.Store({
    modules: {
      example
    }
  })

  // in the new way, this will be no more
  export default store

NEW WAY:
  import Vue from 'vue'
  import Vuex from 'vuex'
  import example from './module-example'
  Vue.use(Vuex)

  export default function () {
    // IMPORTANT! Instantiate Store inside this function

    const Store = new Vuex.Store({
      modules: {
        example
      }
    })

    return Store
  }"#,
        ),
    },
    LegacyRule {
        id: "babelrc_missing",
        target: RuleTarget::BabelConfig,
        check: RuleCheck::FileExists,
        action: RuleAction::Fatal,
        condition: RuleCondition::Always,
        message: "Missing .babelrc file...",
        guidance: None,
    },
    LegacyRule {
        id: "babelrc_transform_runtime",
        target: RuleTarget::BabelConfig,
        check: RuleCheck::Forbidden(r#""transform-runtime""#),
        action: RuleAction::AutoFix,
        condition: RuleCondition::Always,
        message: "Your newer Quasar CLI requires a change to .babelrc file.\n Doing it automatically. Please review the changes.",
        guidance: None,
    },
];

/// All legacy rules in evaluation order
pub fn legacy_rules() -> &'static [LegacyRule] {
    &LEGACY_RULES
}

/// Find a rule by its identifier
pub fn find_rule(id: &str) -> Option<&'static LegacyRule> {
    LEGACY_RULES.iter().find(|rule| rule.id == id)
}
