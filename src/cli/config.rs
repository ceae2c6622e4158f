use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::render::render_model::RenderOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "termium",
    version,
    about = "Keyboard-driven web browser for the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level for the log file (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: termium.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSONL trace of every navigation and interaction to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse interactively
    Browse {
        /// URL to open first (default: start_url from config)
        url: Option<String>,
    },

    /// Load a page once and print its text rendering
    Render {
        /// URL to load through the browser session
        #[arg(long, conflicts_with = "tree", required_unless_present = "tree")]
        url: Option<String>,

        /// JSON document tree to render instead of a live page
        #[arg(long)]
        tree: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `termium.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_start_url")]
    pub start_url: String,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            browser: BrowserConfig::default(),
            render: RenderConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// How the browser session subprocess is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Extra wait after loads and actions, for scripts to settle
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: default_script(),
            headless: true,
            settle_ms: default_settle_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    #[serde(default = "default_rule_width")]
    pub rule_width: usize,

    #[serde(default = "default_image_max_width")]
    pub image_max_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            rule_width: default_rule_width(),
            image_max_width: default_image_max_width(),
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            indent_width: self.indent_width,
            rule_width: self.rule_width,
            image_max_width: self.image_max_width,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: String,

    pub trace: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            trace: None,
        }
    }
}

// Serde default helpers
fn default_start_url() -> String { "https://google.com".to_string() }
fn default_node() -> String { "node".to_string() }
fn default_script() -> String { "node/browser_server.js".to_string() }
fn default_true() -> bool { true }
fn default_settle_ms() -> u64 { 500 }
fn default_indent_width() -> usize { 2 }
fn default_rule_width() -> usize { 80 }
fn default_image_max_width() -> usize { 50 }
fn default_log_file() -> String { "termium.log".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("termium.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// The trace file to use: CLI flag first, then config.
pub fn resolve_trace_path<'a>(cli_trace: Option<&'a str>, config: &'a AppConfig) -> Option<&'a str> {
    cli_trace.or(config.log.trace.as_deref())
}
