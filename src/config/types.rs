// configuration type definitions

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// command line interface definition
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dirserve", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "serve a directory tree with browsable, paginated listings")]
pub struct Cli {
    /// directory to serve
    pub public_dir: Option<PathBuf>,

    /// host to listen on
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// max items to show on each listing page
    #[arg(short = 'm', long)]
    pub items_per_page: Option<usize>,

    /// default view mode for listings
    #[arg(long, visible_alias = "vm", value_enum)]
    pub view_mode: Option<ViewMode>,

    /// number of items per row in preview mode
    #[arg(long, visible_alias = "ipr")]
    pub items_per_row: Option<usize>,

    /// image and video width in preview mode, in pixels
    #[arg(long, visible_alias = "iw")]
    pub image_width: Option<u32>,

    /// disable multipart uploads into listed directories
    #[arg(long)]
    pub no_upload: bool,

    /// append logs to this file instead of stderr
    #[arg(short = 'l', long = "log")]
    pub log_file: Option<PathBuf>,

    /// config file to use
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// complete application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub listing: ListingConfig,
    pub upload: UploadConfig,
}

/// server configuration section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
    #[serde(default = "default_true")]
    pub enable_upload: bool,
    /// decode `+` in request paths as a space
    #[serde(default)]
    pub plus_as_space: bool,
    /// write `404.html` into the served root at startup
    #[serde(default = "default_true")]
    pub write_404_page: bool,
}

/// directory listing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default = "default_items_per_row")]
    pub items_per_row: usize,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    /// sort entries case-insensitively by name; when off, directory order is kept
    #[serde(default = "default_true")]
    pub sort_case_insensitive: bool,
}

/// file upload configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UploadConfig {
    /// request body limit in bytes, unlimited when unset
    #[serde(default)]
    pub max_request_size: Option<u64>,
}

/// listing presentation
#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Preview,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Preview => "preview",
        }
    }

    /// the other member of the fixed {list, preview} set
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Preview,
            ViewMode::Preview => ViewMode::List,
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "preview" => Ok(ViewMode::Preview),
            _ => Err(format!("Invalid view mode: {s}")),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8899,
            public_dir: PathBuf::from("."),
            enable_upload: true,
            plus_as_space: false,
            write_404_page: true,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            view_mode: ViewMode::default(),
            items_per_row: default_items_per_row(),
            image_width: default_image_width(),
            sort_case_insensitive: true,
        }
    }
}

// default value functions for serde
fn default_items_per_page() -> usize {
    50
}

fn default_items_per_row() -> usize {
    4
}

fn default_image_width() -> u32 {
    256
}

fn default_true() -> bool {
    true
}
