// configuration loading and merging logic

use anyhow::{Context, Result};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::types::{AppConfig, Cli, ViewMode};
use crate::utils::paths::ensure_resolved_root;

/// load and merge configuration from multiple sources
/// precedence: defaults < config file < cli arguments
pub fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    debug!("loading configuration with cli args: {:?}", cli);

    // start with default configuration
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    // merge config file if provided
    if let Some(config_path) = &cli.config_file {
        if config_path.exists() {
            info!("loading config file: {}", config_path.display());
            figment = figment.merge(Toml::file(config_path));
        } else {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
    }

    // merge cli overrides - highest precedence, only for flags actually given
    figment = figment.merge(Serialized::defaults(CliOverrides::from(cli)));

    // extract final configuration
    let config: AppConfig = figment.extract().context("failed to parse configuration")?;

    let config = validate_configuration(config)?;

    debug!("final configuration: {:?}", config);
    Ok(config)
}

#[derive(Debug, Serialize)]
struct CliOverrides {
    server: ServerOverrides,
    listing: ListingOverrides,
}

#[derive(Debug, Serialize)]
struct ServerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_upload: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ListingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    items_per_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view_mode: Option<ViewMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items_per_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_width: Option<u32>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            server: ServerOverrides {
                host: cli.host.clone(),
                port: cli.port,
                public_dir: cli.public_dir.clone(),
                enable_upload: cli.no_upload.then_some(false),
            },
            listing: ListingOverrides {
                items_per_page: cli.items_per_page,
                view_mode: cli.view_mode,
                items_per_row: cli.items_per_row,
                image_width: cli.image_width,
            },
        }
    }
}

/// validate configuration and resolve the served root to an absolute path
fn validate_configuration(mut config: AppConfig) -> Result<AppConfig> {
    let public_dir = &config.server.public_dir;

    if !public_dir.exists() {
        anyhow::bail!("public directory does not exist: {}", public_dir.display());
    }

    if !public_dir.is_dir() {
        anyhow::bail!(
            "public directory is not a directory: {}",
            public_dir.display()
        );
    }

    let canonical = public_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve public directory: {}", public_dir.display()))?;
    ensure_resolved_root(&canonical)
        .with_context(|| format!("unusable public directory: {}", canonical.display()))?;
    config.server.public_dir = canonical;

    if config.server.port == 0 {
        anyhow::bail!("port cannot be 0");
    }

    if config.listing.items_per_page == 0 {
        anyhow::bail!("items per page must be at least 1");
    }

    if config.listing.items_per_row == 0 {
        anyhow::bail!("items per row must be at least 1");
    }

    if config.listing.image_width == 0 {
        anyhow::bail!("image width must be at least 1");
    }

    Ok(config)
}
