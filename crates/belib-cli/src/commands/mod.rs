//! Subcommand handlers.
//!
//! Each module handles one subcommand. `main.rs` parses arguments into a
//! [`CommandContext`] plus the subcommand's `Args` struct and dispatches here.

use std::path::PathBuf;

use anyhow::{Context, Result};

use belib_lib::{
    resolve_dataset_path, AdresseClient, OsrmClient, ServiceConfig, StationDataset,
};

use crate::output::OutputFormat;

pub mod decode;
pub mod districts;
pub mod locate;
pub mod nearest;
pub mod route;
pub mod stations;
pub mod stats;

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// `--dataset` override (file or directory).
    pub dataset: Option<PathBuf>,
    /// `--config` JSON file.
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Resolve and load the station dataset.
    pub fn load_dataset(&self) -> Result<StationDataset> {
        let path = resolve_dataset_path(self.dataset.as_deref()).context(
            "failed to locate the station dataset; pass --dataset or set BELIB_DATASET_PATH",
        )?;
        StationDataset::from_path(&path)
            .with_context(|| format!("failed to load stations from {}", path.display()))
    }

    /// Service configuration: file (if any), then environment overrides.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let config = match &self.config {
            Some(path) => {
                let mut config = ServiceConfig::from_path(path)
                    .with_context(|| format!("failed to read configuration {}", path.display()))?;
                config.apply_env()?;
                config
            }
            None => ServiceConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn geocoder(&self, config: &ServiceConfig) -> Result<AdresseClient> {
        Ok(AdresseClient::new(&config.geocoder)?)
    }

    pub fn router(&self, config: &ServiceConfig) -> Result<OsrmClient> {
        Ok(OsrmClient::new(&config.router)?)
    }
}
