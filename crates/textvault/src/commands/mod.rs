//! CLI command implementations

pub mod backup;
pub mod collect;
pub mod process;
pub mod restore;
pub mod run;
pub mod seed;
pub mod validate;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use textvault_backup::ArchiveManager;
use textvault_core::{ActivityLog, DataLayout, Error, ProjectConfig, SchemaValidator};

/// Everything a command needs: resolved configuration, the data layout,
/// the activity log and a validator bound to that log.
pub struct Context {
    pub config: ProjectConfig,
    pub layout: DataLayout,
    pub log: ActivityLog,
    pub validator: SchemaValidator,
}

impl Context {
    /// Load configuration without touching the data layout.
    ///
    /// Without `--config`, a missing `textvault.yaml` falls back to defaults
    /// rooted at the current directory. The activity log is only written
    /// when the logs directory already exists.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (config, validator) = resolve_config(config_path)?;
        Self::from_config(config, validator, false)
    }

    /// Load configuration and make sure the data layout exists.
    pub fn load_writable(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (config, validator) = resolve_config(config_path)?;
        Self::from_config(config, validator, true)
    }

    pub fn from_config(
        config: ProjectConfig,
        validator: SchemaValidator,
        create_layout: bool,
    ) -> Result<Self> {
        let layout = DataLayout::new(absolute(&config.root())?);
        if create_layout {
            layout
                .ensure()
                .with_context(|| format!("Failed to create data layout under {}", layout.root()))?;
        }

        let log = if layout.logs_dir().is_dir() {
            ActivityLog::new(layout.log_file())
        } else {
            ActivityLog::disabled()
        };
        let validator = validator.with_log(log.clone());

        Ok(Self {
            config,
            layout,
            log,
            validator,
        })
    }

    /// Archive manager for the backups directory with the configured level and collision policy.
    pub fn archive_manager(&self) -> ArchiveManager {
        ArchiveManager::new(self.layout.backups_dir(), self.log.clone())
            .with_compression_level(self.config.compression_level())
            .with_collision(self.config.collision())
    }
}

fn resolve_config(config_path: Option<&Utf8Path>) -> Result<(ProjectConfig, SchemaValidator)> {
    let validator = SchemaValidator::new().context("Failed to load embedded schemas")?;

    let config = match ProjectConfig::load_and_validate(config_path, &validator) {
        Ok(config) => config,
        Err(Error::ConfigNotFound { .. }) if config_path.is_none() => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let cwd = Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")?;
            tracing::debug!("No textvault.yaml found, using defaults in {}", cwd);
            ProjectConfig::default_in(cwd)
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    Ok((config, validator))
}

/// `path` made absolute against the current directory, without touching the file system.
pub fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let path = std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path))?;
    Utf8PathBuf::try_from(path).context("Path is not valid UTF-8")
}
