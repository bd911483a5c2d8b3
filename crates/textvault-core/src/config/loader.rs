//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::layout::DataLayout;
use crate::schema::SchemaValidator;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["textvault.yaml", "textvault.yml"];

/// Default data root, relative to the working directory
const DEFAULT_ROOT: &str = "project_root";

/// Default suffix marking derived files
const DEFAULT_PROCESSED_SUFFIX: &str = "_processed";

/// Default gzip level for archives
const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// What to do when an archive with today's name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `_1`, `_2`, ... to the dated name
    #[default]
    Version,
    /// Replace the existing archive
    Overwrite,
}

/// Contents of `textvault.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfigFile {
    /// Data root holding `data/`, `output/`, `backups/` and `logs/`
    pub root: String,

    /// Suffix inserted before the extension of processed files
    pub processed_suffix: String,

    /// Archive gzip level (1-9)
    pub compression_level: u32,

    /// Archive name collision policy
    pub collision: CollisionPolicy,
}

impl Default for ProjectConfigFile {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            processed_suffix: DEFAULT_PROCESSED_SUFFIX.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            collision: CollisionPolicy::default(),
        }
    }
}

/// Loaded configuration
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// The parsed configuration
    pub config: ProjectConfigFile,

    /// Path to the configuration file, if one was found
    pub config_path: Option<Utf8PathBuf>,

    /// Directory relative paths are resolved against
    pub working_dir: Utf8PathBuf,
}

impl ProjectConfig {
    /// Load configuration from the specified path or search for it
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = Self::read(path)?;
        Self::parse(config_path, &content)
    }

    /// Load and validate configuration against the `textvault` schema
    pub fn load_and_validate(path: Option<&Utf8Path>, validator: &SchemaValidator) -> Result<Self> {
        let (config_path, content) = Self::read(path)?;

        let value: serde_json::Value = serde_yaml_ng::from_str(&content)?;
        let report = validator.validate(&value, "textvault")?;
        if !report.is_valid() {
            return Err(Error::invalid_config(format!(
                "{} does not match the textvault schema:\n{}",
                config_path,
                report.diagnostic()
            )));
        }

        Self::parse(config_path, &content)
    }

    /// Defaults rooted at the current directory, used when no file exists
    pub fn default_in(working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config: ProjectConfigFile::default(),
            config_path: None,
            working_dir: working_dir.into(),
        }
    }

    fn parse(config_path: Utf8PathBuf, content: &str) -> Result<Self> {
        let working_dir = config_path
            .parent()
            .map(|p| p.to_owned())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        let mut config: ProjectConfigFile = serde_yaml_ng::from_str(content)?;
        config.compression_level = config.compression_level.clamp(1, 9);

        if config.processed_suffix.is_empty() {
            return Err(Error::invalid_config(
                "processed_suffix must not be empty; outputs would be indistinguishable from inputs",
            ));
        }

        Ok(Self {
            config,
            config_path: Some(config_path),
            working_dir,
        })
    }

    fn read(path: Option<&Utf8Path>) -> Result<(Utf8PathBuf, String)> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(p.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                Ok((p.to_owned(), content))
            }
            None => Self::find_config(),
        }
    }

    /// Find configuration file in current directory or parent directories
    fn find_config() -> Result<(Utf8PathBuf, String)> {
        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok((path, content));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(
            "textvault.yaml (searched current and parent directories)",
        ))
    }

    /// Data root, resolved against the working directory
    pub fn root(&self) -> Utf8PathBuf {
        let root = Utf8Path::new(&self.config.root);
        if root.is_absolute() {
            root.to_owned()
        } else {
            self.working_dir.join(root)
        }
    }

    /// Directory layout under the data root
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(self.root())
    }

    pub fn processed_suffix(&self) -> &str {
        &self.config.processed_suffix
    }

    pub fn compression_level(&self) -> u32 {
        self.config.compression_level
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.config.collision
    }
}
