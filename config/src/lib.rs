//! Configuration loading for Kiln.
//!
//! The config file is TOML and lives at `~/.kiln/config.toml` unless
//! `KILN_CONFIG` points elsewhere:
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [pipelines.slug]
//! stages = [
//!   { op = "trim" },
//!   { op = "lowercase" },
//!   { op = "collapse_whitespace", replacement = "_" },
//!   { op = "truncate", max = 20 },
//! ]
//! ```
//!
//! String values in stages may reference environment variables as `${NAME}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use kiln_types::{Pipeline, PipelineBuilder};
use kiln_utils::TextError;
use kiln_utils::text;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "KILN_CONFIG";

/// Name of the pipeline that exists even without a config file.
pub const BUILTIN_SLUG: &str = "slug";

#[derive(Debug, Default, Deserialize)]
pub struct KilnConfig {
    pub log: Option<LogConfig>,
    #[serde(default)]
    pub pipelines: BTreeMap<String, PipelineConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"debug"` or `"kiln_types=trace"`.
    /// `RUST_LOG` takes precedence when set.
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

fn default_replacement() -> String {
    "_".to_string()
}

/// One configured stage, selected by its `op` key.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StageConfig {
    Trim,
    Lowercase,
    Uppercase,
    CollapseWhitespace {
        #[serde(default = "default_replacement")]
        replacement: String,
    },
    Truncate {
        max: usize,
    },
    Prefix {
        value: String,
    },
    Suffix {
        value: String,
    },
    Replace {
        pattern: String,
        #[serde(default)]
        with: String,
    },
}

impl StageConfig {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::CollapseWhitespace { .. } => "collapse_whitespace",
            Self::Truncate { .. } => "truncate",
            Self::Prefix { .. } => "prefix",
            Self::Suffix { .. } => "suffix",
            Self::Replace { .. } => "replace",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown pipeline '{name}'")]
    UnknownPipeline { name: String },
    #[error("pipeline '{pipeline}' stage {index} ({stage}) is invalid")]
    InvalidStage {
        pipeline: String,
        index: usize,
        stage: &'static str,
        #[source]
        source: TextError,
    },
}

impl ConfigError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::UnknownPipeline { .. } | ConfigError::InvalidStage { .. } => None,
        }
    }
}

/// Replace `${NAME}` with the value of the environment variable `NAME`.
///
/// Unset variables expand to the empty string. An unclosed `${` is kept as-is.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl KilnConfig {
    /// Load from [`config_path`]. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load from an explicit path. A missing file is a [`ConfigError::Read`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(
                    path = %path.display(),
                    pipelines = config.pipelines.len(),
                    "Config loaded"
                );
                Ok(config)
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|log| log.level.as_deref())
    }

    /// Configured pipeline names plus the built-in slug pipeline, sorted.
    pub fn pipeline_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        if !self.pipelines.contains_key(BUILTIN_SLUG) {
            names.push(BUILTIN_SLUG);
            names.sort_unstable();
        }
        names
    }

    /// Assemble the named pipeline.
    ///
    /// A configured pipeline named `slug` replaces the built-in one.
    pub fn pipeline(&self, name: &str) -> Result<Pipeline<String>, ConfigError> {
        match self.pipelines.get(name) {
            Some(config) => build_pipeline(name, config),
            None if name == BUILTIN_SLUG => Ok(text::slug_pipeline()),
            None => Err(ConfigError::UnknownPipeline {
                name: name.to_string(),
            }),
        }
    }
}

/// Build a `Pipeline<String>` from its configuration.
pub fn build_pipeline(
    name: &str,
    config: &PipelineConfig,
) -> Result<Pipeline<String>, ConfigError> {
    let mut builder = PipelineBuilder::new();

    for (index, stage) in config.stages.iter().enumerate() {
        let label = stage.name();
        match stage {
            StageConfig::Trim => builder.add_named(label, text::trim),
            StageConfig::Lowercase => builder.add_named(label, text::lowercase),
            StageConfig::Uppercase => builder.add_named(label, text::uppercase),
            StageConfig::CollapseWhitespace { replacement } => {
                builder.add_named(label, text::collapse_whitespace(expand_env_vars(replacement)))
            }
            StageConfig::Truncate { max } => builder.add_named(label, text::truncate(*max)),
            StageConfig::Prefix { value } => {
                builder.add_named(label, text::prefix(expand_env_vars(value)))
            }
            StageConfig::Suffix { value } => {
                builder.add_named(label, text::suffix(expand_env_vars(value)))
            }
            StageConfig::Replace { pattern, with } => {
                let stage = text::replace(pattern, expand_env_vars(with)).map_err(|source| {
                    ConfigError::InvalidStage {
                        pipeline: name.to_string(),
                        index,
                        stage: label,
                        source,
                    }
                })?;
                builder.add_named(label, stage)
            }
        };
    }

    tracing::debug!(pipeline = name, stages = builder.len(), "Pipeline built");
    Ok(builder.build())
}

/// `$KILN_CONFIG` if set, otherwise `~/.kiln/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".kiln").join("config.toml"))
}
