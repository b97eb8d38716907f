//! TOML settings files describing a CatGt run.
//!
//! ```toml
//! executable = "CatGt"
//! dir = "/data/run1"
//! run = "g0"
//! gate = 0
//! trigger = 0
//!
//! [options]
//! ap = true
//! prb_fld = 1
//! xa = [0, 100, 200]
//!
//! [paths]
//! dest = "processed"
//! ```
//!
//! Option order inside `[options]` is kept. Relative paths (`dir` and everything
//! under `[paths]`) resolve against the directory containing the file.

use crate::config::CommandConfigBuilder;
use crate::error::{BuildError, Result};
use crate::value::OptionValue;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed contents of a settings file. Every field may be overridden later.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub executable: Option<String>,
    pub dir: Option<PathBuf>,
    pub run: Option<String>,
    pub gate: Option<u32>,
    pub trigger: Option<u32>,
    #[serde(default)]
    pub options: toml::Table,
    #[serde(default)]
    pub paths: toml::Table,
    /// Directory relative paths resolve against; set by [`Settings::load`].
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Settings {
    /// Read and parse the settings file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| BuildError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut settings = Self::parse(&text).map_err(|e| match e {
            BuildError::Settings { message, .. } => BuildError::Settings {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let origin = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    BuildError::invalid_path(dir, format!("can't read current directory: {}", e))
                })?
                .join(dir)
        };
        debug!(file = %path.display(), origin = %origin.display(), "loaded settings");
        settings.origin = Some(origin);
        Ok(settings)
    }

    /// Parse settings from TOML text. Relative paths will resolve against the
    /// current working directory unless [`origin`](Self::origin) is set.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BuildError::Settings {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Apply these settings on top of `builder`.
    ///
    /// Fields present in the file replace the builder's values; options are
    /// appended (or replace same-named ones) in file order, `[options]` first.
    pub fn apply(&self, mut builder: CommandConfigBuilder) -> Result<CommandConfigBuilder> {
        if let Some(origin) = &self.origin {
            builder = builder.resolve_from(origin);
        }
        if let Some(dir) = &self.dir {
            builder = builder.base_path(dir);
        }
        if let Some(run) = &self.run {
            builder = builder.run_name(run);
        }
        if let Some(gate) = self.gate {
            builder = builder.gate(gate);
        }
        if let Some(trigger) = self.trigger {
            builder = builder.trigger(trigger);
        }
        for (name, value) in &self.options {
            builder = builder.option(name, OptionValue::from_toml(name, value)?);
        }
        for (name, value) in &self.paths {
            let path = value.as_str().ok_or_else(|| {
                BuildError::unsupported(name, format!("{} where a path was expected", value.type_str()))
            })?;
            builder = builder.path_option(name, path);
        }
        Ok(builder)
    }

    /// Build a builder from the file alone. `dir` and `run` must be present.
    pub fn into_builder(self) -> Result<CommandConfigBuilder> {
        let builder = CommandConfigBuilder::new(PathBuf::new(), String::new());
        self.apply(builder)
    }
}
