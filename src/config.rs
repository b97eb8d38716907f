use crate::error::{BuildError, Result};
use crate::naming;
use crate::paths::Resolver;
use crate::value::OptionValue;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A fully validated description of one CatGt invocation.
///
/// Built once through [`CommandConfigBuilder`] and immutable afterwards: the data
/// directory and path options are already absolute, option names are already
/// validated, and every render is recomputed from these fields. To change a
/// config, reopen it with [`CommandConfig::to_builder`] and build a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandConfig {
    base_path: PathBuf,
    run_name: String,
    gate_index: Option<u32>,
    trigger_index: Option<u32>,
    options: Vec<NamedOption>,
}

/// An option as stored in a built config.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedOption {
    /// Name as supplied by the caller, e.g. `prb_fld`.
    pub name: String,
    /// Name in CatGt's spelling, e.g. `prb-fld`.
    pub flag: String,
    pub value: OptionValue,
}

impl CommandConfig {
    /// Start building a config for `run_name` with data under `base_path`.
    pub fn builder(base_path: impl Into<PathBuf>, run_name: impl Into<String>) -> CommandConfigBuilder {
        CommandConfigBuilder::new(base_path, run_name)
    }

    /// Absolute data directory, rendered as `-dir=`.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn gate_index(&self) -> Option<u32> {
        self.gate_index
    }

    pub fn trigger_index(&self) -> Option<u32> {
        self.trigger_index
    }

    /// Options in the order they were first supplied.
    pub fn options(&self) -> &[NamedOption] {
        &self.options
    }

    /// Look up an option by either its supplied or its flag spelling.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        let flag = naming::to_flag_name(name);
        self.options
            .iter()
            .find(|o| o.flag == flag)
            .map(|o| &o.value)
    }

    /// Reopen this config for modification.
    ///
    /// Paths are already absolute, so building the copy again leaves them as they are.
    pub fn to_builder(&self) -> CommandConfigBuilder {
        CommandConfigBuilder {
            base_path: self.base_path.clone(),
            run_name: self.run_name.clone(),
            gate_index: self.gate_index,
            trigger_index: self.trigger_index,
            options: self
                .options
                .iter()
                .map(|o| (o.name.clone(), o.value.clone()))
                .collect(),
            resolve_from: None,
            error: None,
        }
    }
}

/// Builder for [`CommandConfig`].
///
/// Setters never fail on their own; the first problem (a bad option name, an
/// unrepresentable value) is remembered and reported by [`build`](Self::build),
/// which also performs the one-time path normalization.
#[derive(Debug, Clone)]
pub struct CommandConfigBuilder {
    base_path: PathBuf,
    run_name: String,
    gate_index: Option<u32>,
    trigger_index: Option<u32>,
    options: Vec<(String, OptionValue)>,
    resolve_from: Option<PathBuf>,
    error: Option<BuildError>,
}

impl CommandConfigBuilder {
    pub fn new(base_path: impl Into<PathBuf>, run_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            run_name: run_name.into(),
            gate_index: None,
            trigger_index: None,
            options: Vec::new(),
            resolve_from: None,
            error: None,
        }
    }

    /// Replace the data directory.
    pub fn base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Replace the run name.
    pub fn run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = run_name.into();
        self
    }

    /// Gate index, rendered as `-g=`. Zero is a valid explicit value.
    pub fn gate(mut self, gate: u32) -> Self {
        self.gate_index = Some(gate);
        self
    }

    /// Trigger index, rendered as `-t=`. Zero is a valid explicit value.
    pub fn trigger(mut self, trigger: u32) -> Self {
        self.trigger_index = Some(trigger);
        self
    }

    /// Set a named option.
    ///
    /// Setting an option whose flag spelling was already set replaces its value
    /// and keeps its original position.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name.into(), value.into());
        self
    }

    /// Set a named option whose value is a filesystem path.
    ///
    /// The path is normalized to an absolute path by [`build`](Self::build).
    pub fn path_option(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.set(name.into(), OptionValue::Path(path.into()));
        self
    }

    /// Resolve relative paths against `dir` instead of the current working directory.
    pub fn resolve_from(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolve_from = Some(dir.into());
        self
    }

    fn set(&mut self, name: String, value: OptionValue) {
        if self.error.is_some() {
            return;
        }
        let flag = match naming::validate_option_name(&name) {
            Ok(flag) => flag,
            Err(e) => {
                self.error = Some(e);
                return;
            }
        };
        if let Err(e) = value.check(&name) {
            self.error = Some(e);
            return;
        }
        let existing = self
            .options
            .iter_mut()
            .find(|(n, _)| naming::to_flag_name(n) == flag);
        match existing {
            Some(slot) => slot.1 = value,
            None => self.options.push((name, value)),
        }
    }

    /// Validate the collected fields and normalize every path.
    pub fn build(self) -> Result<CommandConfig> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.base_path.as_os_str().is_empty() {
            return Err(BuildError::Configuration(
                "base path must not be empty".to_string(),
            ));
        }
        if self.run_name.is_empty() {
            return Err(BuildError::Configuration(
                "run name must not be empty".to_string(),
            ));
        }

        let resolver = match self.resolve_from {
            Some(dir) => Resolver::with_base(dir)?,
            None => Resolver::current()?,
        };
        let base_path = resolver.normalize(&self.base_path)?;

        let options = self
            .options
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    OptionValue::Path(p) => OptionValue::Path(resolver.normalize(p)?),
                    other => other,
                };
                let flag = naming::to_flag_name(&name);
                Ok(NamedOption { name, flag, value })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            dir = %base_path.display(),
            run = %self.run_name,
            options = options.len(),
            "built CatGt config"
        );

        Ok(CommandConfig {
            base_path,
            run_name: self.run_name,
            gate_index: self.gate_index,
            trigger_index: self.trigger_index,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization() {
        let config = CommandConfig::builder("/data/test", "g0").build().unwrap();
        assert_eq!(config.run_name(), "g0");
        assert!(config.base_path().ends_with("test"));
        assert_eq!(config.gate_index(), None);
        assert_eq!(config.trigger_index(), None);
        assert!(config.options().is_empty());
    }

    #[test]
    fn test_initialization_with_gate_trigger() {
        let config = CommandConfig::builder("/data/test", "g0")
            .gate(0)
            .trigger(0)
            .build()
            .unwrap();
        assert_eq!(config.gate_index(), Some(0));
        assert_eq!(config.trigger_index(), Some(0));
    }

    #[test]
    fn test_base_path_absolute_conversion() {
        let config = CommandConfig::builder("relative/path", "g0").build().unwrap();
        assert!(config.base_path().is_absolute());
        assert!(config.base_path().ends_with("relative/path"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_from_explicit_dir() {
        let config = CommandConfig::builder("relative/dir", "g0")
            .resolve_from("/srv")
            .path_option("dest", "../out")
            .build()
            .unwrap();
        assert_eq!(config.base_path(), Path::new("/srv/relative/dir"));
        assert_eq!(
            config.option("dest"),
            Some(&OptionValue::Path(PathBuf::from("/out")))
        );
    }

    #[test]
    fn test_empty_run_name_is_configuration_error() {
        let err = CommandConfig::builder("/data/test", "").build().unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)), "{:?}", err);
    }

    #[test]
    fn test_empty_base_path_is_configuration_error() {
        let err = CommandConfig::builder("", "g0").build().unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)), "{:?}", err);
    }

    #[test]
    fn test_options_keep_supply_order() {
        let config = CommandConfig::builder("/data/test", "g0")
            .option("lf", true)
            .option("ap", true)
            .option("prb", 0)
            .build()
            .unwrap();
        let names: Vec<_> = config.options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["lf", "ap", "prb"]);
    }

    #[test]
    fn test_setting_again_replaces_in_place() {
        let config = CommandConfig::builder("/data/test", "g0")
            .option("prb_fld", 1)
            .option("ap", true)
            .option("prb-fld", 2)
            .build()
            .unwrap();
        assert_eq!(config.options().len(), 2);
        assert_eq!(config.options()[0].flag, "prb-fld");
        assert_eq!(config.options()[0].value, OptionValue::Int(2));
        assert_eq!(config.option("prb_fld"), Some(&OptionValue::Int(2)));
    }

    #[test]
    fn test_reserved_option_is_rejected_at_build() {
        let err = CommandConfig::builder("/data/test", "g0")
            .option("dir", "/elsewhere")
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)), "{:?}", err);
    }

    #[test]
    fn test_non_finite_float_is_rejected_at_build() {
        let err = CommandConfig::builder("/data/test", "g0")
            .option("loccar", f64::NAN)
            .build()
            .unwrap_err();
        match err {
            BuildError::UnsupportedValueType { option, .. } => assert_eq!(option, "loccar"),
            other => panic!("expected unsupported value, got {:?}", other),
        }
    }

    #[test]
    fn test_first_error_wins() {
        let err = CommandConfig::builder("/data/test", "g0")
            .option("bad name", 1)
            .option("x", f64::INFINITY)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)), "{:?}", err);
    }

    #[test]
    #[cfg(unix)]
    fn test_parent_of_root_resolves_to_root() {
        let config = CommandConfig::builder("/../data", "g0").build().unwrap();
        assert_eq!(config.base_path(), Path::new("/data"));

        let config = CommandConfig::builder("../data", "g0")
            .resolve_from("/")
            .build()
            .unwrap();
        assert_eq!(config.render_tokens("CatGt").unwrap()[1], "-dir=/data");
    }

    #[test]
    #[cfg(unix)]
    fn test_paths_are_fixed_once_built() {
        let config = CommandConfig::builder("relative/dir", "g0")
            .resolve_from("/a")
            .path_option("dest", "out")
            .build()
            .unwrap();
        assert_eq!(config.base_path(), Path::new("/a/relative/dir"));

        let rebuilt = config.to_builder().resolve_from("/b").build().unwrap();
        assert_eq!(rebuilt.base_path(), Path::new("/a/relative/dir"));
        assert_eq!(
            rebuilt.option("dest"),
            Some(&OptionValue::Path(PathBuf::from("/a/out")))
        );
        assert_eq!(
            rebuilt.render_tokens("CatGt").unwrap(),
            config.render_tokens("CatGt").unwrap()
        );
    }

    #[test]
    fn test_to_builder_round_trip() {
        let config = CommandConfig::builder("relative/dir", "g0")
            .gate(1)
            .option("ap", true)
            .build()
            .unwrap();
        let rebuilt = config.to_builder().build().unwrap();
        assert_eq!(rebuilt, config);

        let changed = config.to_builder().option("lf", true).build().unwrap();
        assert_eq!(changed.options().len(), 2);
        assert_eq!(config.options().len(), 1);
    }
}
