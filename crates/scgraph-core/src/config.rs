//! Build configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SynthDefError};

/// Options controlling how a builder graph is compiled.
///
/// Options can be set programmatically or stored as TOML next to a project.
/// Missing keys take their defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "pad"
/// optimize = true
/// fold_common_subexpressions = true
/// use_anonymous_name = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildOptions {
    /// Run dead-UGen elimination (and folding, when enabled).
    pub optimize: bool,

    /// Merge structurally identical pure UGens. Only honored with `optimize`.
    pub fold_common_subexpressions: bool,

    /// Ignore `name` and address the SynthDef by its content hash.
    pub use_anonymous_name: bool,

    /// SynthDef name. `None` builds an anonymous SynthDef.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BuildOptions {
    /// Default options: optimized, no folding, anonymous.
    pub fn new() -> Self {
        Self {
            optimize: true,
            fold_common_subexpressions: false,
            use_anonymous_name: false,
            name: None,
        }
    }

    /// Enable or disable optimization.
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Enable or disable common-subexpression folding.
    pub fn with_fold_common_subexpressions(mut self, fold: bool) -> Self {
        self.fold_common_subexpressions = fold;
        self
    }

    /// Force the anonymous content-hash name.
    pub fn with_anonymous_name(mut self, anonymous: bool) -> Self {
        self.use_anonymous_name = anonymous;
        self
    }

    /// Set the SynthDef name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SynthDefError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save options to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SynthDefError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| SynthDefError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize options to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_options_default() {
        let options = BuildOptions::default();
        assert!(options.optimize);
        assert!(!options.fold_common_subexpressions);
        assert!(!options.use_anonymous_name);
        assert!(options.name.is_none());
    }

    #[test]
    fn test_options_builder() {
        let options = BuildOptions::new()
            .with_optimize(false)
            .with_fold_common_subexpressions(true)
            .with_anonymous_name(true)
            .with_name("pad");
        assert!(!options.optimize);
        assert!(options.fold_common_subexpressions);
        assert!(options.use_anonymous_name);
        assert_eq!(options.name.as_deref(), Some("pad"));
    }

    #[test]
    fn test_options_from_toml() {
        let toml = r#"
name = "pad"
fold_common_subexpressions = true
"#;
        let options = BuildOptions::from_toml(toml).unwrap();
        assert_eq!(options.name.as_deref(), Some("pad"));
        assert!(options.fold_common_subexpressions);
        assert!(options.optimize, "missing keys take defaults");
    }

    #[test]
    fn test_options_invalid_toml() {
        let err = BuildOptions::from_toml("optimize = \"yes\"").unwrap_err();
        assert!(matches!(err, SynthDefError::TomlParse(_)));
    }

    #[test]
    fn test_options_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("build.toml");
        let original = BuildOptions::new()
            .with_name("roundtrip")
            .with_fold_common_subexpressions(true);

        original.save(&path).unwrap();
        let loaded = BuildOptions::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_options_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = BuildOptions::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SynthDefError::ReadFile { .. }));
    }
}
