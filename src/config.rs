//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::LayoutModel;
use crate::model::ResolutionMode;

/// File name of the layouts used when no layout set is chosen
pub const DEFAULT_LAYOUT_FILE: &str = "layouts.json";

/// Settings shared by one application's evaluations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// How unresolved data paths are reported
    pub resolution_mode: ResolutionMode,
    /// Layout set to load; the default layouts when unset
    pub layout_set: Option<String>,
    /// Never expand a repeating group into more rows than its `maxCount`
    pub clamp_to_max_count: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            resolution_mode: ResolutionMode::Lenient,
            layout_set: None,
            clamp_to_max_count: true,
        }
    }
}

impl RuntimeConfig {
    /// Default configuration in strict mode
    pub fn strict() -> Self {
        Self {
            resolution_mode: ResolutionMode::Strict,
            ..Self::default()
        }
    }

    /// Use another resolution mode
    pub fn with_resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.resolution_mode = mode;
        self
    }

    /// Use a layout set
    pub fn with_layout_set(mut self, layout_set: impl Into<String>) -> Self {
        self.layout_set = Some(layout_set.into());
        self
    }

    /// Parse a JSON configuration; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::io(path.display().to_string(), err))?;
        serde_json::from_reader(BufReader::new(file)).map_err(Error::Config)
    }

    /// File name of the configured layout set
    pub fn layout_file_name(&self) -> String {
        match &self.layout_set {
            Some(set) => format!("{set}.json"),
            None => DEFAULT_LAYOUT_FILE.to_string(),
        }
    }

    /// Path of the configured layout set inside a layout directory
    pub fn layout_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.layout_file_name())
    }

    /// Load the configured layout set from a layout directory
    pub fn load_layout(&self, dir: impl AsRef<Path>) -> Result<LayoutModel> {
        let path = self.layout_path(dir);
        log::debug!("loading layouts from {}", path.display());
        let file = File::open(&path).map_err(|err| Error::io(path.display().to_string(), err))?;
        Ok(LayoutModel::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.resolution_mode, ResolutionMode::Lenient);
        assert!(config.clamp_to_max_count);
        assert_eq!(config.layout_file_name(), "layouts.json");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            RuntimeConfig::from_json_str(r#"{"resolutionMode": "strict", "layoutSet": "form"}"#)
                .unwrap();
        assert_eq!(config, RuntimeConfig::strict().with_layout_set("form"));
        assert_eq!(config.layout_path("/app/ui"), PathBuf::from("/app/ui/form.json"));

        assert!(matches!(
            RuntimeConfig::from_json_str(r#"{"resolutionMode": "loose"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_layout_file() {
        let err = RuntimeConfig::default()
            .load_layout("/definitely/not/a/layout/dir")
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
