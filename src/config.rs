use crate::error::{ExtractorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "MULE_PREVIEW_EXTRACTOR_CONFIG";

const DEFAULT_CONFIG_PATHS: [&str; 2] = [
    "mule-preview-extractor.toml",
    ".mule-preview-extractor.toml",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub plugin_markers: Vec<String>,
    pub image_extensions: Vec<String>,
    pub descriptor_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub preserve_structure: bool,
    pub overwrite: bool,
    pub widget_types_file: String,
    pub mappings_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub light_theme_pattern: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            plugin_markers: vec![
                "plugin.xml".to_string(),
                "META-INF/MANIFEST.MF".to_string(),
            ],
            image_extensions: vec![
                "png".to_string(),
                "gif".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "svg".to_string(),
                "ico".to_string(),
            ],
            descriptor_extensions: vec!["xml".to_string()],
            exclude_dirs: vec![
                ".git".to_string(),
                ".metadata".to_string(),
                "configuration".to_string(),
                "p2".to_string(),
                "jre".to_string(),
            ],
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preserve_structure: true,
            overwrite: true,
            widget_types_file: "widget-types.json".to_string(),
            mappings_file: "mappings.json".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light_theme_pattern: r"(?i)theme[._-]?light|light[._-]?theme".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractorError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractorError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExtractorError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `config_path` when given, otherwise from the first default
    /// location that exists, otherwise fall back to defaults.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in &DEFAULT_CONFIG_PATHS {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Load using the path from [`CONFIG_ENV_VAR`] if it is set, then validate.
    pub fn load_from_env() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let config = Self::load_with_defaults(explicit.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(ExtractorError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        if self.scan.plugin_markers.is_empty() {
            return Err(ExtractorError::Config {
                message: "At least one plugin marker must be specified".to_string(),
            });
        }

        if self.scan.image_extensions.is_empty() {
            return Err(ExtractorError::Config {
                message: "At least one image extension must be specified".to_string(),
            });
        }

        if self.scan.descriptor_extensions.is_empty() {
            return Err(ExtractorError::Config {
                message: "At least one descriptor extension must be specified".to_string(),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            Regex::new(pattern)?;
        }
        Regex::new(&self.theme.light_theme_pattern)?;

        validate_file_name("widget_types_file", &self.output.widget_types_file)?;
        validate_file_name("mappings_file", &self.output.mappings_file)?;

        Ok(())
    }
}

fn validate_file_name(field: &str, name: &str) -> Result<()> {
    let is_bare = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";

    if is_bare {
        Ok(())
    } else {
        Err(ExtractorError::Config {
            message: format!("{} must be a plain file name, got {:?}", field, name),
        })
    }
}
