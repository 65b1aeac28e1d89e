use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not prepare output directory {path}: {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Anypoint Studio directory not found: {path}")]
    SourceNotFound { path: String },

    #[error("No Mule plugins found under {path}")]
    NoPluginsFound { path: String },

    #[error("No light theme plugin found under {path}")]
    LightThemeNotFound { path: String, pattern: String },

    #[error("Destination file already exists: {path}")]
    DestinationExists { path: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractorError {
    fn user_message(&self) -> String {
        match self {
            ExtractorError::OutputDirectory { path, source } => {
                format!("Could not create output directory {}: {}", path, source)
            }
            ExtractorError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExtractorError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            ExtractorError::SourceNotFound { path } => {
                format!("Anypoint Studio directory does not exist or is not a directory: {}", path)
            }
            ExtractorError::NoPluginsFound { path } => {
                format!("No Mule plugins were found under: {}", path)
            }
            ExtractorError::LightThemeNotFound { path, pattern } => {
                format!("No plugin matching {} was found under: {}", pattern, path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractorError::OutputDirectory { .. } => Some(
                "Ensure you have write permission for the parent directory, or choose a different path with --output.".to_string()
            ),
            ExtractorError::Config { .. } => Some(
                "Check your configuration file syntax (mule-preview-extractor.toml) or unset MULE_PREVIEW_EXTRACTOR_CONFIG.".to_string()
            ),
            ExtractorError::SourceNotFound { .. } => Some(
                "Point --anypoint-dir at the root of your Anypoint Studio installation.".to_string()
            ),
            ExtractorError::NoPluginsFound { .. } => Some(
                "Plugins are only read from unpacked directories; make sure the plugins folder is inside --anypoint-dir.".to_string()
            ),
            ExtractorError::LightThemeNotFound { .. } => Some(
                "Adjust [theme] light_theme_pattern in your configuration to match the light theme plugin directory.".to_string()
            ),
            ExtractorError::DestinationExists { .. } => Some(
                "Set [output] overwrite = true in your configuration or choose an empty --output directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<regex::Error> for ExtractorError {
    fn from(error: regex::Error) -> Self {
        ExtractorError::Config {
            message: format!("Invalid pattern: {}", error),
        }
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(error: serde_json::Error) -> Self {
        ExtractorError::Serialization {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
