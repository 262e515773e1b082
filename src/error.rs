use std::path::PathBuf;

/// Everything that can stop a run before or outside of probing.
///
/// Unreachable hosts are not errors; they travel as [`crate::http_probe::result::Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Invalid proxy URL: {0}")]
    InvalidArgument(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Empty host entry in the {0} list")]
    EmptyHost(&'static str),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
