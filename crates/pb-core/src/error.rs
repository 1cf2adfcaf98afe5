use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    /// A placeholder value is not a string, number or boolean.
    #[error("Invalid value for placeholder '{key}': non-scalar values (such as {actual_type}) are not supported")]
    InvalidValue { key: String, actual_type: String },
    /// A placeholder key would produce an ambiguous `@key@` token.
    #[error("Invalid placeholder key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    /// A compactor failed while transforming a file.
    #[error("Compactor '{compactor}' (position {position}) failed on '{file}': {source}")]
    Transform {
        compactor: String,
        position: usize,
        file: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Archive sink error: {0}")]
    Sink(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Key named by a placeholder configuration error, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { key, .. } | Self::InvalidKey { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    /// File named by a transform error, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Transform { file, .. } => Some(file.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
