use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The source answered but nothing usable was in it.
    #[error("no trends returned by {source_tag}")]
    EmptyResult { source_tag: String },
}
