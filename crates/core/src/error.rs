use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown framework: {0}")]
    UnknownFramework(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
