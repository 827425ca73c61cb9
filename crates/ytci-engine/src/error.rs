use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown timezone identifier: {0}")]
    UnknownTimezone(String),
}
