use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("traffic configuration error: {0}")]
    Config(String),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
