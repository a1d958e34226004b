use thiserror::Error;
use vx_core::NodeId;
use vx_mobility::MobilityError;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("node pool exhausted: {live} of {capacity} endpoints already checked out")]
    Exhausted { capacity: usize, live: usize },

    #[error("{0} is not a pool endpoint")]
    UnknownNode(NodeId),

    #[error("trace parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Mobility(#[from] MobilityError),
}

pub type PoolResult<T> = Result<T, PoolError>;
