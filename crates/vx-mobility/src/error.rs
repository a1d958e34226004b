use thiserror::Error;
use vx_core::NodeId;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("{0} has no mobility state")]
    UnknownNode(NodeId),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
