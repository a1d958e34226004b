//! Error types for vx-channel.

use thiserror::Error;
use vx_core::NodeId;
use vx_mobility::MobilityError;
use vx_output::OutputError;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("sampled endpoint {0} has no mobility state")]
    UnknownEndpoint(NodeId),

    #[error("invalid channel configuration: {0}")]
    InvalidConfig(String),

    #[error("channel trace: {0}")]
    Output(#[from] OutputError),
}

impl From<MobilityError> for ChannelError {
    fn from(e: MobilityError) -> Self {
        match e {
            MobilityError::UnknownNode(node) => ChannelError::UnknownEndpoint(node),
        }
    }
}

pub type ChannelResult<T> = Result<T, ChannelError>;
