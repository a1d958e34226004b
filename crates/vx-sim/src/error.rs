use thiserror::Error;
use vx_channel::ChannelError;
use vx_mobility::MobilityError;
use vx_output::OutputError;
use vx_pool::PoolError;
use vx_traffic::TrafficError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("no propagation model attached to the sampled channel")]
    MissingModel,

    #[error("node pool: {0}")]
    Pool(#[from] PoolError),

    #[error("channel: {0}")]
    Channel(#[from] ChannelError),

    #[error("traffic: {0}")]
    Traffic(#[from] TrafficError),

    #[error("output: {0}")]
    Output(#[from] OutputError),

    #[error("mobility: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
