//! `vx-channel` — channel model and periodic channel sampling.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`config`]   | `Scenario`, `ChannelCondition`, `WeatherParams`, `ChannelConfig` |
//! | [`pathloss`] | 3GPP TR 37.885 V2V path loss, LOS probability, shadowing sigma   |
//! | [`weather`]  | rain specific attenuation and the rain/wet-snow factor           |
//! | [`model`]    | `PropagationModel` trait, `VehicularPropagationModel`            |
//! | [`sampler`]  | `ChannelSampler` — the self-rescheduling measurement task        |
//! | [`error`]    | `ChannelError`, `ChannelResult<T>`                               |
//!
//! Path loss never feeds back into packet delivery; it is purely observed.

pub mod config;
pub mod error;
pub mod model;
pub mod pathloss;
pub mod sampler;
pub mod weather;

#[cfg(test)]
mod tests;

pub use config::{ChannelCondition, ChannelConfig, Scenario, WeatherParams};
pub use error::{ChannelError, ChannelResult};
pub use model::{PropagationModel, VehicularPropagationModel};
pub use sampler::{ChannelSampler, SamplerConfig};
