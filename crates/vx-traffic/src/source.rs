//! ON/OFF constant-bit-rate source.
//!
//! While ON, packets leave at the configured data rate; while OFF, nothing
//! is sent.  The ON period is constant and the OFF period is drawn from an
//! exponential distribution.  The first period after `start` is an OFF
//! period.  When an ON period ends in the middle of a packet interval, the
//! bits already "earned" carry over and shorten the first interval of the
//! next ON period.

use std::net::Ipv4Addr;

use rand::Rng;
use rand_distr::Exp;
use vx_core::{NodeRng, SimTime};

use crate::{Packet, SeqTsHeader, TrafficError, TrafficResult};

/// Source parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnOffConfig {
    /// Payload size in bytes, header included.
    pub packet_size:   u32,
    /// Constant rate while ON, bit/s.
    pub data_rate_bps: f64,
    /// Constant ON period.
    pub on_time:       SimTime,
    /// Mean of the exponential OFF period.  Zero means no OFF period.
    pub off_mean:      SimTime,
    /// Stamp a `SeqTsHeader` into every packet.
    pub stamp_header:  bool,
}

impl Default for OnOffConfig {
    fn default() -> Self {
        Self {
            packet_size:   512,
            data_rate_bps: 100e6,
            on_time:       SimTime::from_millis(100),
            off_mean:      SimTime::from_millis(100),
            stamp_header:  true,
        }
    }
}

impl OnOffConfig {
    pub fn validate(&self) -> TrafficResult<()> {
        if self.packet_size == 0 {
            return Err(TrafficError::Config("packet size must be nonzero".into()));
        }
        if !(self.data_rate_bps.is_finite() && self.data_rate_bps > 0.0) {
            return Err(TrafficError::Config(format!(
                "data rate must be positive, got {} bit/s",
                self.data_rate_bps
            )));
        }
        if self.on_time.is_zero() {
            return Err(TrafficError::Config("on period must be nonzero".into()));
        }
        Ok(())
    }
}

/// The source's internal timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTimer {
    /// End of an OFF period.
    StartSending,
    /// End of an ON period.
    StopSending,
    /// Next packet is due.
    SendPacket,
}

/// A request from the source to the simulation loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceAction {
    /// Call [`OnOffSource::on_timer`] with `timer` and `epoch` after `after`.
    Schedule {
        after: SimTime,
        timer: SourceTimer,
        epoch: u64,
    },
    /// Hand `packet` to the link; this is the Tx observation point.
    Transmit(Packet),
}

/// An ON/OFF application bound to one local and one remote address.
#[derive(Debug)]
pub struct OnOffSource {
    config:        OnOffConfig,
    local:         Ipv4Addr,
    remote:        Ipv4Addr,
    off:           Option<Exp<f64>>,
    rng:           NodeRng,
    running:       bool,
    sending:       bool,
    epoch:         u64,
    residual_bits: u64,
    last_start:    SimTime,
    seq:           u32,
    packets_sent:  u64,
    bytes_sent:    u64,
}

impl OnOffSource {
    pub fn new(config: OnOffConfig, local: Ipv4Addr, remote: Ipv4Addr, rng: NodeRng) -> TrafficResult<Self> {
        config.validate()?;
        let off = if config.off_mean.is_zero() {
            None
        } else {
            let rate = 1.0 / config.off_mean.as_secs_f64();
            Some(Exp::new(rate).map_err(|e| TrafficError::Config(format!("off period: {e}")))?)
        };
        Ok(Self {
            config,
            local,
            remote,
            off,
            rng,
            running:       false,
            sending:       false,
            epoch:         0,
            residual_bits: 0,
            last_start:    SimTime::ZERO,
            seq:           0,
            packets_sent:  0,
            bytes_sent:    0,
        })
    }

    pub fn config(&self) -> &OnOffConfig {
        &self.config
    }

    pub fn local(&self) -> Ipv4Addr {
        self.local
    }

    pub fn remote(&self) -> Ipv4Addr {
        self.remote
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Start the application.  A no-op if already running.
    pub fn start(&mut self, _now: SimTime) -> Vec<SourceAction> {
        if self.running {
            return vec![];
        }
        self.running = true;
        self.epoch += 1;
        vec![self.schedule_start()]
    }

    /// Stop the application; every outstanding timer becomes stale.
    pub fn stop(&mut self, now: SimTime) {
        if !self.running {
            return;
        }
        self.cancel(now);
        self.running = false;
    }

    /// Handle a timer previously requested through [`SourceAction::Schedule`].
    ///
    /// Stale timers (wrong epoch, or the source is stopped) are ignored.
    pub fn on_timer(&mut self, now: SimTime, timer: SourceTimer, epoch: u64) -> Vec<SourceAction> {
        if !self.running || epoch != self.epoch {
            return vec![];
        }
        match timer {
            SourceTimer::StartSending => {
                self.last_start = now;
                self.sending = true;
                vec![
                    self.schedule_next_tx(),
                    SourceAction::Schedule {
                        after: self.config.on_time,
                        timer: SourceTimer::StopSending,
                        epoch: self.epoch,
                    },
                ]
            }
            SourceTimer::SendPacket => {
                let packet = self.next_packet(now);
                self.last_start = now;
                self.residual_bits = 0;
                vec![SourceAction::Transmit(packet), self.schedule_next_tx()]
            }
            SourceTimer::StopSending => {
                self.cancel(now);
                vec![self.schedule_start()]
            }
        }
    }

    /// Invalidate outstanding timers, keeping the bits earned since the
    /// last send.
    fn cancel(&mut self, now: SimTime) {
        if self.sending {
            let elapsed_ns = now.saturating_sub(self.last_start).as_nanos() as f64;
            self.residual_bits += (elapsed_ns * self.config.data_rate_bps / 1e9) as u64;
        }
        self.sending = false;
        self.epoch += 1;
    }

    fn schedule_start(&mut self) -> SourceAction {
        let off = match &self.off {
            Some(exp) => SimTime::from_secs_f64(self.rng.inner().sample(exp)),
            None => SimTime::ZERO,
        };
        SourceAction::Schedule { after: off, timer: SourceTimer::StartSending, epoch: self.epoch }
    }

    fn schedule_next_tx(&self) -> SourceAction {
        let bits = (u64::from(self.config.packet_size) * 8).saturating_sub(self.residual_bits);
        let after = SimTime::from_secs_f64(bits as f64 / self.config.data_rate_bps);
        SourceAction::Schedule { after, timer: SourceTimer::SendPacket, epoch: self.epoch }
    }

    fn next_packet(&mut self, now: SimTime) -> Packet {
        let size = self.config.packet_size;
        let packet = if self.config.stamp_header {
            Packet::stamped(self.local, self.remote, size, SeqTsHeader { seq: self.seq, ts: now })
        } else {
            Packet::new(self.local, self.remote, size)
        };
        self.seq = self.seq.wrapping_add(1);
        self.packets_sent += 1;
        self.bytes_sent += u64::from(size);
        packet
    }
}
