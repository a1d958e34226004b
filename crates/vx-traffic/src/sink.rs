//! Packet sink.

use std::net::Ipv4Addr;

use crate::Packet;

/// Accepts packets addressed to `local` while started.
#[derive(Debug, Clone)]
pub struct PacketSink {
    local:   Ipv4Addr,
    active:  bool,
    packets: u64,
    bytes:   u64,
}

impl PacketSink {
    pub fn new(local: Ipv4Addr) -> Self {
        Self { local, active: false, packets: 0, bytes: 0 }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn local(&self) -> Ipv4Addr {
        self.local
    }

    /// Returns `true` if the packet was accepted (the Rx observation point).
    pub fn receive(&mut self, packet: &Packet) -> bool {
        if !self.active || packet.dst != self.local {
            return false;
        }
        self.packets += 1;
        self.bytes += u64::from(packet.size());
        true
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}
