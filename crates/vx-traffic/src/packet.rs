//! Packets and the sequence + timestamp header.

use std::net::Ipv4Addr;

use vx_core::SimTime;

/// Sequence number and send timestamp carried at the front of a payload.
///
/// Wire format, big-endian:
///
/// ```text
/// 0       4               12
/// +-------+---------------+
/// |  seq  |     ts_ns     |
/// +-------+---------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqTsHeader {
    pub seq: u32,
    pub ts:  SimTime,
}

impl SeqTsHeader {
    /// Encoded length in bytes.
    pub const SIZE: usize = 12;

    /// Write the header into the first 12 bytes of `buf`.
    ///
    /// Returns `false` (leaving `buf` untouched) if `buf` is too short.
    pub fn write(&self, buf: &mut [u8]) -> bool {
        let Some(dst) = buf.get_mut(..Self::SIZE) else {
            return false;
        };
        dst[..4].copy_from_slice(&self.seq.to_be_bytes());
        dst[4..].copy_from_slice(&self.ts.as_nanos().to_be_bytes());
        true
    }

    /// Parse a header from the front of `payload`; `None` if too short.
    pub fn read(payload: &[u8]) -> Option<SeqTsHeader> {
        let bytes: &[u8; Self::SIZE] = payload.get(..Self::SIZE)?.try_into().ok()?;
        let mut seq = [0u8; 4];
        let mut ts = [0u8; 8];
        seq.copy_from_slice(&bytes[..4]);
        ts.copy_from_slice(&bytes[4..]);
        Some(SeqTsHeader {
            seq: u32::from_be_bytes(seq),
            ts:  SimTime::from_nanos(u64::from_be_bytes(ts)),
        })
    }
}

/// An application datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub src:     Ipv4Addr,
    pub dst:     Ipv4Addr,
    pub payload: Vec<u8>,
}

impl Packet {
    /// A zero-filled packet of `size` bytes with no header.
    pub fn new(src: Ipv4Addr, dst: Ipv4Addr, size: u32) -> Self {
        Self { src, dst, payload: vec![0; size as usize] }
    }

    /// A packet of `size` bytes stamped with `header`.
    ///
    /// Payloads shorter than the header stay unstamped.
    pub fn stamped(src: Ipv4Addr, dst: Ipv4Addr, size: u32, header: SeqTsHeader) -> Self {
        let mut packet = Self::new(src, dst, size);
        header.write(&mut packet.payload);
        packet
    }

    /// Payload size in bytes.
    #[inline]
    pub fn size(&self) -> u32 {
        self.payload.len() as u32
    }

    pub fn header(&self) -> Option<SeqTsHeader> {
        SeqTsHeader::read(&self.payload)
    }
}
