//! One-way delay extraction.

use tracing::warn;
use vx_core::SimTime;

use crate::SeqTsHeader;

/// One-way delay in nanoseconds of a payload received at `now`.
///
/// `None` when the payload carries no header or its timestamp is zero.  A
/// timestamp later than `now` is corrupt; it is logged and also yields
/// `None`.  The payload is only borrowed.
pub fn extract_delay(payload: &[u8], now: SimTime) -> Option<u64> {
    let header = SeqTsHeader::read(payload)?;
    if header.ts.is_zero() {
        return None;
    }
    match now.checked_since(header.ts) {
        Some(delay) => Some(delay.as_nanos()),
        None => {
            warn!(seq = header.seq, ts = %header.ts, now = %now, "packet timestamp is in the future");
            None
        }
    }
}
