//! Flash identification bytes and the framing used to read them.
//!
//! A SPI-NAND part is identified by issuing READ_ID with one of three
//! framings and comparing the bytes that come back against each
//! candidate part's `FlashId`. Datasheets are inconsistent about how many
//! ID bytes a part actually has: some return the real ID once and then
//! zero-pad, others repeat the ID cyclically to fill the read length. We
//! normalize both cases down to the part's true ID length at construction
//! time so comparisons are exact instead of prefix-based guesswork.

use serde::{Deserialize, Serialize};

/// How READ_ID bytes are framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdFraming {
    /// One dummy byte before the ID bytes.
    Dummy,
    /// A single zero address byte before the ID bytes.
    Addr0,
    /// ID bytes immediately follow the opcode, no dummy/address.
    Direct,
}

/// Probe order used during identification (§4.4): try each framing in
/// turn, retrying a fixed number of times per framing to ride out bus
/// noise before moving on.
pub const PROBE_FRAMINGS: [IdFraming; 3] = [IdFraming::Dummy, IdFraming::Addr0, IdFraming::Direct];
pub const PROBE_RETRIES_PER_FRAMING: u32 = 3;

/// Maximum number of ID bytes any known part needs.
pub const MAX_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashId {
    pub framing: IdFraming,
    bytes: [u8; MAX_ID_LEN],
    len: u8,
}

impl FlashId {
    /// Builds a `FlashId` from the part's documented ID bytes, as listed
    /// verbatim in a datasheet or catalog entry. No normalization is
    /// applied here; `from_probe` is what normalizes raw READ_ID bytes.
    pub fn new(framing: IdFraming, id: &[u8]) -> Self {
        assert!(id.len() <= MAX_ID_LEN, "flash ID longer than {MAX_ID_LEN} bytes");
        let mut bytes = [0u8; MAX_ID_LEN];
        bytes[..id.len()].copy_from_slice(id);
        Self {
            framing,
            bytes,
            len: id.len() as u8,
        }
    }

    /// Builds a `FlashId` from raw bytes read off the bus, trimming
    /// trailing zero padding and collapsing cyclically-repeated patterns
    /// down to their shortest period.
    pub fn from_probe(framing: IdFraming, raw: &[u8]) -> Self {
        let trimmed = trim_trailing_zeros(raw);
        let period = shortest_period(trimmed);
        Self::new(framing, &trimmed[..period])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `probed` (raw, unnormalized bytes) is consistent with this
    /// ID: either an exact match, or `probed` is this ID's bytes repeated
    /// (or zero-padded) to a longer length.
    pub fn matches(&self, probed: &[u8]) -> bool {
        let want = self.as_bytes();
        if want.is_empty() || probed.len() < want.len() {
            return false;
        }
        probed.iter().enumerate().all(|(i, &b)| {
            if i < want.len() {
                b == want[i]
            } else {
                b == want[i % want.len()] || b == 0
            }
        })
    }
}

fn trim_trailing_zeros(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 1 && raw[end - 1] == 0 {
        end -= 1;
    }
    &raw[..end]
}

/// Smallest `p` such that `data[i] == data[i % p]` for every `i`.
fn shortest_period(data: &[u8]) -> usize {
    if data.is_empty() {
        return 0;
    }
    for p in 1..data.len() {
        if data.iter().enumerate().all(|(i, &b)| b == data[i % p]) {
            return p;
        }
    }
    data.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_zero_padding() {
        let id = FlashId::from_probe(IdFraming::Dummy, &[0xC8, 0xB1, 0x00, 0x00]);
        assert_eq!(id.as_bytes(), &[0xC8, 0xB1]);
    }

    #[test]
    fn collapses_repeated_pattern() {
        let id = FlashId::from_probe(IdFraming::Addr0, &[0xEF, 0xAA, 0x21, 0xEF, 0xAA, 0x21]);
        assert_eq!(id.as_bytes(), &[0xEF, 0xAA, 0x21]);
    }

    #[test]
    fn matches_against_longer_probe() {
        let id = FlashId::new(IdFraming::Dummy, &[0xC8, 0xB1]);
        assert!(id.matches(&[0xC8, 0xB1, 0x00, 0x00]));
        assert!(!id.matches(&[0xC8, 0xB2, 0x00, 0x00]));
    }
}
