//! Domain Model - Bad Block Management
//!
//! This module defines bad block handling strategies and the bad block
//! table (BBT) itself: a 2-bit-per-block state bitmap with lazy probing,
//! as described by the SPI-NAND BBT driver contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Address;

/// Information about a bad block
#[derive(Debug, Clone)]
pub struct BadBlockInfo {
    /// Block address
    pub address: Address,
    /// Reason the block is marked bad
    pub reason: BadBlockReason,
}

/// Reason a block is marked as bad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadBlockReason {
    /// Factory marked bad block
    Factory,
    /// Bad block detected during runtime (failed erase/program)
    Runtime,
    /// Bad block detected during read (uncorrectable ECC errors)
    EccFailure,
    /// Manually marked by user
    Manual,
}

/// Strategy for handling bad blocks during operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadBlockStrategy {
    /// Stop operation when a bad block is encountered
    #[default]
    Fail,
    /// Skip bad blocks and continue with the next good block
    Skip,
    /// Include bad blocks in the operation (for raw dumps)
    Include,
}

impl BadBlockStrategy {
    /// Returns true if the strategy allows continuing past bad blocks
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Skip | Self::Include)
    }

    /// Returns true if bad blocks should be included in the data
    pub fn should_include_bad(&self) -> bool {
        matches!(self, Self::Include)
    }
}

/// Per-block BBT state. Two bits are enough to represent all four states,
/// matching the on-flash/RAM bitmap the BBT driver maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockState {
    /// Never probed.
    Unknown = 0,
    /// Probed and erased (implies good, but not yet read back as data).
    Erased = 1,
    /// Probed and known good.
    Good = 2,
    /// Probed and known bad.
    Bad = 3,
}

impl BlockState {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Unknown,
            1 => Self::Erased,
            2 => Self::Good,
            _ => Self::Bad,
        }
    }

    fn to_bits(self) -> u8 {
        self as u8
    }
}

/// Bad block table: a 2-bit-per-block state bitmap plus an auxiliary map of
/// *why* a block was marked bad, for diagnostics. The bitmap is the
/// authoritative state; `reasons` is best-effort metadata used by reporting
/// tools and is not required for correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadBlockTable {
    block_count: u32,
    bits: Vec<u8>,
    reasons: BTreeMap<u32, BadBlockReason>,
}

impl BadBlockTable {
    /// Creates a new BBT with every block marked `Unknown`.
    pub fn new(block_count: u32) -> Self {
        let byte_count = (block_count as usize * 2).div_ceil(8);
        Self {
            block_count,
            bits: vec![0u8; byte_count],
            reasons: BTreeMap::new(),
        }
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    fn bit_offset(&self, block: u32) -> (usize, u32) {
        let bit_index = block as usize * 2;
        (bit_index / 8, (bit_index % 8) as u32)
    }

    /// Returns the current state of `block`, or `Unknown` if out of range.
    pub fn get_state(&self, block: u32) -> BlockState {
        if block >= self.block_count {
            return BlockState::Unknown;
        }
        let (byte, shift) = self.bit_offset(block);
        let bits = (self.bits[byte] >> shift) & 0b11;
        BlockState::from_bits(bits)
    }

    /// Sets the state of `block`. No-op if `block` is out of range.
    pub fn set_state(&mut self, block: u32, state: BlockState) {
        if block >= self.block_count {
            return;
        }
        let (byte, shift) = self.bit_offset(block);
        self.bits[byte] = (self.bits[byte] & !(0b11 << shift)) | (state.to_bits() << shift);
    }

    /// Marks `block` bad and records why.
    pub fn mark_bad(&mut self, block: u32, reason: BadBlockReason) {
        self.set_state(block, BlockState::Bad);
        self.reasons.insert(block, reason);
    }

    pub fn reason(&self, block: u32) -> Option<BadBlockReason> {
        self.reasons.get(&block).copied()
    }

    /// True if `block` is known bad.
    pub fn is_bad(&self, block: u32) -> bool {
        self.get_state(block) == BlockState::Bad
    }

    /// Number of blocks currently marked bad.
    pub fn bad_block_count(&self) -> usize {
        (0..self.block_count)
            .filter(|&b| self.get_state(b) == BlockState::Bad)
            .count()
    }

    /// Resets every block's state back to `Unknown`, forcing re-probing on
    /// next access. `reasons` metadata is left intact for history.
    pub fn reprobe(&mut self) {
        for b in &mut self.bits {
            *b = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_all_unknown() {
        let bbt = BadBlockTable::new(1024);
        assert_eq!(bbt.get_state(0), BlockState::Unknown);
        assert_eq!(bbt.get_state(1023), BlockState::Unknown);
        assert_eq!(bbt.bad_block_count(), 0);
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut bbt = BadBlockTable::new(16);
        bbt.set_state(3, BlockState::Good);
        bbt.mark_bad(7, BadBlockReason::Factory);
        bbt.set_state(15, BlockState::Erased);

        assert_eq!(bbt.get_state(3), BlockState::Good);
        assert_eq!(bbt.get_state(7), BlockState::Bad);
        assert_eq!(bbt.reason(7), Some(BadBlockReason::Factory));
        assert_eq!(bbt.get_state(15), BlockState::Erased);
        assert_eq!(bbt.get_state(0), BlockState::Unknown);
        assert_eq!(bbt.bad_block_count(), 1);
    }

    #[test]
    fn out_of_range_is_noop() {
        let mut bbt = BadBlockTable::new(4);
        bbt.set_state(100, BlockState::Bad);
        assert_eq!(bbt.get_state(100), BlockState::Unknown);
    }

    #[test]
    fn reprobe_clears_states_but_keeps_reasons() {
        let mut bbt = BadBlockTable::new(4);
        bbt.mark_bad(1, BadBlockReason::Runtime);
        bbt.reprobe();
        assert_eq!(bbt.get_state(1), BlockState::Unknown);
        assert_eq!(bbt.reason(1), Some(BadBlockReason::Runtime));
    }
}
