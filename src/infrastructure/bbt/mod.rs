//! Infrastructure - Bad Block Table driver (component F)
//!
//! The BBT driver owns the authoritative `BadBlockTable` and knows how to
//! (re)probe it from the flash's factory bad-block markers. Probing needs
//! to read the marker bytes out of specific OOB offsets of specific
//! pages, which is a SPI-NAND core concern; the driver talks to the core
//! through `MarkerReader` rather than depending on `spi_nand` directly, so
//! the dependency runs core -> bbt, not the other way around.

pub mod ram;

use crate::domain::bad_block::{BadBlockReason, BadBlockTable, BlockState};
use crate::domain::nand::BbmConfig;
use crate::error::Result;

/// What the BBT driver needs from the SPI-NAND core to probe a block:
/// read back the marker bytes at one of the block's candidate marker
/// pages.
pub trait MarkerReader {
    /// Reads `len` bytes of OOB data at `oob_offset` from `page` (absolute
    /// page index, not offset within the block).
    fn read_oob_marker(&mut self, page: u32, oob_offset: u32, len: u32) -> Result<Vec<u8>>;
}

/// Driver for the bad block table: probes, caches and updates block
/// state against a part's `BbmConfig`.
pub trait BbtDriver {
    /// Total number of blocks covered by this table.
    fn block_count(&self) -> u32;

    /// Returns the cached state for `block`, probing it first if it has
    /// never been probed.
    fn get_state(&mut self, reader: &mut dyn MarkerReader, block: u32) -> Result<BlockState>;

    /// Forces re-probing. `full_scan` re-checks every block; otherwise
    /// only blocks still `Unknown` are probed.
    fn reprobe(&mut self, reader: &mut dyn MarkerReader, full_scan: bool) -> Result<()>;

    /// Marks `block` bad in the table (does not write the marker to
    /// flash; callers needing a persisted marker write it separately via
    /// the NAND generic layer's `markbad`).
    fn mark_bad(&mut self, block: u32, reason: BadBlockReason);

    /// A snapshot of the current table, e.g. for persisting to disk.
    fn table(&self) -> &BadBlockTable;

    fn bbm_config(&self) -> &BbmConfig;
}
