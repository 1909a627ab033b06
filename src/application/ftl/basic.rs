//! Block-skipping basic FTL: translates logical block addresses to
//! physical ones by skipping blocks the BBT marks bad, and wraps
//! erase/program with a retry-then-torture-then-markbad policy.

use crate::domain::bad_block::{BadBlockReason, BlockState};
use crate::error::{Error, Result};
use crate::infrastructure::bbt::BbtDriver;
use crate::infrastructure::nand::generic::{torture_block, TortureOutcome};
use crate::infrastructure::nand::NandAccess;

/// Behavioral flags for `BasicFtl`.
#[allow(non_snake_case)]
pub mod BasicFtlFlags {
    /// Skip the BBT lookup entirely: every block is assumed good. Useful
    /// for raw/manufacturing access where the caller wants the physical
    /// address space untranslated.
    pub const DONT_CHECK_BAD: u32 = 1 << 0;
}

/// A minimal flash translation layer over a block-skipping address
/// space.
pub struct BasicFtl {
    retry_count: u8,
    flags: u32,
}

impl BasicFtl {
    pub fn new(retry_count: u8, flags: u32) -> Self {
        Self { retry_count: retry_count.max(1), flags }
    }

    fn skip_bad_check(&self) -> bool {
        self.flags & BasicFtlFlags::DONT_CHECK_BAD == 0
    }

    /// Maps a logical block index onto the physical block index that is
    /// the `logical_block`'th good block, scanning from physical block 0.
    pub fn translate_block(
        &self,
        bbt: &mut dyn BbtDriver,
        access: &mut dyn NandAccess,
        logical_block: u32,
    ) -> Result<u32> {
        if !self.skip_bad_check() {
            return Ok(logical_block);
        }

        let mut remaining = logical_block;
        let mut physical = 0u32;
        loop {
            if physical >= bbt.block_count() {
                return Err(Error::FlashAddressOutOfRange {
                    address: logical_block as u64,
                    capacity: bbt.block_count() as u64,
                });
            }
            let state = bbt.get_state(access, physical)?;
            if state != BlockState::Bad {
                if remaining == 0 {
                    return Ok(physical);
                }
                remaining -= 1;
            }
            physical += 1;
        }
    }

    /// Erases the logical block, retrying on failure. If every retry
    /// fails, the block is torture-tested; a failed torture test marks
    /// it bad in the BBT so future translations skip it. The original
    /// erase error is always returned to the caller on final failure.
    ///
    /// `spread`: when true (the default block-skipping behavior),
    /// `logical_block` is translated through the BBT as usual. When
    /// false, the physical block is used directly, bypassing skip logic
    /// (raw/manufacturing access, matching `BadBlockStrategy::Include`).
    pub fn erase(
        &self,
        bbt: &mut dyn BbtDriver,
        access: &mut dyn NandAccess,
        logical_block: u32,
        spread: bool,
    ) -> Result<()> {
        let physical = if spread {
            self.translate_block(bbt, access, logical_block)?
        } else {
            logical_block
        };
        self.erase_physical_with_retry(bbt, access, physical)
    }

    fn erase_physical_with_retry(
        &self,
        bbt: &mut dyn BbtDriver,
        access: &mut dyn NandAccess,
        physical: u32,
    ) -> Result<()> {
        let mut last_err = None;
        for _ in 0..self.retry_count {
            match access.erase_block(physical) {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }

        // Every retry failed: torture-test the block before giving up,
        // so a genuinely worn-out block doesn't keep getting reused.
        if torture_block(access, physical)? == TortureOutcome::Fail {
            bbt.mark_bad(physical, BadBlockReason::Runtime);
        }
        Err(last_err.unwrap_or(Error::FlashEraseFailed { block: physical }))
    }

    /// Runs `program` (a page program closure) with the same
    /// retry-then-torture-then-markbad policy used by `erase`. The
    /// block containing the failing operation is what gets marked bad.
    pub fn with_retry<F>(
        &self,
        bbt: &mut dyn BbtDriver,
        access: &mut dyn NandAccess,
        block: u32,
        mut program: F,
    ) -> Result<()>
    where
        F: FnMut(&mut dyn NandAccess) -> Result<()>,
    {
        let mut last_err = None;
        for _ in 0..self.retry_count {
            match program(access) {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }
        if torture_block(access, block)? == TortureOutcome::Fail {
            bbt.mark_bad(block, BadBlockReason::Runtime);
        }
        Err(last_err.unwrap_or(Error::FlashProgramFailed { address: 0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nand::BbmConfig;
    use crate::infrastructure::bbt::{BbtDriver, MarkerReader};
    use crate::infrastructure::bbt::ram::RamBbtDriver;
    use std::cell::RefCell;

    struct FakeAccess {
        page_size: u32,
        oob_size: u32,
        pages_per_block: u32,
        memory: RefCell<Vec<u8>>,
        erase_fail_blocks: Vec<u32>,
    }

    impl FakeAccess {
        fn new(pages_per_block: u32, blocks: u32) -> Self {
            let page_size = 2048;
            let oob_size = 64;
            let raw_len = (page_size + oob_size) as usize;
            Self {
                page_size,
                oob_size,
                pages_per_block,
                memory: RefCell::new(vec![0xFFu8; raw_len * pages_per_block as usize * blocks as usize]),
                erase_fail_blocks: vec![],
            }
        }

        fn raw_len(&self) -> usize {
            (self.page_size + self.oob_size) as usize
        }
    }

    impl MarkerReader for FakeAccess {
        fn read_oob_marker(&mut self, page: u32, oob_offset: u32, len: u32) -> Result<Vec<u8>> {
            let raw_len = self.raw_len();
            let mem = self.memory.borrow();
            let base = page as usize * raw_len + self.page_size as usize + oob_offset as usize;
            Ok(mem[base..base + len as usize].to_vec())
        }
    }

    impl NandAccess for FakeAccess {
        fn page_size(&self) -> u32 {
            self.page_size
        }
        fn oob_size(&self) -> u32 {
            self.oob_size
        }
        fn pages_per_block(&self) -> u32 {
            self.pages_per_block
        }
        fn read_page_raw(&mut self, page: u32, buf: &mut [u8]) -> Result<()> {
            let raw_len = self.raw_len();
            let mem = self.memory.borrow();
            let base = page as usize * raw_len;
            buf.copy_from_slice(&mem[base..base + raw_len]);
            Ok(())
        }
        fn program_page_raw(&mut self, page: u32, buf: &[u8]) -> Result<()> {
            let raw_len = self.raw_len();
            let mut mem = self.memory.borrow_mut();
            let base = page as usize * raw_len;
            mem[base..base + raw_len].copy_from_slice(buf);
            Ok(())
        }
        fn erase_block(&mut self, block: u32) -> Result<()> {
            if self.erase_fail_blocks.contains(&block) {
                return Err(Error::FlashEraseFailed { block });
            }
            let raw_len = self.raw_len();
            let mut mem = self.memory.borrow_mut();
            let base = block as usize * self.pages_per_block as usize * raw_len;
            let len = self.pages_per_block as usize * raw_len;
            mem[base..base + len].fill(0xFF);
            Ok(())
        }
    }

    #[test]
    fn translate_skips_known_bad_blocks() {
        let mut access = FakeAccess::new(64, 8);
        let mut bbt = RamBbtDriver::new(8, 64, BbmConfig::first_page_only(0));
        bbt.mark_bad(1, BadBlockReason::Factory);
        let ftl = BasicFtl::new(1, 0);
        // logical 0 -> physical 0 (good)
        assert_eq!(ftl.translate_block(&mut bbt, &mut access, 0).unwrap(), 0);
        // logical 1 -> physical 2, since physical 1 is bad
        assert_eq!(ftl.translate_block(&mut bbt, &mut access, 1).unwrap(), 2);
    }

    #[test]
    fn erase_marks_block_bad_after_exhausting_retries() {
        let mut access = FakeAccess::new(64, 8);
        access.erase_fail_blocks.push(3);
        let mut bbt = RamBbtDriver::new(8, 64, BbmConfig::first_page_only(0));
        let ftl = BasicFtl::new(3, 0);
        let result = ftl.erase(&mut bbt, &mut access, 3, false);
        assert!(result.is_err());
        assert!(bbt.table().is_bad(3));
    }

    #[test]
    fn dont_check_bad_flag_bypasses_translation() {
        let mut access = FakeAccess::new(64, 8);
        let mut bbt = RamBbtDriver::new(8, 64, BbmConfig::first_page_only(0));
        bbt.mark_bad(0, BadBlockReason::Factory);
        let ftl = BasicFtl::new(1, BasicFtlFlags::DONT_CHECK_BAD);
        assert_eq!(ftl.translate_block(&mut bbt, &mut access, 0).unwrap(), 0);
    }
}
