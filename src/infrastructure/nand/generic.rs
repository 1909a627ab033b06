//! Page/block arithmetic, bad-block-marker check/write, and the torture
//! test used before trusting a freshly-erased block.

use crate::domain::nand::BbmConfig;
use crate::error::{Error, Result};
use crate::infrastructure::bbt::MarkerReader;

/// Minimal raw access surface a SPI-NAND core exposes to the generic
/// NAND layer: whole-page program/read with no ECC decoding, and block
/// erase. Everything here operates on "raw" bytes (main data followed by
/// OOB) so bad-block markers and torture patterns can be written and
/// verified exactly.
pub trait NandAccess: MarkerReader {
    fn page_size(&self) -> u32;
    fn oob_size(&self) -> u32;
    fn pages_per_block(&self) -> u32;

    /// Reads `page_size() + oob_size()` raw bytes from `page`.
    fn read_page_raw(&mut self, page: u32, buf: &mut [u8]) -> Result<()>;

    /// Programs `page_size() + oob_size()` raw bytes to `page`. The page
    /// must already be erased.
    fn program_page_raw(&mut self, page: u32, buf: &[u8]) -> Result<()>;

    fn erase_block(&mut self, block: u32) -> Result<()>;
}

fn raw_page_len(access: &dyn NandAccess) -> usize {
    (access.page_size() + access.oob_size()) as usize
}

/// Checks whether `block` carries a factory bad-block marker, per
/// `bbm`'s check pages.
pub fn checkbad(access: &mut dyn NandAccess, bbm: &BbmConfig, block: u32) -> Result<bool> {
    let pages_per_block = access.pages_per_block();
    for &page_offset in &bbm.check_pages {
        let page = block * pages_per_block + page_offset;
        let marker_len = if bbm.flags.mark_whole_page { 1 } else { 2 };
        let bytes = access.read_oob_marker(page, bbm.oob_offset, marker_len)?;
        if !bytes.iter().all(|&b| b == 0xFF) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Writes the bad-block marker to every one of `bbm`'s mark pages.
pub fn markbad(access: &mut dyn NandAccess, bbm: &BbmConfig, block: u32) -> Result<()> {
    let pages_per_block = access.pages_per_block();
    let raw_len = raw_page_len(access);
    for &page_offset in &bbm.mark_pages {
        let page = block * pages_per_block + page_offset;
        let mut buf = vec![0xFFu8; raw_len];
        if bbm.flags.mark_whole_page {
            buf.fill(0x00);
        } else {
            let data_len = access.page_size() as usize;
            let start = data_len + bbm.oob_offset as usize;
            let end = (start + 2).min(buf.len());
            for b in &mut buf[start..end] {
                *b = 0x00;
            }
        }
        access.program_page_raw(page, &buf)?;
    }
    Ok(())
}

/// Result of a torture test on one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TortureOutcome {
    /// Every pattern wrote and read back correctly; the block is good.
    Pass,
    /// A pattern mismatch was detected; the block should be marked bad.
    Fail,
}

const TORTURE_PATTERN_A: u8 = 0x5A;
const TORTURE_PATTERN_B: u8 = 0xA5; // !TORTURE_PATTERN_A

fn verify_pattern(buf: &[u8], pattern: u8) -> bool {
    buf.iter().all(|&b| b == pattern)
}

/// Runs the standard erase -> verify-erased -> write 0x5A -> verify ->
/// write 0xA5 -> verify -> final-erase torture sequence against the
/// first page of `block`. Unlike some original vendor driver code, every
/// verification failure here is propagated as an error rather than
/// silently ignored: a torture test that can't prove the block is sound
/// must be treated as a failure.
pub fn torture_block(access: &mut dyn NandAccess, block: u32) -> Result<TortureOutcome> {
    let raw_len = raw_page_len(access);
    let first_page = block * access.pages_per_block();

    access.erase_block(block)?;
    let mut buf = vec![0u8; raw_len];
    access.read_page_raw(first_page, &mut buf)?;
    if !verify_pattern(&buf, 0xFF) {
        return Ok(TortureOutcome::Fail);
    }

    for pattern in [TORTURE_PATTERN_A, TORTURE_PATTERN_B] {
        access.erase_block(block)?;
        let pattern_buf = vec![pattern; raw_len];
        access.program_page_raw(first_page, &pattern_buf)?;
        let mut readback = vec![0u8; raw_len];
        access.read_page_raw(first_page, &mut readback)?;
        if readback != pattern_buf {
            return Ok(TortureOutcome::Fail);
        }
    }

    access.erase_block(block)?;
    let mut final_buf = vec![0u8; raw_len];
    access.read_page_raw(first_page, &mut final_buf)?;
    if !verify_pattern(&final_buf, 0xFF) {
        return Ok(TortureOutcome::Fail);
    }

    Ok(TortureOutcome::Pass)
}

/// Rewrites raw page bytes from one layout into another, e.g. when
/// moving data captured with one OOB layout onto a part using a
/// different one. `src_layout`/`dst_layout` total byte counts must
/// match; mismatched `Data`-typed regions are truncated/zero-padded.
pub fn convert_layout(
    src: &[u8],
    src_layout: &crate::domain::nand::PageLayout,
    dst_layout: &crate::domain::nand::PageLayout,
) -> Result<Vec<u8>> {
    use crate::domain::nand::LayoutEntryType;

    if src.len() != src_layout.total_bytes() as usize {
        return Err(Error::InvalidParameter(
            "convert_layout: source buffer length does not match source layout".into(),
        ));
    }
    let src_data_ranges = src_layout.ranges_of(LayoutEntryType::Data);
    let mut data = Vec::new();
    for (start, end) in &src_data_ranges {
        data.extend_from_slice(&src[*start as usize..*end as usize]);
    }

    let mut out = vec![0xFFu8; dst_layout.total_bytes() as usize];
    let dst_data_ranges = dst_layout.ranges_of(LayoutEntryType::Data);
    let mut consumed = 0usize;
    for (start, end) in &dst_data_ranges {
        let len = (*end - *start) as usize;
        let take = len.min(data.len().saturating_sub(consumed));
        out[*start as usize..*start as usize + take]
            .copy_from_slice(&data[consumed..consumed + take]);
        consumed += take;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nand::BbmConfig;
    use std::cell::RefCell;

    struct FakeAccess {
        page_size: u32,
        oob_size: u32,
        pages_per_block: u32,
        memory: RefCell<Vec<u8>>,
        fail_pattern_b_readback: bool,
    }

    impl FakeAccess {
        fn new(pages_per_block: u32) -> Self {
            let page_size = 2048;
            let oob_size = 64;
            let raw_len = (page_size + oob_size) as usize;
            Self {
                page_size,
                oob_size,
                pages_per_block,
                memory: RefCell::new(vec![0xFFu8; raw_len * pages_per_block as usize * 4]),
                fail_pattern_b_readback: false,
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
            if self.fail_pattern_b_readback && buf[0] == TORTURE_PATTERN_B {
                // Simulate a stuck bit: flip one byte on program.
                let raw_len = self.raw_len();
                let mut mem = self.memory.borrow_mut();
                let base = page as usize * raw_len;
                mem[base..base + raw_len].copy_from_slice(buf);
                mem[base] = 0x00;
                return Ok(());
            }
            let raw_len = self.raw_len();
            let mut mem = self.memory.borrow_mut();
            let base = page as usize * raw_len;
            mem[base..base + raw_len].copy_from_slice(buf);
            Ok(())
        }
        fn erase_block(&mut self, block: u32) -> Result<()> {
            let raw_len = self.raw_len();
            let mut mem = self.memory.borrow_mut();
            let base = block as usize * self.pages_per_block as usize * raw_len;
            let len = self.pages_per_block as usize * raw_len;
            mem[base..base + len].fill(0xFF);
            Ok(())
        }
    }

    #[test]
    fn torture_passes_on_healthy_block() {
        let mut access = FakeAccess::new(64);
        assert_eq!(torture_block(&mut access, 0).unwrap(), TortureOutcome::Pass);
    }

    #[test]
    fn torture_fails_on_stuck_bit() {
        let mut access = FakeAccess::new(64);
        access.fail_pattern_b_readback = true;
        assert_eq!(torture_block(&mut access, 0).unwrap(), TortureOutcome::Fail);
    }

    #[test]
    fn markbad_then_checkbad_detects_it() {
        let mut access = FakeAccess::new(64);
        let bbm = BbmConfig::first_page_only(0);
        assert!(!checkbad(&mut access, &bbm, 1).unwrap());
        markbad(&mut access, &bbm, 1).unwrap();
        assert!(checkbad(&mut access, &bbm, 1).unwrap());
    }
}
