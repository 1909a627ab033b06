//! Memory organization: how pages, blocks, LUNs, dies and planes compose
//! the part's total address space, plus the derived shift/mask values
//! used to decode a linear address into page/block/lun/chip coordinates.

use crate::error::{Error, Result};

/// Physical memory organization of a SPI-NAND part.
#[derive(Debug, Clone, Copy)]
pub struct MemoryOrg {
    pub page_size: u32,
    pub oob_size: u32,
    pub pages_per_block: u32,
    pub blocks_per_lun: u32,
    pub luns_per_cs: u32,
    pub num_chips: u32,
    pub planes_per_lun: u32,

    // Derived at bind time.
    page_shift: u32,
    block_shift: u32,
    lun_shift: u32,
    chip_shift: u32,
    page_mask: u32,
    block_mask: u32,
    lun_mask: u32,
}

fn log2_exact(n: u32, what: &str) -> Result<u32> {
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::InvalidParameter(format!(
            "{what} must be a non-zero power of two, got {n}"
        )));
    }
    Ok(n.trailing_zeros())
}

impl MemoryOrg {
    /// Binds a memory organization, validating that every multiplicity is
    /// a power of two (required so address decoding can use shifts/masks
    /// instead of division).
    pub fn bind(
        page_size: u32,
        oob_size: u32,
        pages_per_block: u32,
        blocks_per_lun: u32,
        luns_per_cs: u32,
        num_chips: u32,
        planes_per_lun: u32,
    ) -> Result<Self> {
        let page_shift = log2_exact(page_size, "page_size")?;
        let pages_per_block_shift = log2_exact(pages_per_block, "pages_per_block")?;
        let blocks_per_lun_shift = log2_exact(blocks_per_lun, "blocks_per_lun")?;
        log2_exact(luns_per_cs.max(1), "luns_per_cs")?;
        log2_exact(planes_per_lun.max(1), "planes_per_lun")?;
        if num_chips == 0 {
            return Err(Error::InvalidParameter("num_chips must be non-zero".into()));
        }

        let block_shift = page_shift + pages_per_block_shift;
        let lun_shift = block_shift + blocks_per_lun_shift;
        let chip_shift = lun_shift + log2_exact(luns_per_cs.max(1), "luns_per_cs")?;

        Ok(Self {
            page_size,
            oob_size,
            pages_per_block,
            blocks_per_lun,
            luns_per_cs,
            num_chips,
            planes_per_lun,
            page_shift,
            block_shift,
            lun_shift,
            chip_shift,
            page_mask: pages_per_block - 1,
            block_mask: blocks_per_lun - 1,
            lun_mask: luns_per_cs.max(1) - 1,
        })
    }

    pub fn block_size(&self) -> u32 {
        self.page_size * self.pages_per_block
    }

    pub fn lun_size(&self) -> u64 {
        self.block_size() as u64 * self.blocks_per_lun as u64
    }

    pub fn chip_size(&self) -> u64 {
        self.lun_size() * self.luns_per_cs as u64
    }

    pub fn total_size(&self) -> u64 {
        self.chip_size() * self.num_chips as u64
    }

    pub fn total_pages_per_chip(&self) -> u32 {
        self.pages_per_block * self.blocks_per_lun * self.luns_per_cs
    }

    /// Decomposes a byte address into (chip, lun, block, page, column).
    pub fn decode(&self, addr: u64) -> AddressParts {
        let chip_size = self.chip_size();
        let chip = (addr / chip_size.max(1)) as u32;
        let within_chip = (addr % chip_size.max(1)) as u32;

        let page_abs = within_chip >> self.page_shift;
        let column = within_chip & ((1 << self.page_shift) - 1);
        let lun = (page_abs >> (self.lun_shift - self.page_shift)) & self.lun_mask;
        let block = (page_abs >> (self.block_shift - self.page_shift)) & self.block_mask;
        let page = page_abs & self.page_mask;

        AddressParts {
            chip,
            lun,
            block,
            page,
            column,
        }
    }

    pub fn page_shift(&self) -> u32 {
        self.page_shift
    }

    pub fn block_shift(&self) -> u32 {
        self.block_shift
    }

    pub fn lun_shift(&self) -> u32 {
        self.lun_shift
    }

    pub fn pages_per_block_shift(&self) -> u32 {
        self.block_shift - self.page_shift
    }

    /// Splits a die-relative page index into `(die, page_within_die)`, per
    /// invariant 4: `die = page >> (lun_shift - page_shift)`,
    /// `page' = page & ((1 << (lun_shift - page_shift)) - 1)`.
    pub fn select_die_page(&self, page: u32) -> (u32, u32) {
        let die_shift = self.lun_shift - self.page_shift;
        let die = page >> die_shift;
        let within_die = page & ((1u32 << die_shift) - 1);
        (die, within_die)
    }

    /// True if `planes_per_lun == 2` and the plane bit (the lowest bit of
    /// the die-relative block number) is set for `page` (die-relative).
    pub fn plane_bit(&self, page_within_die: u32) -> u32 {
        if self.planes_per_lun != 2 {
            return 0;
        }
        (page_within_die >> self.pages_per_block_shift()) & 1
    }
}

/// A linear address decomposed by `MemoryOrg::decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParts {
    pub chip: u32,
    pub lun: u32,
    pub block: u32,
    pub page: u32,
    pub column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryOrg {
        MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap()
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(MemoryOrg::bind(2000, 64, 64, 1024, 1, 1, 1).is_err());
    }

    #[test]
    fn block_and_chip_sizes() {
        let org = sample();
        assert_eq!(org.block_size(), 2048 * 64);
        assert_eq!(org.chip_size(), 2048u64 * 64 * 1024);
    }

    #[test]
    fn decode_roundtrips_page_and_column() {
        let org = sample();
        let page_size = org.page_size as u64;
        let addr = 5 * org.block_size() as u64 + 3 * page_size + 17;
        let parts = org.decode(addr);
        assert_eq!(parts.block, 5);
        assert_eq!(parts.page, 3);
        assert_eq!(parts.column, 17);
    }
}
