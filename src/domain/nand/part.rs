//! The `Part` record: everything the SPI-NAND core needs to know about
//! one specific chip model, independent of how it was identified or what
//! controller is talking to it.

use super::bbm::BbmConfig;
use super::ecc_config::EccConfig;
use super::flash_id::FlashId;
use super::layout::PageLayout;
use super::memory_org::MemoryOrg;
use crate::domain::spi_mem::IoType;

/// Quad-enable bit location/semantics, when a part needs one set before
/// quad I/O works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QeType {
    /// No quad-enable bit; quad I/O always available (or unsupported).
    None,
    /// Quad-enable lives in the CONFIG feature register, given bit index.
    ConfigBit(u8),
}

/// Behavioral flags describing quirks/capabilities beyond plain I/O
/// widths.
pub mod flags {
    /// Part has no usable parameter page; skip ONFI-style probing.
    pub const NO_PP: u32 = 1 << 0;
    /// Unique ID is read generically (GET_FEATURE-based) rather than via
    /// a vendor-specific opcode.
    pub const GENERIC_UID: u32 = 1 << 1;
    /// Part exposes a NOR-style continuous read capability.
    pub const NOR_READ_CAP: u32 = 1 << 2;
    /// Supports READ_FROM_CACHE with the cache pointer left running
    /// across page boundaries (continuous read).
    pub const CONTINUOUS_READ: u32 = 1 << 3;
    /// Supports sequential cache reads (read page N+1 into cache while
    /// page N is streamed out).
    pub const READ_CACHE_SEQ: u32 = 1 << 4;
    /// Supports random (non-sequential) cache reads.
    pub const READ_CACHE_RANDOM: u32 = 1 << 5;
    /// Bad block marker may live on the block's 2nd page as well as the
    /// 1st.
    pub const BBM_2ND_PAGE: u32 = 1 << 6;
    /// Supports randomized (non-sequential) partial page program.
    pub const RND_PAGE_WRITE: u32 = 1 << 7;
    /// Part has no distinct program-load opcode; PROGRAM_EXECUTE alone
    /// suffices (rare, single-opcode program sequence).
    pub const NO_OP: u32 = 1 << 8;
}

/// Per-IO-mode opcode, for operations where the opcode varies by I/O
/// width (READ_FROM_CACHE, PROGRAM_LOAD).
#[derive(Debug, Clone, Default)]
pub struct OpcodeTable {
    entries: Vec<(IoType, u8)>,
}

impl OpcodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, io_type: IoType, opcode: u8) -> Self {
        self.entries.push((io_type, opcode));
        self
    }

    pub fn opcode_for(&self, io_type: IoType) -> Option<u8> {
        self.entries.iter().find(|(t, _)| *t == io_type).map(|(_, op)| *op)
    }

    pub fn supported_io_types(&self) -> Vec<IoType> {
        self.entries.iter().map(|(t, _)| *t).collect()
    }
}

/// Per-IO-mode maximum clock frequency, in Hz.
#[derive(Debug, Clone, Default)]
pub struct ClockTable {
    entries: Vec<(IoType, u32)>,
}

impl ClockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, io_type: IoType, max_hz: u32) -> Self {
        self.entries.push((io_type, max_hz));
        self
    }

    pub fn max_hz_for(&self, io_type: IoType) -> Option<u32> {
        self.entries.iter().find(|(t, _)| *t == io_type).map(|(_, hz)| *hz)
    }
}

/// A complete SPI-NAND part definition.
#[derive(Debug, Clone)]
pub struct Part {
    pub model: String,
    pub aliases: Vec<String>,
    pub id: FlashId,
    pub memory_org: MemoryOrg,
    pub ecc: Option<EccConfig>,
    /// Name of the ECC status decoder to use, resolved against the
    /// `infrastructure::ecc` registry (keeps this record free of behavior,
    /// only data).
    pub ecc_decoder: &'static str,
    pub page_layout: PageLayout,
    pub bbm: BbmConfig,
    /// Number of partial-page program operations allowed per page before
    /// a full erase is required again.
    pub nops_per_page: u8,
    pub qe: QeType,
    pub read_opcodes: OpcodeTable,
    pub program_load_opcodes: OpcodeTable,
    pub max_clock: ClockTable,
    pub flags: u32,
}

impl Part {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn supports_read(&self, io_type: IoType) -> bool {
        self.read_opcodes.opcode_for(io_type).is_some()
    }

    pub fn supports_program_load(&self, io_type: IoType) -> bool {
        self.program_load_opcodes.opcode_for(io_type).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nand::bbm::BbmConfig;
    use crate::domain::nand::flash_id::IdFraming;

    fn sample_part() -> Part {
        Part {
            model: "TEST1G".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, &[0xC8, 0xB1]),
            memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
            ecc: Some(EccConfig::new(512, 1)),
            ecc_decoder: "ondie-generic-1bit",
            page_layout: PageLayout::simple(2048, 64, 32),
            bbm: BbmConfig::first_page_only(0),
            nops_per_page: 1,
            qe: QeType::None,
            read_opcodes: OpcodeTable::new().with(IoType::Io111, 0x03).with(IoType::Io114, 0x6B),
            program_load_opcodes: OpcodeTable::new().with(IoType::Io111, 0x02),
            max_clock: ClockTable::new().with(IoType::Io111, 50_000_000),
            flags: flags::CONTINUOUS_READ,
        }
    }

    #[test]
    fn supports_read_reflects_opcode_table() {
        let part = sample_part();
        assert!(part.supports_read(IoType::Io111));
        assert!(part.supports_read(IoType::Io114));
        assert!(!part.supports_read(IoType::Io444));
    }

    #[test]
    fn flag_check() {
        let part = sample_part();
        assert!(part.has_flag(flags::CONTINUOUS_READ));
        assert!(!part.has_flag(flags::NO_PP));
    }
}
