//! Macronix SPI NAND Flash Chips
//!
//! Macronix International Co., Ltd. - Manufacturer ID: 0xC2

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

/// Macronix Manufacturer ID
pub const MANUFACTURER_ID: u8 = 0xC2;
pub const MFR_ID: u8 = MANUFACTURER_ID;
pub const MANUFACTURER_NAME: &str = "Macronix";

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // =========================================================================
        // MX35LF Series - SPI NAND Flash
        // =========================================================================
        // 1Gbit (128MB) - MX35LF1GE4AB
        nand_chip("MX35LF1GE4AB", [0xC2, 0x12, 0x00], 1, 2048, 64, 128),
        // 2Gbit (256MB) - MX35LF2GE4AB (plane select)
        nand_chip("MX35LF2GE4AB", [0xC2, 0x22, 0x00], 2, 2048, 64, 128),
        // 2Gbit (256MB) - MX35LF2GE4AD (2-byte device ID, plane select)
        nand_chip_2id("MX35LF2GE4AD", [0xC2, 0x26, 0x03], 2, 2048, 128, 128),
        // 4Gbit (512MB) - MX35LF4GE4AD
        nand_chip("MX35LF4GE4AD", [0xC2, 0x32, 0x00], 4, 4096, 128, 256),
    ]
}

/// Helper function to create a Macronix NAND chip spec
fn nand_chip(
    name: &str,
    jedec_id: [u8; 3],
    capacity_gbit: u32,
    page_size: u32,
    oob_size: u32,
    block_size_kb: u32,
) -> ChipSpec {
    ChipSpec {
        name: name.to_string(),
        manufacturer: MANUFACTURER_NAME.to_string(),
        jedec_id: JedecId::new(jedec_id),
        flash_type: FlashType::Nand,
        capacity: Capacity::gigabits(capacity_gbit),
        layout: ChipLayout {
            page_size,
            block_size: block_size_kb * 1024,
            oob_size: Some(oob_size),
            is_dataflash: false,
        },
        capabilities: ChipCapabilities {
            supports_ecc_control: true,
            supports_dual_spi: true,
            ..Default::default()
        },
        otp: None,
    }
}

/// Helper for chips with 2-byte device ID
fn nand_chip_2id(
    name: &str,
    jedec_id: [u8; 3],
    capacity_gbit: u32,
    page_size: u32,
    oob_size: u32,
    block_size_kb: u32,
) -> ChipSpec {
    nand_chip(
        name,
        jedec_id,
        capacity_gbit,
        page_size,
        oob_size,
        block_size_kb,
    )
}

/// Built-in `Part` catalog for Macronix. The per-op bitflip opcode
/// (`0x7C`, one dummy byte) is resolved through `Part::ecc_decoder`
/// ("macronix") rather than stored here; the HSE (`0x60`) and DC
/// (`0xE0`) register bits that respectively gate SPI-NOR-style reads
/// and bump 1-2-2/1-4-4 dummy cycles to 8 are chip-setup concerns
/// handled by the SPI-NAND core, not catalog data.
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        "Macronix",
        vec![Part {
            model: "MX35LF2GE4AB".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, &[0xC2, 0x22]),
            memory_org: MemoryOrg::bind(2048, 64, 64, 2048, 1, 1, 2).unwrap(),
            ecc: Some(EccConfig::new(512, 8)),
            ecc_decoder: "macronix",
            page_layout: PageLayout::simple(2048, 64, 32),
            bbm: BbmConfig::first_page_only(0),
            nops_per_page: 4,
            qe: QeType::ConfigBit(0),
            read_opcodes: OpcodeTable::new()
                .with(IoType::Io111, 0x03)
                .with(IoType::Io112, 0x3B)
                .with(IoType::Io114, 0x6B)
                .with(IoType::Io122, 0xBB)
                .with(IoType::Io144, 0xEB),
            program_load_opcodes: OpcodeTable::new()
                .with(IoType::Io111, 0x02)
                .with(IoType::Io114, 0x32),
            max_clock: ClockTable::new()
                .with(IoType::Io111, 104_000_000)
                .with(IoType::Io144, 104_000_000),
            flags: part_flags::READ_CACHE_RANDOM | part_flags::NOR_READ_CAP,
        }],
    )
}
