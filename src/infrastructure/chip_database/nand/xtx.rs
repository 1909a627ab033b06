//! XTX Technology SPI NAND Flash Chips
//!
//! XTX Technology Limited - Manufacturer ID: 0x0B

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

/// XTX Manufacturer ID
pub const MANUFACTURER_ID: u8 = 0x0B;
pub const MFR_ID: u8 = MANUFACTURER_ID;
pub const MANUFACTURER_NAME: &str = "XTX";

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // =========================================================================
        // XT26G Series - SPI NAND Flash
        // =========================================================================
        // 1Gbit (128MB)
        nand_chip("XT26G01A", [0x0B, 0xE1, 0x00], 1, 2048, 64, 128),
        nand_chip("XT26G01C", [0x0B, 0x11, 0x00], 1, 2048, 128, 128),
        // 2Gbit (256MB)
        nand_chip("XT26G02A", [0x0B, 0xE2, 0x00], 2, 2048, 64, 128),
        nand_chip("XT26G02B", [0x0B, 0xF2, 0x00], 2, 2048, 64, 128),
    ]
}

/// Helper function to create an XTX NAND chip spec
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

/// Built-in `Part` catalog for XTX (two-bit-per-step generic decoder).
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        MANUFACTURER_NAME,
        vec![Part {
            model: "XT26G02A".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, &[0x0B, 0xE2]),
            memory_org: MemoryOrg::bind(2048, 64, 64, 2048, 1, 1, 1).unwrap(),
            ecc: Some(EccConfig::new(512, 4)),
            ecc_decoder: "ondie-generic-2bit",
            page_layout: PageLayout::simple(2048, 64, 32),
            bbm: BbmConfig::first_page_only(0),
            nops_per_page: 1,
            qe: QeType::ConfigBit(0),
            read_opcodes: OpcodeTable::new()
                .with(IoType::Io111, 0x03)
                .with(IoType::Io112, 0x3B)
                .with(IoType::Io114, 0x6B),
            program_load_opcodes: OpcodeTable::new()
                .with(IoType::Io111, 0x02)
                .with(IoType::Io114, 0x32),
            max_clock: ClockTable::new()
                .with(IoType::Io111, 104_000_000)
                .with(IoType::Io114, 104_000_000),
            flags: 0,
        }],
    )
}
