//! FORESEE (Longsys) SPI NAND Flash Chips
//!
//! FORESEE/Longsys - Manufacturer ID: 0xCD

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

/// FORESEE Manufacturer ID
pub const MANUFACTURER_ID: u8 = 0xCD;
pub const MFR_ID: u8 = MANUFACTURER_ID;
pub const MANUFACTURER_NAME: &str = "FORESEE";

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // =========================================================================
        // FS35ND Series - SPI NAND Flash
        // =========================================================================
        // 1Gbit (128MB)
        nand_chip("FS35ND01GD1F1", [0xCD, 0xA1, 0x00], 1, 2048, 64, 128),
        nand_chip("FS35ND01GS1F1", [0xCD, 0xB1, 0x00], 1, 2048, 128, 128),
        // 2Gbit (256MB)
        nand_chip("FS35ND02GS2F1", [0xCD, 0xA2, 0x00], 2, 2048, 64, 128),
        nand_chip("FS35ND02GD1F1", [0xCD, 0xB2, 0x00], 2, 2048, 128, 128),
        // 1Gbit alternative (F35SQA series)
        nand_chip("F35SQA001G", [0xCD, 0x71, 0x00], 1, 2048, 64, 128),
    ]
}

/// Helper function to create a FORESEE NAND chip spec
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

/// Built-in `Part` catalog for FORESEE/Longsys (one-bit-per-step generic
/// decoder).
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        MANUFACTURER_NAME,
        vec![Part {
            model: "FS35ND01GD1F1".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, &[0xCD, 0xA1]),
            memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
            ecc: Some(EccConfig::new(512, 1)),
            ecc_decoder: "ondie-generic-1bit",
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
                .with(IoType::Io111, 80_000_000)
                .with(IoType::Io114, 80_000_000),
            flags: 0,
        }],
    )
}
