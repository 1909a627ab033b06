//! Winbond NAND chips

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

pub const MFR_ID: u8 = 0xEF;

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // W25N01GVZEIG
        ChipSpec {
            name: "W25N01GVZEIG".to_string(),
            manufacturer: "Winbond".to_string(),
            jedec_id: JedecId::new([0xEF, 0xAA, 0x21]),
            flash_type: FlashType::Nand,
            capacity: Capacity::gigabits(1),
            layout: ChipLayout {
                page_size: 2048,
                block_size: 128 * 1024,
                oob_size: Some(64),
                is_dataflash: false,
            },
            capabilities: ChipCapabilities {
                supports_ecc_control: true,
                ..Default::default()
            },
            otp: None,
        },
        // W25N02KVZEIR
        ChipSpec {
            name: "W25N02KVZEIR".to_string(),
            manufacturer: "Winbond".to_string(),
            jedec_id: JedecId::new([0xEF, 0xAA, 0x22]),
            flash_type: FlashType::Nand,
            capacity: Capacity::gigabits(2),
            layout: ChipLayout {
                page_size: 2048,
                block_size: 128 * 1024,
                oob_size: Some(64),
                is_dataflash: false,
            },
            capabilities: ChipCapabilities {
                supports_ecc_control: true,
                ..Default::default()
            },
            otp: None,
        },
        // Add more Winbond chips here...
    ]
}

/// Built-in `Part` catalog for Winbond, spanning the 1-bit, 4-bit and
/// 8-bit W25Nxx correction-strength families. High-speed
/// read (`0xD0` config bit) is not yet modelled as a distinct opcode
/// table entry; both families advertise their fastest opcode directly.
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        "Winbond",
        vec![
            // W25N01GVZEIG: 1-bit/step.
            Part {
                model: "W25N01GVZEIG".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0xEF, 0xAA, 0x21]),
                memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
                ecc: Some(EccConfig::new(512, 1)),
                ecc_decoder: "winbond-1bit",
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
            },
            // W25N02KVZEIR: extended 4-bit/step family.
            Part {
                model: "W25N02KVZEIR".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0xEF, 0xAA, 0x22]),
                memory_org: MemoryOrg::bind(2048, 64, 64, 2048, 1, 1, 1).unwrap(),
                ecc: Some(EccConfig::new(512, 4)),
                ecc_decoder: "winbond-4bit",
                page_layout: PageLayout::simple(2048, 64, 32),
                bbm: BbmConfig::first_page_only(0),
                nops_per_page: 1,
                qe: QeType::ConfigBit(0),
                read_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x03)
                    .with(IoType::Io112, 0x3B)
                    .with(IoType::Io114, 0x6B)
                    .with(IoType::Io144, 0xEB),
                program_load_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x02)
                    .with(IoType::Io114, 0x32),
                max_clock: ClockTable::new()
                    .with(IoType::Io111, 104_000_000)
                    .with(IoType::Io144, 104_000_000),
                flags: part_flags::READ_CACHE_RANDOM,
            },
        ],
    )
}
