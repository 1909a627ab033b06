//! GigaDevice NAND chips

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

pub const MFR_ID: u8 = 0xC8;

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // GD5F1GM7UE
        ChipSpec {
            name: "GD5F1GM7UE".to_string(),
            manufacturer: "GigaDevice".to_string(),
            jedec_id: JedecId::new([0xC8, 0x91, 0x00]),
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
        // Add more GigaDevice chips here...
    ]
}

/// Built-in `Part` catalog for GigaDevice, covering all three ECC status
/// encodings the vendor has shipped across product generations
///
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        "GigaDevice",
        vec![
            // GD5F1GQ4UExxG: first-generation 2-bit SR[4:5] encoding.
            Part {
                model: "GD5F1GQ4UExxG".into(),
                aliases: vec!["GD5F1GQ4xA".into()],
                id: FlashId::new(IdFraming::Dummy, &[0xC8, 0xB1]),
                memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
                ecc: Some(EccConfig::new(512, 1)),
                ecc_decoder: "gigadevice-v1",
                page_layout: PageLayout::simple(2048, 64, 32),
                bbm: BbmConfig::first_page_only(0),
                nops_per_page: 4,
                qe: QeType::ConfigBit(0),
                read_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x03)
                    .with(IoType::Io112, 0x3B)
                    .with(IoType::Io114, 0x6B),
                program_load_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x02)
                    .with(IoType::Io114, 0x32),
                max_clock: ClockTable::new()
                    .with(IoType::Io111, 100_000_000)
                    .with(IoType::Io114, 104_000_000),
                flags: part_flags::READ_CACHE_RANDOM,
            },
            // GD5F2GQ5UExxG: second-generation 3-bit SR[4:6] encoding.
            Part {
                model: "GD5F2GQ5UExxG".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0xC8, 0x32]),
                memory_org: MemoryOrg::bind(2048, 64, 64, 2048, 1, 1, 2).unwrap(),
                ecc: Some(EccConfig::new(512, 4)),
                ecc_decoder: "gigadevice-v2",
                page_layout: PageLayout::simple(2048, 64, 48),
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
                    .with(IoType::Io111, 120_000_000)
                    .with(IoType::Io144, 120_000_000),
                flags: part_flags::READ_CACHE_RANDOM | part_flags::RND_PAGE_WRITE,
            },
            // GD5F4GQ6UExxG: third-generation high-density, 8-bit ceiling.
            Part {
                model: "GD5F4GQ6UExxG".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0xC8, 0xD4]),
                memory_org: MemoryOrg::bind(4096, 256, 64, 2048, 1, 1, 2).unwrap(),
                ecc: Some(EccConfig::new(512, 8)),
                ecc_decoder: "gigadevice-v3",
                page_layout: PageLayout::simple(4096, 256, 128),
                bbm: BbmConfig::first_page_only(0),
                nops_per_page: 1,
                qe: QeType::ConfigBit(0),
                read_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x03)
                    .with(IoType::Io114, 0x6B)
                    .with(IoType::Io144, 0xEB),
                program_load_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x02)
                    .with(IoType::Io114, 0x32),
                max_clock: ClockTable::new()
                    .with(IoType::Io111, 120_000_000)
                    .with(IoType::Io144, 120_000_000),
                flags: part_flags::READ_CACHE_RANDOM,
            },
        ],
    )
}
