//! ESMT (Elite Semiconductor) SPI NAND Flash Chips
//!
//! ESMT/Zentel - Manufacturer ID: 0xC8 (shares with GigaDevice)

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

/// ESMT uses same ID as GigaDevice in some cases
pub const MANUFACTURER_ID: u8 = 0xC8;
pub const MFR_ID: u8 = MANUFACTURER_ID;
pub const MANUFACTURER_NAME: &str = "ESMT";

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // =========================================================================
        // F50 Series - SPI NAND Flash
        // =========================================================================
        // 512Mbit (64MB)
        nand_chip("F50L512M41A", [0xC8, 0x20, 0x00], 0, 2048, 64, 128, 64),
        // 1Gbit (128MB)
        nand_chip("F50L1G41A0", [0xC8, 0x21, 0x00], 1, 2048, 64, 128, 128),
        nand_chip("F50L1G41LB", [0xC8, 0x01, 0x00], 1, 2048, 64, 128, 128),
        nand_chip("F50D1G41LB", [0xC8, 0x11, 0x00], 1, 2048, 128, 128, 128),
        // 2Gbit (256MB)
        nand_chip("F50L2G41LB", [0xC8, 0x0A, 0x00], 2, 2048, 64, 128, 256),
    ]
}

/// Helper function to create an ESMT NAND chip spec
/// For 512Mbit chips, capacity_gbit = 0a and capacity_mb is used
fn nand_chip(
    name: &str,
    jedec_id: [u8; 3],
    capacity_gbit: u32,
    page_size: u32,
    oob_size: u32,
    block_size_kb: u32,
    capacity_mb: u32,
) -> ChipSpec {
    let capacity = if capacity_gbit > 0 {
        Capacity::gigabits(capacity_gbit)
    } else {
        Capacity::megabytes(capacity_mb)
    };

    ChipSpec {
        name: name.to_string(),
        manufacturer: MANUFACTURER_NAME.to_string(),
        jedec_id: JedecId::new(jedec_id),
        flash_type: FlashType::Nand,
        capacity,
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

/// Built-in `Part` catalog for ESMT: a single-bit-per-step on-die ECC
/// engine shared with the rest of the long tail of second-source
/// vendors.
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        MANUFACTURER_NAME,
        vec![Part {
            model: "F50L1G41LB".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, &[0xC8, 0x01]),
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
