//! Other Manufacturers SPI NAND Flash Chips
//!
//! This module contains chips from smaller manufacturers:
//! - HEYANG (0xC9)
//! - PN (Paragon/Zbit) (0xA1)
//! - ATO (0x9B, 0xAD)
//! - FM (Fudan Microelectronics) (0xA1)
//! - DS (Dosilicon) (0xE5)
//! - BIWIN (0xBC)
//! - Zentel (0xC8)

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

pub fn get_chips() -> Vec<ChipSpec> {
    let mut chips = Vec::new();
    chips.extend(heyang_chips());
    chips.extend(pn_chips());
    chips.extend(ato_chips());
    chips.extend(fm_chips());
    chips.extend(ds_chips());
    chips.extend(zentel_chips());
    chips
}

// =========================================================================
// HEYANG Chips (0xC9)
// =========================================================================
fn heyang_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip(
            "HEYANG",
            "HYF1GQ4UAACAE",
            [0xC9, 0x51, 0x00],
            1,
            2048,
            128,
            128,
        ),
        nand_chip(
            "HEYANG",
            "HYF2GQ4UAACAE",
            [0xC9, 0x52, 0x00],
            2,
            2048,
            128,
            128,
        ),
        nand_chip(
            "HEYANG",
            "HYF2GQ4UHCCAE",
            [0xC9, 0x5A, 0x00],
            2,
            2048,
            128,
            128,
        ),
        nand_chip(
            "HEYANG",
            "HYF1GQ4UDACAE",
            [0xC9, 0x21, 0x00],
            1,
            2048,
            64,
            128,
        ),
        nand_chip(
            "HEYANG",
            "HYF2GQ4UDACAE",
            [0xC9, 0x22, 0x00],
            2,
            2048,
            64,
            128,
        ),
    ]
}

// =========================================================================
// PN/Paragon Chips (0xA1)
// =========================================================================
fn pn_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip("PN", "PN26G01A-X", [0xA1, 0xE1, 0x00], 1, 2048, 128, 128),
        nand_chip("PN", "PN26G02A-X", [0xA1, 0xE2, 0x00], 2, 2048, 128, 128),
        nand_chip("PN", "PN26Q01A-X", [0xA1, 0xC1, 0x00], 1, 2048, 128, 128),
    ]
}

// =========================================================================
// ATO Chips (0x9B, 0xAD)
// =========================================================================
fn ato_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip("ATO", "ATO25D1GA", [0x9B, 0x12, 0x00], 1, 2048, 64, 128),
        nand_chip("ATO", "ATO25D2GA", [0x9B, 0xF1, 0x00], 2, 2048, 64, 128),
        nand_chip("ATO", "ATO25D2GB", [0xAD, 0xDA, 0x00], 2, 2048, 128, 128),
    ]
}

// =========================================================================
// FM (Fudan Microelectronics) Chips (0xA1)
// =========================================================================
fn fm_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip("FM", "FM25S01", [0xA1, 0xA1, 0x00], 1, 2048, 128, 128),
        nand_chip("FM", "FM25S01A", [0xA1, 0xE4, 0x00], 1, 2048, 64, 128),
        nand_chip("FM", "FM25G01B", [0xA1, 0xD1, 0x00], 1, 2048, 128, 128),
        nand_chip("FM", "FM25G02B", [0xA1, 0xD2, 0x00], 2, 2048, 128, 128),
        nand_chip("FM", "FM25G02", [0xA1, 0xF2, 0x00], 2, 2048, 64, 128),
        nand_chip("FM", "FM25G02C", [0xA1, 0x92, 0x00], 2, 2048, 64, 128),
    ]
}

// =========================================================================
// DS (Dosilicon) Chips (0xE5)
// =========================================================================
fn ds_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip(
            "Dosilicon",
            "DS35Q1GA",
            [0xE5, 0x71, 0x00],
            1,
            2048,
            64,
            128,
        ),
        nand_chip(
            "Dosilicon",
            "DS35Q2GA",
            [0xE5, 0x72, 0x00],
            2,
            2048,
            64,
            128,
        ),
        nand_chip(
            "Dosilicon",
            "DS35Q1GB",
            [0xE5, 0xF1, 0x00],
            1,
            2048,
            128,
            128,
        ),
        nand_chip(
            "Dosilicon",
            "DS35Q2GB",
            [0xE5, 0xF2, 0x00],
            2,
            2048,
            128,
            128,
        ),
    ]
}

// =========================================================================
// Zentel Chips (0xC8 - shares with GigaDevice)
// =========================================================================
fn zentel_chips() -> Vec<ChipSpec> {
    vec![
        nand_chip_custom(
            "Zentel",
            "A5U12A21ASC",
            [0xC8, 0x20, 0x00],
            64,
            2048,
            64,
            128,
        ),
        nand_chip(
            "Zentel",
            "A5U1GA21BWS",
            [0xC8, 0x21, 0x00],
            1,
            2048,
            64,
            128,
        ),
    ]
}

/// Helper function to create a NAND chip spec (generic manufacturer)
fn nand_chip(
    manufacturer: &str,
    name: &str,
    jedec_id: [u8; 3],
    capacity_gbit: u32,
    page_size: u32,
    oob_size: u32,
    block_size_kb: u32,
) -> ChipSpec {
    ChipSpec {
        name: name.to_string(),
        manufacturer: manufacturer.to_string(),
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

/// For chips with custom capacity (not standard Gbit sizes)
fn nand_chip_custom(
    manufacturer: &str,
    name: &str,
    jedec_id: [u8; 3],
    capacity_mb: u32,
    page_size: u32,
    oob_size: u32,
    block_size_kb: u32,
) -> ChipSpec {
    ChipSpec {
        name: name.to_string(),
        manufacturer: manufacturer.to_string(),
        jedec_id: JedecId::new(jedec_id),
        flash_type: FlashType::Nand,
        capacity: Capacity::megabytes(capacity_mb),
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

/// One representative `Part` for a second-source vendor whose datasheet
/// only documents the common one-bit-per-step on-die ECC encoding
/// (the long tail: Dosilicon, Fidelix, HeYangTek, ISSI,
/// Zetta, Paragon, Alliance Memory, ATO, CoreStorage, Fudan, MK).
fn generic_part(mfr_id: u8, model: &str, id2: u8, planes: u32) -> Part {
    Part {
        model: model.into(),
        aliases: vec![],
        id: FlashId::new(IdFraming::Dummy, &[mfr_id, id2]),
        memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, planes).unwrap(),
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
    }
}

/// HeYangTek (0xC9).
pub fn vendor_heyang() -> VendorDef {
    VendorDef::new(0xC9, "HeYangTek", vec![generic_part(0xC9, "HYF1GQ4UAACAE", 0x51, 1)])
}

/// Paragon/Zbit (0xA1).
pub fn vendor_paragon() -> VendorDef {
    VendorDef::new(0xA1, "Paragon", vec![generic_part(0xA1, "PN26G01A-X", 0xE1, 1)])
}

/// ATO (0x9B).
pub fn vendor_ato() -> VendorDef {
    VendorDef::new(0x9B, "ATO", vec![generic_part(0x9B, "ATO25D1GA", 0x12, 1)])
}

/// Fudan Microelectronics (0xA1; distinguished from Paragon by ID byte,
/// not `mfr_id` — catalog resolution always matches the full ID).
pub fn vendor_fudan() -> VendorDef {
    VendorDef::new(0xA1, "Fudan", vec![generic_part(0xA1, "FM25G01B", 0xD1, 1)])
}

/// Dosilicon (0xE5).
pub fn vendor_dosilicon() -> VendorDef {
    VendorDef::new(0xE5, "Dosilicon", vec![generic_part(0xE5, "DS35Q1GA", 0x71, 1)])
}

/// Fidelix (0xF8).
pub fn vendor_fidelix() -> VendorDef {
    VendorDef::new(0xF8, "Fidelix", vec![generic_part(0xF8, "FM25S01", 0xA1, 1)])
}

/// ISSI (0xD5; shares the prefix byte with Etron — distinguished by ID).
pub fn vendor_issi() -> VendorDef {
    VendorDef::new(0xD5, "ISSI", vec![generic_part(0xD5, "IS37SML01G1", 0x21, 1)])
}

/// Zetta Device (0xBA).
pub fn vendor_zetta() -> VendorDef {
    VendorDef::new(0xBA, "Zetta", vec![generic_part(0xBA, "ZD35Q1GA", 0x71, 1)])
}

/// Alliance Memory (0x52).
pub fn vendor_alliance_memory() -> VendorDef {
    VendorDef::new(0x52, "Alliance Memory", vec![generic_part(0x52, "AS5F31G04SND", 0x21, 1)])
}

/// CoreStorage (0xF1).
pub fn vendor_corestorage() -> VendorDef {
    VendorDef::new(0xF1, "CoreStorage", vec![generic_part(0xF1, "CS35B01G01", 0x11, 1)])
}

/// MK (0xC8; shares the prefix byte with GigaDevice/ESMT/Zentel —
/// distinguished by ID).
pub fn vendor_mk() -> VendorDef {
    VendorDef::new(0xC8, "MK", vec![generic_part(0xC8, "MK35SMD1G1", 0x52, 1)])
}

/// Zentel (0xC8).
pub fn vendor_zentel() -> VendorDef {
    VendorDef::new(0xC8, "Zentel", vec![generic_part(0xC8, "A5U1GA21BWS", 0x21, 1)])
}

/// All `VendorDef`s contributed by this module, for the catalog (C) to
/// merge alongside the other per-vendor files.
pub fn all_vendors() -> Vec<VendorDef> {
    vec![
        vendor_heyang(),
        vendor_paragon(),
        vendor_ato(),
        vendor_fudan(),
        vendor_dosilicon(),
        vendor_fidelix(),
        vendor_issi(),
        vendor_zetta(),
        vendor_alliance_memory(),
        vendor_corestorage(),
        vendor_mk(),
        vendor_zentel(),
    ]
}
