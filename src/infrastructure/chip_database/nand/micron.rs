//! Micron NAND chips

use crate::domain::chip::*;
use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;
use crate::domain::types::*;

use super::vendor_def::VendorDef;

pub const MFR_ID: u8 = 0x2C;

pub fn get_chips() -> Vec<ChipSpec> {
    vec![
        // MT29F1G01ABAFD
        ChipSpec {
            name: "MT29F1G01ABAFD".to_string(),
            manufacturer: "Micron".to_string(),
            jedec_id: JedecId::new([0x2C, 0x14, 0x00]),
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
        // MT29F2G01ABAGD
        ChipSpec {
            name: "MT29F2G01ABAGD".to_string(),
            manufacturer: "Micron".to_string(),
            jedec_id: JedecId::new([0x2C, 0x24, 0x00]),
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
        // Add more Micron chips here...
    ]
}

/// Vendor `pp_post_init` hook (spec.md §4.4 step 4 / scenario S3): once
/// the ONFI-like parameter page validates for the M70A family, confirm
/// the 1-1-4 read and program-load opcodes, 8-bit/step ECC and 133 MHz
/// ceiling rather than trusting the JEDEC ID match alone.
fn pp_post_init(part: &mut Part) {
    if part.ecc_decoder != "micron-8bit" {
        return;
    }
    part.read_opcodes = OpcodeTable::new()
        .with(IoType::Io111, 0x03)
        .with(IoType::Io112, 0x3B)
        .with(IoType::Io114, 0x6B);
    part.program_load_opcodes = OpcodeTable::new().with(IoType::Io111, 0x02).with(IoType::Io114, 0xA2);
    part.max_clock = ClockTable::new().with(IoType::Io111, 133_000_000).with(IoType::Io114, 133_000_000);
}

/// Built-in `Part` catalog for Micron, covering the 1-bit M68A/M69A/M60A
/// family and the 8-bit M78A/M79A/M70A family.
pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        "Micron",
        vec![
            // MT29F1G01ABAFD (M68A family): 1-bit ECC, SR[4:5].
            Part {
                model: "MT29F1G01ABAFD".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0x2C, 0x14]),
                memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
                ecc: Some(EccConfig::new(512, 1)),
                ecc_decoder: "micron-1bit",
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
                    .with(IoType::Io111, 66_000_000)
                    .with(IoType::Io114, 66_000_000),
                flags: part_flags::READ_CACHE_SEQ,
            },
            // MT29F2G01ABAGD (M70A family, ONFI-identified per S3): 8-bit
            // ECC, SR[4:6], 1-1-4 read and program-load picked at bind
            // time, 133 MHz ceiling.
            Part {
                model: "MT29F2G01ABAGD".into(),
                aliases: vec![],
                id: FlashId::new(IdFraming::Dummy, &[0x2C, 0x24]),
                memory_org: MemoryOrg::bind(2048, 128, 64, 2048, 1, 1, 1).unwrap(),
                ecc: Some(EccConfig::new(512, 8)),
                ecc_decoder: "micron-8bit",
                page_layout: PageLayout::simple(2048, 128, 64),
                bbm: BbmConfig::first_page_only(0),
                nops_per_page: 4,
                qe: QeType::ConfigBit(0),
                read_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x03)
                    .with(IoType::Io112, 0x3B)
                    .with(IoType::Io114, 0x6B),
                // M70A replaces program-load-x2 (0x32) with 0xa2 and
                // random-load-x2 (0x34) with 0x44.
                program_load_opcodes: OpcodeTable::new()
                    .with(IoType::Io111, 0x02)
                    .with(IoType::Io114, 0xA2),
                max_clock: ClockTable::new()
                    .with(IoType::Io111, 133_000_000)
                    .with(IoType::Io114, 133_000_000),
                flags: part_flags::READ_CACHE_SEQ | part_flags::READ_CACHE_RANDOM,
            },
        ],
    )
    .with_pp_post_init(pp_post_init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pp_post_init_confirms_m70a_io_caps() {
        let vendor = vendor();
        let mut part = vendor.find_part(&[0x2C, 0x24, 0x00]).unwrap().clone();
        (vendor.pp_post_init.unwrap())(&mut part);
        assert_eq!(part.read_opcodes.opcode_for(IoType::Io114), Some(0x6B));
        assert_eq!(part.program_load_opcodes.opcode_for(IoType::Io114), Some(0xA2));
        assert_eq!(part.max_clock.max_hz_for(IoType::Io114), Some(133_000_000));
    }

    #[test]
    fn pp_post_init_leaves_1bit_family_untouched() {
        let vendor = vendor();
        let mut part = vendor.find_part(&[0x2C, 0x14, 0x00]).unwrap().clone();
        let before = part.max_clock.max_hz_for(IoType::Io111);
        (vendor.pp_post_init.unwrap())(&mut part);
        assert_eq!(part.max_clock.max_hz_for(IoType::Io111), before);
    }
}
