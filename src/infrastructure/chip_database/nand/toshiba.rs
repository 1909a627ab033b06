//! Toshiba/Kioxia SPI NAND Flash chips.
//!
//! Toshiba Manufacturer ID: 0x98. Not present in the original
//! vendor list; added to round out the built-in vendor enumeration
//! (`ecc_req.step_size = 512`, 8-bit strength, `bbm_config.flags |=
//! MARK_WHOLE_PAGE`, HSE bit).

use crate::domain::nand::*;
use crate::domain::spi_mem::IoType;

use super::vendor_def::VendorDef;

pub const MFR_ID: u8 = 0x98;
pub const MANUFACTURER_NAME: &str = "Toshiba";

pub fn vendor() -> VendorDef {
    VendorDef::new(
        MFR_ID,
        MANUFACTURER_NAME,
        vec![Part {
            model: "TC58CVG2S0H".into(),
            aliases: vec!["TH58CVG2S0H".into()],
            id: FlashId::new(IdFraming::Dummy, &[0x98, 0xCD]),
            memory_org: MemoryOrg::bind(4096, 256, 64, 2048, 1, 1, 2).unwrap(),
            ecc: Some(EccConfig::new(512, 8)),
            ecc_decoder: "toshiba",
            page_layout: PageLayout::simple(4096, 256, 128),
            // Toshiba parts require the whole page zeroed to mark a block
            // bad, not just the marker bytes.
            bbm: BbmConfig {
                flags: BbmFlags {
                    mark_whole_page: true,
                    canonical_layout: true,
                    ..Default::default()
                },
                ..BbmConfig::first_page_only(0)
            },
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
                .with(IoType::Io111, 100_000_000)
                .with(IoType::Io144, 100_000_000),
            flags: part_flags::READ_CACHE_RANDOM | part_flags::NOR_READ_CAP,
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_whole_page_flag_is_set() {
        let vendor = vendor();
        assert!(vendor.parts[0].bbm.flags.mark_whole_page);
    }
}
