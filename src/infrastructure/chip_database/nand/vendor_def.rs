//! The `VendorDef` record: a manufacturer's contribution to the SPI-NAND
//! part catalog (component C).
//!
//! Unlike the legacy byte-oriented `ChipSpec` table each vendor file also
//! still exports (kept for the CLI/GUI presentation layer, which the core
//! does not own), a `VendorDef` carries full `domain::nand::Part` records:
//! memory organization, page layout, BBM configuration and ECC decoder
//! name, everything `infrastructure::spi_nand::core` needs to bind a part
//! without further per-vendor special-casing.
//!
//! `check_ecc` from the original vendor record shape is not carried
//! here as a function pointer: the ECC decoder is already a name
//! (`Part::ecc_decoder`) resolved against the `infrastructure::ecc`
//! registry (G), and that variant can differ between parts of the same
//! vendor (GigaDevice ships three distinct status encodings across its
//! own product generations), so it belongs on `Part`, not on `VendorDef`.

use crate::domain::nand::Part;

/// One manufacturer's entry in the built-in part catalog.
#[derive(Clone)]
pub struct VendorDef {
    /// First READ_ID byte this vendor's parts report.
    pub mfr_id: u8,
    pub name: &'static str,
    pub parts: Vec<Part>,
    /// Run once a matched part's ONFI-like parameter page validates
    /// (spec.md §4.4 step 4: "apply vendor pp_post_init"). Fixes up
    /// fields the catalog entry alone can't be trusted for ahead of
    /// parameter-page confirmation — IO caps, ECC strength, clock
    /// ceiling — for parts identified the ONFI way. Most vendors have
    /// nothing to adjust and leave this `None`.
    pub pp_post_init: Option<fn(&mut Part)>,
}

impl std::fmt::Debug for VendorDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorDef")
            .field("mfr_id", &self.mfr_id)
            .field("name", &self.name)
            .field("parts", &self.parts)
            .field("pp_post_init", &self.pp_post_init.map(|_| "fn(&mut Part)"))
            .finish()
    }
}

impl VendorDef {
    pub fn new(mfr_id: u8, name: &'static str, parts: Vec<Part>) -> Self {
        Self { mfr_id, name, parts, pp_post_init: None }
    }

    /// Attaches a `pp_post_init` hook, run after this vendor's ONFI-like
    /// parameter page validates.
    pub fn with_pp_post_init(mut self, f: fn(&mut Part)) -> Self {
        self.pp_post_init = Some(f);
        self
    }

    /// Finds the part whose stored ID is consistent with `probed`
    /// (raw, unnormalized READ_ID bytes), per the vendor
    /// resolution order: byte 0 already matched `mfr_id` by the time a
    /// caller reaches here.
    pub fn find_part(&self, probed: &[u8]) -> Option<&Part> {
        self.parts.iter().find(|p| p.id.matches(probed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nand::*;
    use crate::domain::spi_mem::IoType;

    fn sample_part(id: &[u8]) -> Part {
        Part {
            model: "TEST".into(),
            aliases: vec![],
            id: FlashId::new(IdFraming::Dummy, id),
            memory_org: MemoryOrg::bind(2048, 64, 64, 1024, 1, 1, 1).unwrap(),
            ecc: Some(EccConfig::new(512, 1)),
            ecc_decoder: "ondie-generic-1bit",
            page_layout: PageLayout::simple(2048, 64, 32),
            bbm: BbmConfig::first_page_only(0),
            nops_per_page: 1,
            qe: QeType::None,
            read_opcodes: OpcodeTable::new().with(IoType::Io111, 0x03),
            program_load_opcodes: OpcodeTable::new().with(IoType::Io111, 0x02),
            max_clock: ClockTable::new().with(IoType::Io111, 50_000_000),
            flags: 0,
        }
    }

    #[test]
    fn find_part_matches_probed_bytes() {
        let vendor = VendorDef::new(0xC8, "GigaDevice", vec![sample_part(&[0xC8, 0xB1])]);
        assert!(vendor.find_part(&[0xC8, 0xB1, 0x00]).is_some());
        assert!(vendor.find_part(&[0xC8, 0xB2, 0x00]).is_none());
    }

    fn bump_clock(part: &mut Part) {
        part.max_clock = ClockTable::new().with(IoType::Io111, 133_000_000);
    }

    #[test]
    fn pp_post_init_defaults_to_none() {
        let vendor = VendorDef::new(0xC8, "GigaDevice", vec![sample_part(&[0xC8, 0xB1])]);
        assert!(vendor.pp_post_init.is_none());
    }

    #[test]
    fn with_pp_post_init_is_callable_from_vendor() {
        let vendor = VendorDef::new(0x2C, "Micron", vec![sample_part(&[0x2C, 0x24])]).with_pp_post_init(bump_clock);
        let mut part = sample_part(&[0x2C, 0x24]);
        (vendor.pp_post_init.unwrap())(&mut part);
        assert_eq!(part.max_clock.max_hz_for(IoType::Io111), Some(133_000_000));
    }
}
