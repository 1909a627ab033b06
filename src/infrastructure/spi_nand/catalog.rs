//! Part catalog and identification (component C + the identification half
//! of component D): aggregates the built-in vendor tables with any
//! user-supplied extension catalog, and implements the vendor resolution
//! order — try each READ_ID framing in turn (3 retries
//! per framing before moving on), match the first ID byte against a
//! vendor's `mfr_id`, then match the remaining bytes against one of that
//! vendor's parts.
//!
//! Extension vendors are searched before built-ins, so a user-supplied
//! catalog entry can override a built-in part sharing the same ID bytes.

use log::trace;

use crate::domain::nand::flash_id::MAX_ID_LEN;
use crate::domain::nand::{IdFraming, Part, PROBE_FRAMINGS, PROBE_RETRIES_PER_FRAMING};
use crate::error::{Error, Result};
use crate::infrastructure::chip_database::nand::{builtin_vendors, ext_catalog, VendorDef};
use crate::infrastructure::spi_mem::Controller;

use super::core::read_id_once;

/// The full set of vendors a part can be identified against: built-ins
/// plus whatever extension catalog the caller loaded.
pub struct Catalog {
    extension_vendors: Vec<VendorDef>,
    builtin_vendors: Vec<VendorDef>,
}

/// A successful identification: the matched part, the die count implied
/// by its memory organization (chip_size / lun_size), and the READ_ID
/// framing it was found with.
#[derive(Clone)]
pub struct Identified {
    pub part: Part,
    pub die_count: u32,
    pub framing: IdFraming,
    pub raw_id: Vec<u8>,
    /// The matched vendor's `pp_post_init` hook, carried through so the
    /// attach sequence can apply it once the ONFI-like parameter page
    /// validates (spec.md §4.4 step 4).
    pub pp_post_init: Option<fn(&mut Part)>,
}

impl std::fmt::Debug for Identified {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identified")
            .field("part", &self.part)
            .field("die_count", &self.die_count)
            .field("framing", &self.framing)
            .field("raw_id", &self.raw_id)
            .field("pp_post_init", &self.pp_post_init.map(|_| "fn(&mut Part)"))
            .finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            extension_vendors: Vec::new(),
            builtin_vendors: builtin_vendors(),
        }
    }

    /// Parses `json` as an extension catalog document
    /// and adds its vendors ahead of the built-ins in resolution order.
    pub fn load_extension(&mut self, json: &str) -> Result<()> {
        let mut vendors = ext_catalog::parse(json)?;
        self.extension_vendors.append(&mut vendors);
        Ok(())
    }

    fn vendors(&self) -> impl Iterator<Item = &VendorDef> {
        self.extension_vendors.iter().chain(self.builtin_vendors.iter())
    }

    fn find(&self, raw: &[u8]) -> Option<(&Part, Option<fn(&mut Part)>)> {
        let mfr_id = *raw.first()?;
        self.vendors()
            .filter(|v| v.mfr_id == mfr_id)
            .find_map(|v| v.find_part(raw).map(|part| (part, v.pp_post_init)))
    }

    /// Identifies whatever part is attached to `controller`, per the vendor
    /// §4.3/§4.4 step 2: 3 READ_ID framings, 3 retries each, first byte
    /// matched against a vendor's `mfr_id` before the remainder is matched
    /// against that vendor's parts.
    pub fn identify<C: Controller>(&self, controller: &mut C) -> Result<Identified> {
        let mut last_err = None;
        for framing in PROBE_FRAMINGS {
            for _ in 0..PROBE_RETRIES_PER_FRAMING {
                match read_id_once(controller, framing, MAX_ID_LEN) {
                    Ok(raw) => {
                        trace!("spi-nand catalog: READ_ID {framing:?} -> {raw:02X?}");
                        if let Some((part, pp_post_init)) = self.find(&raw) {
                            let die_count = part.memory_org.luns_per_cs.max(1);
                            return Ok(Identified {
                                part: part.clone(),
                                die_count,
                                framing,
                                raw_id: raw,
                                pp_post_init,
                            });
                        }
                    }
                    Err(e) => last_err = Some(e),
                }
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Err(Error::NotExist("no catalog part matched the device's READ_ID response".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spi_mem::SpiMemOp;
    use crate::infrastructure::spi_mem::ControllerCaps;

    /// Replies to READ_ID with a fixed byte sequence regardless of framing,
    /// mimicking a GigaDevice-style dummy-byte part.
    struct FixedIdController {
        bytes: Vec<u8>,
    }

    impl Controller for FixedIdController {
        fn name(&self) -> &str {
            "fixed-id-test-controller"
        }

        fn exec(&mut self, op: &SpiMemOp, buf: &mut [u8]) -> Result<()> {
            let _ = op;
            for (slot, b) in buf.iter_mut().zip(self.bytes.iter().cycle()) {
                *slot = *b;
            }
            Ok(())
        }

        fn supports(&self, _op: &SpiMemOp) -> bool {
            true
        }

        fn caps(&self) -> ControllerCaps {
            ControllerCaps::default()
        }
    }

    #[test]
    fn identifies_builtin_gigadevice_part() {
        let catalog = Catalog::new();
        let mut controller = FixedIdController {
            bytes: vec![0xC8, 0xB1],
        };
        let found = catalog.identify(&mut controller).unwrap();
        assert_eq!(found.part.model.contains("GD5F1G"), true);
    }

    #[test]
    fn extension_catalog_overrides_resolution_order() {
        let mut catalog = Catalog::new();
        catalog
            .load_extension(
                r#"{
                "vendors": {
                    "acme": {
                        "mfr-id": 200,
                        "name": "Acme",
                        "parts": [{
                            "model": "ACME-OVERRIDE",
                            "id": [200, 1],
                            "id-type": "with-dummy-byte",
                            "read-opcodes": {"1-1-1": {"opcode": 3}},
                            "pl-opcodes": {"1-1-1": {"opcode": 2}},
                            "page-layout": [
                                {"type": "data", "count": 2048},
                                {"type": "marker", "count": 2},
                                {"type": "oob-free", "count": 62}
                            ],
                            "memory-organization": {
                                "page-size": 2048, "oob-size": 64,
                                "pages-per-block": 64, "blocks-per-lun": 1024
                            }
                        }]
                    }
                }
            }"#,
            )
            .unwrap();
        let mut controller = FixedIdController { bytes: vec![0xC8, 0x01] };
        let found = catalog.identify(&mut controller).unwrap();
        assert_eq!(found.part.model, "ACME-OVERRIDE");
    }

    #[test]
    fn identify_carries_vendor_pp_post_init_when_present() {
        let catalog = Catalog::new();
        let mut controller = FixedIdController { bytes: vec![0x2C, 0x24] };
        let found = catalog.identify(&mut controller).unwrap();
        assert_eq!(found.part.model, "MT29F2G01ABAGD");
        assert!(found.pp_post_init.is_some());
    }

    #[test]
    fn identify_leaves_pp_post_init_none_for_vendors_without_one() {
        let catalog = Catalog::new();
        let mut controller = FixedIdController { bytes: vec![0xC8, 0xB1] };
        let found = catalog.identify(&mut controller).unwrap();
        assert!(found.pp_post_init.is_none());
    }

    #[test]
    fn unknown_id_returns_not_exist() {
        let catalog = Catalog::new();
        let mut controller = FixedIdController { bytes: vec![0x00, 0x00] };
        let err = catalog.identify(&mut controller).unwrap_err();
        assert!(matches!(err, Error::NotExist(_)));
    }
}
