//! NAND Chip Database - Manufacturer Modules
//!
//! Two catalogs live side by side here: the legacy `ChipSpec` table
//! (`get_all_nand`), kept for the byte-oriented NOR/EEPROM-style
//! presentation paths, and the richer `VendorDef`/`Part` catalog
//! (`builtin_vendors`) component C actually binds SPI-NAND parts from.

pub mod esmt;
pub mod etron;
pub mod ext_catalog;
pub mod foresee;
pub mod gigadevice;
pub mod macronix;
pub mod micron;
pub mod others;
pub mod toshiba;
pub mod vendor_def;
pub mod winbond;
pub mod xtx;

use crate::domain::ChipSpec;
pub use vendor_def::VendorDef;

pub fn get_all_nand() -> Vec<ChipSpec> {
    let mut chips = Vec::new();
    chips.extend(gigadevice::get_chips());
    chips.extend(winbond::get_chips());
    chips.extend(micron::get_chips());
    chips.extend(others::get_chips());
    chips
}

/// Every vendor this crate ships a built-in `Part` catalog for
/// §4.3's enumerated vendor list). Order is not significant here —
/// `infrastructure::spi_nand::catalog::Catalog` decides resolution order.
pub fn builtin_vendors() -> Vec<VendorDef> {
    let mut vendors = vec![
        gigadevice::vendor(),
        micron::vendor(),
        winbond::vendor(),
        macronix::vendor(),
        toshiba::vendor(),
        esmt::vendor(),
        etron::vendor(),
        foresee::vendor(),
        xtx::vendor(),
    ];
    vendors.extend(others::all_vendors());
    vendors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vendors_are_all_non_empty() {
        for vendor in builtin_vendors() {
            assert!(!vendor.parts.is_empty(), "vendor {} has no parts", vendor.name);
        }
    }

    #[test]
    fn mfr_ids_consistent_with_part_ids() {
        for vendor in builtin_vendors() {
            for part in &vendor.parts {
                assert_eq!(
                    part.id.as_bytes().first().copied(),
                    Some(vendor.mfr_id),
                    "{}/{} has an ID byte 0 that doesn't match its vendor's mfr_id",
                    vendor.name,
                    part.model
                );
            }
        }
    }
}
