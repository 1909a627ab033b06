//! Infrastructure - ECC status driver (component G)
//!
//! Every SPI-NAND vendor encodes the on-die ECC engine's per-page
//! verdict into the STATUS feature register (address 0xC0) a little
//! differently: which bits, how many levels of "corrected", and whether
//! a max-correction reading still counts as healthy or should be treated
//! as "about to fail". A handful of vendors (Macronix) additionally
//! expose a dedicated opcode that returns one byte per ECC step instead
//! of a single worst-case summary.
//!
//! `Part::ecc_decoder` names one of the decoders registered here; the
//! SPI-NAND core looks it up once at bind time and calls it after every
//! read that uses hardware ECC.

pub mod gigadevice;
pub mod macronix;
pub mod micron;
pub mod ondie;
pub mod toshiba;
pub mod winbond;

use crate::domain::ecc::EccStatus;

/// Decodes a vendor's ECC status encoding into the domain's `EccStatus`.
pub trait EccDriver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes the worst-case ECC verdict out of the STATUS feature
    /// register value read after a page read.
    fn decode_status_register(&self, status_reg: u8) -> EccStatus;

    /// Some vendors (Macronix) expose a secondary opcode returning one
    /// byte of detail per ECC step. Decoders that don't need this return
    /// `None`.
    fn per_step_opcode(&self) -> Option<u8> {
        None
    }

    /// Decodes the bytes returned by `per_step_opcode` into one
    /// `EccStatus` per step.
    fn decode_per_step(&self, _bytes: &[u8]) -> Vec<EccStatus> {
        Vec::new()
    }
}

/// Resolves a decoder by the name stored in `Part::ecc_decoder`.
pub fn lookup(name: &str) -> Option<Box<dyn EccDriver>> {
    match name {
        "ondie-generic-1bit" => Some(Box::new(ondie::GenericOneBit)),
        "ondie-generic-2bit" => Some(Box::new(ondie::GenericTwoBit)),
        "micron-1bit" => Some(Box::new(micron::Micron1Bit)),
        "micron-8bit" => Some(Box::new(micron::Micron8Bit)),
        "macronix" => Some(Box::new(macronix::Macronix::default())),
        "gigadevice-v1" => Some(Box::new(gigadevice::GigaDeviceV1)),
        "gigadevice-v2" => Some(Box::new(gigadevice::GigaDeviceV2)),
        "gigadevice-v3" => Some(Box::new(gigadevice::GigaDeviceV3)),
        "winbond-1bit" => Some(Box::new(winbond::Winbond1Bit)),
        "winbond-4bit" => Some(Box::new(winbond::Winbond4Bit)),
        "winbond-8bit" => Some(Box::new(winbond::Winbond8Bit)),
        "toshiba" => Some(Box::new(toshiba::Toshiba)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_names() {
        assert!(lookup("ondie-generic-1bit").is_some());
        assert!(lookup("macronix").is_some());
        assert!(lookup("does-not-exist").is_none());
    }
}
