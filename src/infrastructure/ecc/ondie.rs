//! Generic on-die ECC decoders used by the long tail of vendors whose
//! datasheets describe the same handful of common encodings (Dosilicon,
//! Fidelix, ESMT, Etron, Foresee, HeYangTek, ISSI, Zetta, XTX, Paragon,
//! Alliance Memory, ATO, CoreStorage, Fudan, MK, and others not otherwise
//! special-cased).

use super::EccDriver;
use crate::domain::ecc::EccStatus;

/// SR[4] = errors corrected, SR[5] = uncorrectable. The single
/// correction bit means the chip doesn't report *how many* bits were
/// fixed, so we report the maximum its ECC engine can guarantee: 1.
pub struct GenericOneBit;

impl EccDriver for GenericOneBit {
    fn name(&self) -> &'static str {
        "ondie-generic-1bit"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        let uncorrectable = status_reg & (1 << 5) != 0;
        let corrected = status_reg & (1 << 4) != 0;
        if uncorrectable {
            EccStatus::Uncorrectable
        } else if corrected {
            EccStatus::Corrected { bit_flips: 1 }
        } else {
            EccStatus::NoError
        }
    }
}

/// SR[4:5] two-bit encoding: 00 no error, 01 1-3 bits corrected, 10
/// reserved/4-6 bits corrected, 11 uncorrectable. This is the most
/// common encoding across the long tail of SPI-NAND vendors.
pub struct GenericTwoBit;

impl EccDriver for GenericTwoBit {
    fn name(&self) -> &'static str {
        "ondie-generic-2bit"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b11 {
            0b00 => EccStatus::NoError,
            0b01 => EccStatus::Corrected { bit_flips: 3 },
            0b10 => EccStatus::Corrected { bit_flips: 6 },
            _ => EccStatus::Uncorrectable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_decodes_all_three_states() {
        let d = GenericOneBit;
        assert_eq!(d.decode_status_register(0b0000_0000), EccStatus::NoError);
        assert_eq!(
            d.decode_status_register(0b0001_0000),
            EccStatus::Corrected { bit_flips: 1 }
        );
        assert_eq!(
            d.decode_status_register(0b0010_0000),
            EccStatus::Uncorrectable
        );
    }

    #[test]
    fn two_bit_decodes_all_four_states() {
        let d = GenericTwoBit;
        assert_eq!(d.decode_status_register(0b0000_0000), EccStatus::NoError);
        assert_eq!(
            d.decode_status_register(0b0001_0000),
            EccStatus::Corrected { bit_flips: 3 }
        );
        assert_eq!(
            d.decode_status_register(0b0010_0000),
            EccStatus::Corrected { bit_flips: 6 }
        );
        assert_eq!(
            d.decode_status_register(0b0011_0000),
            EccStatus::Uncorrectable
        );
    }
}
