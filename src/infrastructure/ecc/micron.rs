//! Micron SPI-NAND ECC status decoders (M68A/M69A/M60A 1-bit class,
//! M78A/M79A/M70A 8-bit class).

use super::EccDriver;
use crate::domain::ecc::EccStatus;

/// M68A/M69A/M60A: SR[4:5], two-bit encoding. `11` is reserved on these
/// parts rather than uncorrectable-with-data-loss; Micron's own driver
/// treats it as uncorrectable to be safe, and so do we.
pub struct Micron1Bit;

impl EccDriver for Micron1Bit {
    fn name(&self) -> &'static str {
        "micron-1bit"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b11 {
            0b00 => EccStatus::NoError,
            0b01 => EccStatus::Corrected { bit_flips: 1 },
            _ => EccStatus::Uncorrectable,
        }
    }
}

/// M78A/M79A/M70A: SR[4:6], three-bit encoding. Only `0`, `1`, `3`, `5`
/// are defined codes (0/3/6/8 bitflips respectively); every other value,
/// including the unused codes in between, is uncorrectable.
pub struct Micron8Bit;

impl EccDriver for Micron8Bit {
    fn name(&self) -> &'static str {
        "micron-8bit"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b111 {
            0b000 => EccStatus::NoError,
            0b001 => EccStatus::Corrected { bit_flips: 3 },
            0b011 => EccStatus::Corrected { bit_flips: 6 },
            0b101 => EccStatus::Corrected { bit_flips: 8 },
            _ => EccStatus::Uncorrectable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micron_1bit_reserved_is_uncorrectable() {
        let d = Micron1Bit;
        assert_eq!(d.decode_status_register(0b0011_0000), EccStatus::Uncorrectable);
        assert_eq!(d.decode_status_register(0b0010_0000), EccStatus::Uncorrectable);
    }

    #[test]
    fn micron_1bit_corrected_reports_strength() {
        let d = Micron1Bit;
        assert_eq!(d.decode_status_register(0b0001_0000), EccStatus::Corrected { bit_flips: 1 });
    }

    #[test]
    fn micron_8bit_maps_defined_codes() {
        let d = Micron8Bit;
        assert_eq!(d.decode_status_register(0b0000_0000), EccStatus::NoError);
        assert_eq!(d.decode_status_register(0b0001_0000), EccStatus::Corrected { bit_flips: 3 });
        assert_eq!(d.decode_status_register(0b0011_0000), EccStatus::Corrected { bit_flips: 6 });
        assert_eq!(d.decode_status_register(0b0101_0000), EccStatus::Corrected { bit_flips: 8 });
    }

    #[test]
    fn micron_8bit_undefined_codes_are_uncorrectable() {
        let d = Micron8Bit;
        assert_eq!(d.decode_status_register(0b0010_0000), EccStatus::Uncorrectable);
        assert_eq!(d.decode_status_register(0b0100_0000), EccStatus::Uncorrectable);
        assert_eq!(d.decode_status_register(0b0110_0000), EccStatus::Uncorrectable);
        assert_eq!(d.decode_status_register(0b0111_0000), EccStatus::Uncorrectable);
    }
}
