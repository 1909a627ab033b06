//! GigaDevice GD5Fxxx ECC status decoders. GigaDevice's SPI-NAND line
//! spans three distinct status encodings across product generations; the
//! catalog tags each part with the variant its datasheet documents.

use super::EccDriver;
use crate::domain::ecc::EccStatus;

/// First-generation GD5F1GQ4xA-style parts: SR[4:5], two-bit encoding,
/// `11` reserved (treated as uncorrectable).
pub struct GigaDeviceV1;

impl EccDriver for GigaDeviceV1 {
    fn name(&self) -> &'static str {
        "gigadevice-v1"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b11 {
            0b00 => EccStatus::NoError,
            0b01 => EccStatus::Corrected { bit_flips: 1 },
            0b10 => EccStatus::Corrected { bit_flips: 2 },
            _ => EccStatus::Uncorrectable,
        }
    }
}

/// Second-generation GD5F-xGQ5xxxxx parts: SR[4:6], three-bit encoding
/// with a 4-bit-per-step correction ceiling.
pub struct GigaDeviceV2;

impl EccDriver for GigaDeviceV2 {
    fn name(&self) -> &'static str {
        "gigadevice-v2"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b111 {
            0b000 => EccStatus::NoError,
            0b001 => EccStatus::Corrected { bit_flips: 1 },
            0b010 => EccStatus::Corrected { bit_flips: 2 },
            0b011 => EccStatus::Corrected { bit_flips: 3 },
            0b100 => EccStatus::Corrected { bit_flips: 4 },
            0b111 => EccStatus::Uncorrectable,
            _ => EccStatus::Corrected { bit_flips: 4 },
        }
    }
}

/// Third-generation QuadSPI high-density parts (GD5F-xGQ6xxxxx and
/// later): SR[4:6] with an 8-bit-per-step ceiling, `101`/`110` reserved
/// and treated as the strongest reported correction.
pub struct GigaDeviceV3;

impl EccDriver for GigaDeviceV3 {
    fn name(&self) -> &'static str {
        "gigadevice-v3"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b111 {
            0b000 => EccStatus::NoError,
            0b001 => EccStatus::Corrected { bit_flips: 1 },
            0b010 => EccStatus::Corrected { bit_flips: 2 },
            0b011 => EccStatus::Corrected { bit_flips: 4 },
            0b100 => EccStatus::Corrected { bit_flips: 6 },
            0b111 => EccStatus::Uncorrectable,
            _ => EccStatus::Corrected { bit_flips: 8 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_reserved_bits_are_uncorrectable() {
        assert_eq!(GigaDeviceV1.decode_status_register(0b0011_0000), EccStatus::Uncorrectable);
    }

    #[test]
    fn v3_top_code_is_uncorrectable() {
        assert_eq!(GigaDeviceV3.decode_status_register(0b0111_0000), EccStatus::Uncorrectable);
        assert_eq!(
            GigaDeviceV3.decode_status_register(0b0000_0000),
            EccStatus::NoError
        );
    }
}
