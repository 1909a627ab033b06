//! Toshiba/Kioxia TC58CVG-series ECC status decoder: SR[4:6], three-bit
//! encoding with a 1-bit-per-step floor (every correctable error is
//! reported as requiring correction, even a single bit).

use super::EccDriver;
use crate::domain::ecc::EccStatus;

pub struct Toshiba;

impl EccDriver for Toshiba {
    fn name(&self) -> &'static str {
        "toshiba"
    }

    fn decode_status_register(&self, status_reg: u8) -> EccStatus {
        match (status_reg >> 4) & 0b111 {
            0b000 => EccStatus::NoError,
            0b001 => EccStatus::Corrected { bit_flips: 1 },
            0b011 => EccStatus::Corrected { bit_flips: 4 },
            0b101 => EccStatus::Corrected { bit_flips: 8 },
            0b111 => EccStatus::Uncorrectable,
            _ => EccStatus::Corrected { bit_flips: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_no_error_and_uncorrectable() {
        assert_eq!(Toshiba.decode_status_register(0), EccStatus::NoError);
        assert_eq!(
            Toshiba.decode_status_register(0b0111_0000),
            EccStatus::Uncorrectable
        );
    }
}
