//! Infrastructure - Chip Database
//!
//! Registry of supported flash chips, keyed by JEDEC ID, for the legacy
//! NOR/NAND/EEPROM byte-protocol paths. NAND parts that also carry a
//! richer `domain::nand::Part` record are additionally resolvable through
//! `crate::infrastructure::spi_nand::catalog`.

pub mod eeprom;
pub mod nand;
pub mod nor;
pub mod registry;

pub use registry::ChipRegistry;
