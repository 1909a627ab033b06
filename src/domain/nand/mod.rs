//! Domain model for SPI-NAND parts: identification, memory geometry, ECC
//! geometry, page layout, bad-block-marker configuration, and the
//! complete per-model `Part` record that ties them together.

pub mod bbm;
pub mod ecc_config;
pub mod flash_id;
pub mod layout;
pub mod memory_org;
pub mod part;

pub use bbm::{BbmConfig, BbmFlags};
pub use ecc_config::EccConfig;
pub use flash_id::{FlashId, IdFraming, PROBE_FRAMINGS, PROBE_RETRIES_PER_FRAMING};
pub use layout::{LayoutEntry, LayoutEntryType, PageLayout};
pub use memory_org::{AddressParts, MemoryOrg};
pub use part::{flags as part_flags, ClockTable, OpcodeTable, Part, QeType};
