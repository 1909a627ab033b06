//! Infrastructure - NAND generic layer (component E)
//!
//! Page/block arithmetic and the operations that work the same way on
//! every SPI-NAND part regardless of vendor: bad-block-marker check and
//! write, and the torture test used to validate a block before trusting
//! it. These all work in terms of `NandAccess`, the minimal raw
//! read/program/erase surface the SPI-NAND core (component D) provides,
//! so this module has no dependency on any specific core implementation.

pub mod generic;

pub use generic::{torture_block, NandAccess, TortureOutcome};
