//! Infrastructure - SPI-NAND operational core (component D)
//!
//! This is the centerpiece of the crate: identification, opcode
//! selection, the read-to-cache/program-load/erase state machine, ECC
//! status retrieval, die/plane addressing, and OTP/UID access for SPI-NAND
//! parts. Everything here is driven through the `Controller` trait
//! (component A/B); no direct USB or byte-level `Programmer` calls.
//!
//! Identified parts plug into the existing bad-block table
//! (`infrastructure::bbt`), generic NAND layer (`infrastructure::nand`)
//! and basic FTL (`application::ftl`) through the `NandAccess` and
//! `MarkerReader` traits, so none of that stack needed to change to gain
//! a real chip behind it.

pub mod catalog;
pub mod core;
pub mod opcodes;
pub mod param_page;

pub use catalog::{Catalog, Identified};
pub use core::{probe_id, EccReadStatus, SpiNandCore};
