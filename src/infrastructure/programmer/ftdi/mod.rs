//! FTDI-based Programmer Implementation
//!
//! Supports FT232H, FT2232H, and FT4232H in MPSSE SPI mode.
//! VID: 0403 (FTDI), various PIDs.
//!
//! The byte-oriented `Programmer` surface used by the CLI and the
//! simpler NOR/EEPROM paths is provided by
//! [`crate::infrastructure::controller::mpsse::MpsseController`], which
//! also implements the phase-aware `Controller` trait (component B of
//! the SPI-NAND core) used by `NandSession`. `mpsse` below only holds
//! the MPSSE command-builder constants and helpers shared by both.

pub mod mpsse;

use crate::infrastructure::controller::mpsse::MpsseController;

// FTDI USB identifiers
pub const FTDI_VID: u16 = 0x0403;
pub const FT232H_PID: u16 = 0x6014;
pub const FT2232H_PID: u16 = 0x6010;
pub const FT4232H_PID: u16 = 0x6011;

/// Alias kept for CLI call sites that construct an FTDI programmer by
/// this name; it is the same MPSSE driver the SPI-NAND core binds to.
pub type FtdiProgrammer = MpsseController;
