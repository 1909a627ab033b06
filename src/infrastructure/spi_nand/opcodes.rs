//! SPI-NAND opcode and feature-register constants (spec §4.4). Bit-exact;
//! reproduced verbatim rather than re-derived, since datasheets disagree on
//! naming but agree on these values.

pub const RESET: u8 = 0xFF;
pub const GET_FEATURE: u8 = 0x0F;
pub const SET_FEATURE: u8 = 0x1F;
pub const READ_ID: u8 = 0x9F;
pub const SELECT_DIE: u8 = 0xC2;
pub const READ_TO_CACHE: u8 = 0x13;

/// `READ_FROM_CACHE` opcode variants, one per I/O width.
pub const READ_FROM_CACHE_1_1_1: u8 = 0x03;
pub const READ_FROM_CACHE_1_1_1_FAST: u8 = 0x0B;
pub const READ_FROM_CACHE_1_1_2: u8 = 0x3B;
pub const READ_FROM_CACHE_1_2_2: u8 = 0xBB;
pub const READ_FROM_CACHE_1_1_4: u8 = 0x6B;
pub const READ_FROM_CACHE_1_4_4: u8 = 0xEB;

pub const READ_FROM_CACHE_SEQ: u8 = 0x31;
pub const READ_FROM_CACHE_END: u8 = 0x3F;

pub const WRITE_ENABLE: u8 = 0x06;
pub const WRITE_DISABLE: u8 = 0x04;

pub const PROGRAM_LOAD: u8 = 0x02;
pub const PROGRAM_LOAD_QUAD: u8 = 0x32;
pub const RND_PROGRAM_LOAD: u8 = 0x84;
pub const RND_PROGRAM_LOAD_QUAD: u8 = 0x34;
pub const PROGRAM_EXECUTE: u8 = 0x10;

pub const BLOCK_ERASE: u8 = 0xD8;

// --- Feature addresses ---
pub const FEATURE_PROTECT: u8 = 0xA0;
pub const FEATURE_CONFIG: u8 = 0xB0;
pub const FEATURE_STATUS: u8 = 0xC0;

// --- STATUS (0xC0) bits ---
pub const STATUS_OIP: u8 = 0x01;
pub const STATUS_WEL: u8 = 0x02;
pub const STATUS_ERASE_FAIL: u8 = 0x04;
pub const STATUS_PROGRAM_FAIL: u8 = 0x08;
/// Vendor-dependent: either bits [5:4] or [6:4], see `ecc_status_mask`.
pub const STATUS_ECC_MASK_2BIT: u8 = 0x30;
pub const STATUS_ECC_MASK_3BIT: u8 = 0x70;

// --- CONFIG (0xB0) bits ---
pub const CONFIG_QUAD_EN: u8 = 0x01;
pub const CONFIG_ECC_EN: u8 = 0x10;
pub const CONFIG_OTP_EN: u8 = 0x40;
pub const CONFIG_OTP_LOCK: u8 = 0x80;
/// Micron variant: OTP-enter sets both 0x80 and 0x02.
pub const CONFIG_OTP_EN_MICRON: u8 = 0x82;
pub const CONFIG_OTP_LOCK_MICRON: u8 = 0xC2;

/// OTP page holding the ONFI-like parameter page on parts that use page 1
/// (most parts use page 1 — cross-checked
/// against `original_source/flash/nand/spi-nand/vendor.c`, which reads
/// page 1 unconditionally except for a short vendor override list).
pub const OTP_PAGE_PARAM_PAGE: u32 = 1;

/// Timeouts (§5), in microseconds.
pub const RESET_TIMEOUT_US: u64 = 1_000_000;
pub const DEFAULT_R_TIMEOUT_US: u64 = 5_000_000;
pub const DEFAULT_PP_TIMEOUT_US: u64 = 5_000_000;
pub const DEFAULT_BE_TIMEOUT_US: u64 = 5_000_000;
