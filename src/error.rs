//! Error types for nander-rs
//!
//! This module defines all error types used throughout the library. The
//! variant set mirrors the error kinds a flash programmer core needs to
//! report precisely (device transport, flash protocol state, ECC outcome,
//! bad block management, and config/catalog parsing), on top of the
//! transport-level errors the original CH341A driver already surfaced.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nander-rs
#[derive(Error, Debug)]
pub enum Error {
    /// USB communication error
    #[error("USB error: {0}")]
    Usb(#[from] nusb::Error),

    /// Programmer not found
    #[error("Programmer not found. Is the device connected?")]
    ProgrammerNotFound,

    /// Flash chip not detected
    #[error("Flash chip not detected. Check connections and power.")]
    FlashNotDetected,

    /// Unsupported flash chip
    #[error("Unsupported flash chip: JEDEC ID = {0:02X} {1:02X} {2:02X}")]
    UnsupportedChip(u8, u8, u8),

    /// Verification failed
    #[error(
        "Verification failed at address 0x{address:08X}: expected {expected:02X}, got {actual:02X}"
    )]
    VerificationFailed {
        address: u32,
        expected: u8,
        actual: u8,
    },

    /// Erase failed
    #[error("Erase failed at block {block}")]
    EraseFailed { block: u32 },

    /// Write failed
    #[error("Write failed at address 0x{address:08X}")]
    WriteFailed { address: u32 },

    /// Read failed
    #[error("Read failed at address 0x{address:08X}")]
    ReadFailed { address: u32 },

    /// ECC error (uncorrectable)
    #[error("Uncorrectable ECC error at address 0x{address:08X}")]
    EccError { address: u32 },

    /// Bad block detected
    #[error("Bad block detected at block {block}")]
    BadBlock { block: u32 },

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(std::io::Error),

    /// Transfer error (raw USB)
    #[error("USB transfer error: {0}")]
    Transfer(#[from] nusb::transfer::TransferError),

    /// Operation or feature not supported by this driver/part
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Catch-all for conditions not covered by a dedicated variant
    #[error("{0}")]
    Other(String),

    // --- Device/transport kinds ---
    /// Device was present but has since disappeared (unplugged, reset)
    #[error("Device disconnected")]
    DeviceDisconnected,

    /// Low-level I/O failure talking to the device (distinct from a bad
    /// USB transfer: framing ack missing, GPIO readback mismatch, etc.)
    #[error("Device I/O error: {0}")]
    DeviceIoError(String),

    /// Device reported or requires a configuration this driver cannot honor
    #[error("Device configuration invalid: {0}")]
    DeviceInvalidConfig(String),

    /// A required piece of device configuration (clock, CS polarity, ...)
    /// was never supplied
    #[error("Device configuration missing: {0}")]
    DeviceMissingConfig(String),

    // --- Resource kinds ---
    /// Host-side allocation failure (buffer too large for the controller)
    #[error("Out of memory: {0}")]
    NoMem(String),

    /// Requested item (file, catalog entry, block) does not exist
    #[error("Not found: {0}")]
    NotExist(String),

    /// Requested item already exists (duplicate catalog entry, etc.)
    #[error("Already exists: {0}")]
    AlreadyExist(String),

    // --- ECC kinds ---
    /// ECC detected and corrected bit errors; data is valid but degrading
    #[error("ECC corrected {bit_flips} bit error(s) at {context}")]
    EccCorrected { context: String, bit_flips: u8 },

    /// ECC detected errors beyond the chip's correction capability
    #[error("ECC uncorrectable error at {0}")]
    EccUncorrectable(String),

    // --- Flash operation kinds ---
    /// Program operation failed (status register reported failure)
    #[error("Flash program failed at 0x{address:08X}")]
    FlashProgramFailed { address: u32 },

    /// Erase operation failed (status register reported failure)
    #[error("Flash erase failed at block {block}")]
    FlashEraseFailed { block: u32 },

    /// Requested address range falls outside the part's addressable space
    #[error("Address out of range: 0x{address:08X} (capacity {capacity:#x})")]
    FlashAddressOutOfRange { address: u64, capacity: u64 },

    /// Detected ID does not match the part the caller asked for
    #[error("Part mismatch: expected {expected}, detected {detected}")]
    FlashPartMismatch { expected: String, detected: String },

    /// Detected ID does not match any known part in the catalog
    #[error("Part not recognised: ID bytes {0:02X?}")]
    FlashPartNotRecognised(Vec<u8>),

    /// Read-back verification did not match what was written
    #[error("Data verification failed at 0x{address:08X}")]
    DataVerificationFail { address: u64 },

    // --- Module lifecycle kinds ---
    /// A resource (bus, controller) is already claimed by another operation
    #[error("Module in use: {0}")]
    ModuleInUse(String),

    /// A module's initialization routine failed
    #[error("Module init failed: {0}")]
    ModuleInitFail(String),

    // --- Catalog/config parsing kinds ---
    /// JSON value present but of the wrong type
    #[error("JSON type invalid: {0}")]
    JsonTypeInvalid(String),

    /// JSON value of the right type but semantically invalid
    #[error("JSON data invalid: {0}")]
    JsonDataInvalid(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonTypeInvalid(e.to_string())
    }
}
