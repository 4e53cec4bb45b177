//! Error types for trackball-config-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Report buffer has the wrong length.
    #[error("frame error: expected {expected} bytes, got {actual}")]
    Frame { expected: usize, actual: usize },

    /// Report buffer carries an unexpected report ID.
    #[error("frame error: expected report ID {expected}, got {actual}")]
    ReportId { expected: u8, actual: u8 },

    /// Configuration version byte is not the supported one.
    #[error("unsupported config version {actual} (supported: {expected})")]
    Version { expected: u8, actual: u8 },

    /// CRC-32 over the payload does not match the trailing checksum.
    #[error("checksum mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}")]
    Checksum { stored: u32, computed: u32 },

    /// A wire code has no mapping in the field's enumeration.
    #[error("unknown value for {field}: {value}")]
    UnknownEnumValue { field: &'static str, value: i8 },

    /// Decoded value out of range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    Range {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    /// Value rejected before encoding.
    #[error("invalid value: {field} = {value} (allowed {min}..={max})")]
    Validation {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Permission denied (hidraw node not accessible, or exclusive access on Windows).
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
