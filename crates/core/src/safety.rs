//! Safety layer: validates a configuration before it is encoded and sent
//! to the device.
//!
//! # Trackball Bounds
//!
//! ## CPI
//! - **Range**: 1 – 120, stored in hundreds (100 – 12,000 counts per inch)
//! - **Default**: 1 (100 CPI)
//! - **Note**: 0 and values above 120 are rejected on encode and on decode.
//!
//! ## Enumerated fields
//! - Typed in [`crate::config`], so any value a caller can build is valid.
//!
//! ## Version
//! - Only [`CONFIG_VERSION`] is ever written.
//!
//! All validation happens BEFORE any HID communication.

use crate::config::{ConfigRecord, CONFIG_VERSION};
use crate::error::{Error, Result};

/// Sensor resolution bounds, in hundreds of CPI.
pub const CPI_MIN: u8 = 1;
pub const CPI_MAX: u8 = 120;

/// Warning shown before any write to the device.
pub const WRITE_DISCLAIMER: &str = "\
WARNING: This overwrites the complete configuration of the trackball. \
Every field is range-checked before sending, but a firmware that does not \
match config version 1 may misinterpret the report.";

pub fn cpi_in_range(cpi: u8) -> bool {
    (CPI_MIN..=CPI_MAX).contains(&cpi)
}

/// Validate a CPI value against safe bounds.
pub fn validate_cpi(field: &'static str, cpi: u8) -> Result<u8> {
    if !cpi_in_range(cpi) {
        return Err(Error::Validation {
            field,
            value: cpi,
            min: CPI_MIN,
            max: CPI_MAX,
        });
    }
    Ok(cpi)
}

/// Validate a whole record before encoding.
///
/// Checks:
/// 1. Version is the supported one
/// 2. Both CPI fields are within [`CPI_MIN`]..=[`CPI_MAX`]
pub fn validate_record(record: &ConfigRecord) -> Result<()> {
    if record.version != CONFIG_VERSION {
        return Err(Error::Version {
            expected: CONFIG_VERSION,
            actual: record.version,
        });
    }
    validate_cpi("ball_cpi", record.ball_cpi)?;
    validate_cpi("ball_cpi_shifted", record.ball_cpi_shifted)?;
    Ok(())
}
