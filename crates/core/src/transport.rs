//! HID feature report transport abstraction.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface. The transport only moves bytes;
//! all interpretation happens in [`crate::codec`].

use crate::codec::{self, REPORT_ID, REPORT_LEN};
use crate::config::ConfigRecord;
use crate::error::Result;
use tracing::{debug, trace};

/// Abstraction over HID feature report I/O.
pub trait FeatureTransport: Send {
    /// Read feature report `report_id`. The returned buffer starts with the
    /// report ID and is at most `len` bytes long.
    fn read_feature_report(&self, report_id: u8, len: usize) -> Result<Vec<u8>>;

    /// Send a feature report. `data[0]` is the report ID.
    fn write_feature_report(&self, data: &[u8]) -> Result<()>;
}

/// Read the configuration from the device.
pub fn load_config(transport: &dyn FeatureTransport) -> Result<ConfigRecord> {
    let raw = transport.read_feature_report(REPORT_ID, REPORT_LEN)?;
    trace!(report_hex = format_args!("{:02X?}", raw), "Config RX");

    let record = codec::decode(&raw)?;
    debug!("Loaded configuration from device");
    Ok(record)
}

/// Write a configuration to the device.
///
/// The record is encoded (and therefore validated) before any I/O.
pub fn save_config(transport: &dyn FeatureTransport, record: &ConfigRecord) -> Result<()> {
    let encoded = codec::encode(record)?;
    trace!(report_hex = format_args!("{:02X?}", encoded), "Config TX");

    transport.write_feature_report(&encoded)?;
    debug!("Saved configuration to device");
    Ok(())
}
