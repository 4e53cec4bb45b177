//! Device discovery.

use crate::error::{Error, Result};
use crate::{TRACKBALL_PID, TRACKBALL_VID};
use tracing::{debug, info};

/// Information about a discovered trackball.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vid: u16,
    pub pid: u16,
    /// Platform HID path, used to open this exact device.
    pub path: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial: Option<String>,
}

impl DeviceInfo {
    /// Human-readable label: "manufacturer product", falling back to the
    /// USB IDs when the device reports no strings.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [self.manufacturer.as_deref(), self.product.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            format!("USB device {:04x}:{:04x}", self.vid, self.pid)
        } else {
            parts.join(" ")
        }
    }
}

/// Whether a USB vendor/product pair is the supported trackball.
pub fn is_supported(vid: u16, pid: u16) -> bool {
    vid == TRACKBALL_VID && pid == TRACKBALL_PID
}

/// Discover all connected trackballs.
///
/// A composite device may expose several HID interfaces; each one is
/// listed with its own path.
pub fn discover_devices() -> Result<Vec<DeviceInfo>> {
    debug!("Starting HID device enumeration");
    let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;

    let mut devices = Vec::new();
    for info in api.device_list() {
        if !is_supported(info.vendor_id(), info.product_id()) {
            continue;
        }

        let device = DeviceInfo {
            vid: info.vendor_id(),
            pid: info.product_id(),
            path: info.path().to_string_lossy().into_owned(),
            manufacturer: info.manufacturer_string().map(|s| s.to_string()),
            product: info.product_string().map(|s| s.to_string()),
            serial: info.serial_number().map(|s| s.to_string()),
        };
        info!(
            label = %device.label(),
            vid = format_args!("0x{:04X}", device.vid),
            pid = format_args!("0x{:04X}", device.pid),
            path = %device.path,
            "Found trackball"
        );
        devices.push(device);
    }

    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}
