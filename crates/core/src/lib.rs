//! trackball-config-core: configuration model, feature report codec, and
//! device access for the 0xCAFE:0xBAFA trackball.
//!
//! The whole device configuration travels as a single 23-byte HID feature
//! report protected by a CRC-32. [`codec`] converts between that report and
//! a [`config::ConfigRecord`]; [`transport`] moves the bytes.

pub mod codec;
pub mod comm;
pub mod config;
pub mod device;
pub mod error;
pub mod safety;
pub mod transport;

/// Trackball USB Vendor ID.
pub const TRACKBALL_VID: u16 = 0xCAFE;

/// Trackball USB Product ID.
pub const TRACKBALL_PID: u16 = 0xBAFA;
