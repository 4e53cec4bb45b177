//! Device communication helpers: error classification and retry.
//!
//! The codec never retries. Callers that want to re-read a configuration
//! after a timeout or a corrupted transfer opt in with [`load_with_retry`].

use crate::config::ConfigRecord;
use crate::error::{Error, Result};
use crate::transport::{load_config, FeatureTransport};
use tracing::{debug, warn};

/// Default retry attempts for [`load_with_retry`].
pub const MAX_RETRIES: u32 = 3;

/// Classification of communication errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient errors that may succeed on retry (timeout, busy).
    Transient,
    /// Bytes damaged in transit: bad length or checksum.
    Corrupted,
    /// Device is disconnected — stop retrying, notify user.
    Disconnected,
    /// Permission denied on the HID node.
    PermissionDenied,
    /// Well-formed report this software cannot accept (version, codes, range),
    /// or a record rejected before sending.
    Invalid,
}

impl ErrorClass {
    /// Classify an error for retry decisions.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::PermissionDenied(_) => Self::PermissionDenied,
            Error::DeviceNotFound(_) => Self::Disconnected,
            Error::Frame { .. } | Error::Checksum { .. } => Self::Corrupted,
            Error::ReportId { .. }
            | Error::Version { .. }
            | Error::UnknownEnumValue { .. }
            | Error::Range { .. }
            | Error::Validation { .. } => Self::Invalid,
            Error::Hid(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("disconnect")
                    || lower.contains("not found")
                    || lower.contains("no such device")
                {
                    Self::Disconnected
                } else if lower.contains("permission")
                    || lower.contains("access denied")
                    || lower.contains("access is denied")
                {
                    Self::PermissionDenied
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    Self::Transient
                } else {
                    Self::Invalid
                }
            }
        }
    }

    /// Whether re-reading from the device could help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::Corrupted)
    }
}

/// Load the configuration, re-reading after transient or corrupted transfers.
///
/// Returns the record on success, or the last error after exhausting retries.
pub fn load_with_retry(
    transport: &dyn FeatureTransport,
    max_retries: u32,
) -> Result<ConfigRecord> {
    let mut attempt = 0;
    loop {
        match load_config(transport) {
            Ok(record) => {
                if attempt > 0 {
                    debug!("Config read succeeded on attempt {}", attempt + 1);
                }
                return Ok(record);
            }
            Err(e) => {
                let class = ErrorClass::classify(&e);

                if !class.is_retryable() || attempt == max_retries {
                    warn!(
                        "Config read failed (class={:?}, attempt={}/{}): {}",
                        class,
                        attempt + 1,
                        max_retries + 1,
                        e
                    );
                    return Err(e);
                }

                debug!(
                    "Config read error (attempt {}/{}): {}, retrying...",
                    attempt + 1,
                    max_retries + 1,
                    e
                );
                attempt += 1;
            }
        }
    }
}

/// Device connection status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Device responded with a valid configuration.
    Connected,
    /// Device is not found / disconnected.
    Disconnected,
    /// Permission denied — needs udev rule or driver setup.
    PermissionError,
    /// Communication or protocol error.
    Error,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::PermissionError => "permission denied",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl DeviceStatus {
    /// Status to report when opening or reading the device failed.
    pub fn from_error(err: &Error) -> Self {
        match ErrorClass::classify(err) {
            ErrorClass::Disconnected => Self::Disconnected,
            ErrorClass::PermissionDenied => Self::PermissionError,
            _ => Self::Error,
        }
    }
}

/// Check device connectivity by reading the configuration report once.
pub fn check_device_status(transport: &dyn FeatureTransport) -> DeviceStatus {
    match load_config(transport) {
        Ok(_) => DeviceStatus::Connected,
        Err(ref e) => DeviceStatus::from_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockDevice;

    #[test]
    fn classify_timeout_as_transient() {
        let err = Error::Hid("read timed out".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Transient);
        assert!(ErrorClass::classify(&err).is_retryable());
    }

    #[test]
    fn classify_checksum_as_corrupted() {
        let err = Error::Checksum {
            stored: 1,
            computed: 2,
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Corrupted);
        assert!(ErrorClass::classify(&err).is_retryable());
    }

    #[test]
    fn classify_frame_as_corrupted() {
        let err = Error::Frame {
            expected: 23,
            actual: 5,
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Corrupted);
    }

    #[test]
    fn classify_protocol_mismatch_as_invalid() {
        let errs = [
            Error::Version {
                expected: 1,
                actual: 2,
            },
            Error::UnknownEnumValue {
                field: "button1",
                value: 99,
            },
            Error::Range {
                field: "ball_cpi",
                value: 0,
                min: 1,
                max: 120,
            },
        ];
        for err in &errs {
            assert_eq!(ErrorClass::classify(err), ErrorClass::Invalid);
            assert!(!ErrorClass::classify(err).is_retryable());
        }
    }

    #[test]
    fn classify_permission_denied() {
        let err = Error::PermissionDenied("/dev/hidraw3".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::PermissionDenied);
        assert!(!ErrorClass::classify(&err).is_retryable());
    }

    #[test]
    fn classify_disconnect() {
        let err = Error::DeviceNotFound("trackball".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Disconnected);
    }

    #[test]
    fn classify_hid_messages() {
        assert_eq!(
            ErrorClass::classify(&Error::Hid("No such device".into())),
            ErrorClass::Disconnected
        );
        assert_eq!(
            ErrorClass::classify(&Error::Hid("Access is denied".into())),
            ErrorClass::PermissionDenied
        );
        assert_eq!(
            ErrorClass::classify(&Error::Hid("timed out waiting for response".into())),
            ErrorClass::Transient
        );
        assert_eq!(
            ErrorClass::classify(&Error::Hid("broken pipe".into())),
            ErrorClass::Invalid
        );
    }

    #[test]
    fn load_with_retry_succeeds_immediately() {
        let device = MockDevice::new();
        assert_eq!(
            load_with_retry(&device, MAX_RETRIES).unwrap(),
            ConfigRecord::default()
        );
    }

    #[test]
    fn load_with_retry_recovers_from_corruption() {
        let device = MockDevice::new();
        device.corrupt_next_reads(2);
        assert!(load_with_retry(&device, MAX_RETRIES).is_ok());
    }

    #[test]
    fn load_with_retry_recovers_from_timeout() {
        let device = MockDevice::new();
        device.fail_next_read(Error::Hid("timeout after 1000ms".into()));
        assert!(load_with_retry(&device, 1).is_ok());
    }

    #[test]
    fn load_with_retry_gives_up_after_limit() {
        let device = MockDevice::new();
        device.corrupt_next_reads(3);
        assert!(matches!(
            load_with_retry(&device, 2),
            Err(Error::Checksum { .. })
        ));
    }

    #[test]
    fn load_with_retry_does_not_retry_permission_error() {
        let device = MockDevice::new();
        device.fail_next_read(Error::PermissionDenied("hidraw".into()));
        assert!(matches!(
            load_with_retry(&device, MAX_RETRIES),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn check_device_status_connected() {
        let device = MockDevice::new();
        assert_eq!(check_device_status(&device), DeviceStatus::Connected);
    }

    #[test]
    fn check_device_status_disconnected() {
        let device = MockDevice::new();
        device.fail_next_read(Error::Hid("device disconnected".into()));
        assert_eq!(check_device_status(&device), DeviceStatus::Disconnected);
    }

    #[test]
    fn status_from_open_errors() {
        assert_eq!(
            DeviceStatus::from_error(&Error::DeviceNotFound("trackball".into())),
            DeviceStatus::Disconnected
        );
        assert_eq!(
            DeviceStatus::from_error(&Error::PermissionDenied("/dev/hidraw3".into())),
            DeviceStatus::PermissionError
        );
        assert_eq!(
            DeviceStatus::from_error(&Error::Hid("broken pipe".into())),
            DeviceStatus::Error
        );
    }

    #[test]
    fn check_device_status_foreign_firmware() {
        let mut report = crate::codec::encode(&ConfigRecord::default())
            .unwrap()
            .to_vec();
        report[crate::codec::offsets::VERSION] = 2;
        let device = MockDevice::with_report(report);
        assert_eq!(check_device_status(&device), DeviceStatus::Error);
    }
}
