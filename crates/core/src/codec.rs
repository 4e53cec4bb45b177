//! Configuration feature report encoding and decoding.
//!
//! The trackball exposes its whole configuration as one HID feature report:
//!
//! ```text
//! offset  field                      type
//!  0      report ID (3)              u8
//!  1      version (1)                u8
//!  2      command                    u8
//!  3..=6  ball X, Y, X/Y shifted      i8
//!  7..=8  CPI, CPI shifted           u8
//!  9..=10 ring, ring shifted         i8
//! 11..=14 buttons 1..4               i8
//! 15..=18 buttons 1..4 shifted       i8
//! 19..=22 CRC-32 of bytes 1..19      u32 LE
//! ```
//!
//! Buffers handed to and returned from the transport include the report ID.

use crate::config::{
    BallFunction, ButtonFunction, ConfigRecord, RingFunction, BUTTON_COUNT, BUTTON_FIELDS,
    BUTTON_SHIFTED_FIELDS, CONFIG_VERSION,
};
use crate::error::{Error, Result};
use crate::safety::{self, CPI_MAX, CPI_MIN};
use tracing::{debug, warn};

/// HID report ID of the configuration feature report.
pub const REPORT_ID: u8 = 3;
/// Configuration bytes following the report ID, checksum included.
pub const CONFIG_SIZE: usize = 22;
/// Full report length including the report ID.
pub const REPORT_LEN: usize = CONFIG_SIZE + 1;

/// Command byte written with every configuration.
pub const COMMAND_NONE: u8 = 0;

/// Byte offsets within the report.
pub mod offsets {
    pub const REPORT_ID: usize = 0;
    pub const VERSION: usize = 1;
    pub const COMMAND: usize = 2;
    pub const BALL_X: usize = 3;
    pub const BALL_Y: usize = 4;
    pub const BALL_X_SHIFTED: usize = 5;
    pub const BALL_Y_SHIFTED: usize = 6;
    pub const CPI: usize = 7;
    pub const CPI_SHIFTED: usize = 8;
    pub const RING: usize = 9;
    pub const RING_SHIFTED: usize = 10;
    pub const BUTTONS: usize = 11;
    pub const BUTTONS_SHIFTED: usize = 15;
    /// First byte of the little-endian CRC-32.
    pub const CHECKSUM: usize = 19;
}

/// CRC-32 (ISO-3309, reflected 0xEDB88320) as used by the firmware.
pub fn checksum(payload: &[u8]) -> u32 {
    crc32fast::hash(payload)
}

/// Encode a configuration into a complete feature report.
///
/// The record is validated first; nothing is produced for an out-of-range
/// CPI or a foreign version.
pub fn encode(record: &ConfigRecord) -> Result<[u8; REPORT_LEN]> {
    safety::validate_record(record)?;

    let mut buf = [0u8; REPORT_LEN];
    buf[offsets::REPORT_ID] = REPORT_ID;
    buf[offsets::VERSION] = record.version;
    buf[offsets::COMMAND] = COMMAND_NONE;
    buf[offsets::BALL_X] = record.ball_axis_x.wire() as u8;
    buf[offsets::BALL_Y] = record.ball_axis_y.wire() as u8;
    buf[offsets::BALL_X_SHIFTED] = record.ball_axis_x_shifted.wire() as u8;
    buf[offsets::BALL_Y_SHIFTED] = record.ball_axis_y_shifted.wire() as u8;
    buf[offsets::CPI] = record.ball_cpi;
    buf[offsets::CPI_SHIFTED] = record.ball_cpi_shifted;
    buf[offsets::RING] = record.ring.wire() as u8;
    buf[offsets::RING_SHIFTED] = record.ring_shifted.wire() as u8;
    for (i, function) in record.buttons.iter().enumerate() {
        buf[offsets::BUTTONS + i] = function.wire() as u8;
    }
    for (i, function) in record.buttons_shifted.iter().enumerate() {
        buf[offsets::BUTTONS_SHIFTED + i] = function.wire() as u8;
    }

    let crc = checksum(&buf[offsets::VERSION..offsets::CHECKSUM]);
    buf[offsets::CHECKSUM..].copy_from_slice(&crc.to_le_bytes());

    Ok(buf)
}

/// Decode a feature report read from the device.
///
/// Checks run in a fixed order so the error names the first violated rule:
/// length, report ID, version, checksum, enumerated fields, CPI range.
pub fn decode(data: &[u8]) -> Result<ConfigRecord> {
    if data.len() != REPORT_LEN {
        return Err(Error::Frame {
            expected: REPORT_LEN,
            actual: data.len(),
        });
    }

    if data[offsets::REPORT_ID] != REPORT_ID {
        return Err(Error::ReportId {
            expected: REPORT_ID,
            actual: data[offsets::REPORT_ID],
        });
    }

    let version = data[offsets::VERSION];
    if version != CONFIG_VERSION {
        return Err(Error::Version {
            expected: CONFIG_VERSION,
            actual: version,
        });
    }

    let mut stored = [0u8; 4];
    stored.copy_from_slice(&data[offsets::CHECKSUM..]);
    let stored = u32::from_le_bytes(stored);
    let computed = checksum(&data[offsets::VERSION..offsets::CHECKSUM]);
    if stored != computed {
        warn!(
            stored = format_args!("0x{stored:08X}"),
            computed = format_args!("0x{computed:08X}"),
            "Config report checksum mismatch"
        );
        return Err(Error::Checksum { stored, computed });
    }

    if data[offsets::COMMAND] != COMMAND_NONE {
        debug!(command = data[offsets::COMMAND], "Ignoring command byte");
    }

    let wire = |offset: usize| data[offset] as i8;

    let mut record = ConfigRecord {
        version,
        ball_axis_x: ball(wire(offsets::BALL_X), "ball_axis_x")?,
        ball_axis_y: ball(wire(offsets::BALL_Y), "ball_axis_y")?,
        ball_axis_x_shifted: ball(wire(offsets::BALL_X_SHIFTED), "ball_axis_x_shifted")?,
        ball_axis_y_shifted: ball(wire(offsets::BALL_Y_SHIFTED), "ball_axis_y_shifted")?,
        ball_cpi: data[offsets::CPI],
        ball_cpi_shifted: data[offsets::CPI_SHIFTED],
        ring: ring(wire(offsets::RING), "ring")?,
        ring_shifted: ring(wire(offsets::RING_SHIFTED), "ring_shifted")?,
        buttons: [ButtonFunction::None; BUTTON_COUNT],
        buttons_shifted: [ButtonFunction::None; BUTTON_COUNT],
    };
    for (i, slot) in record.buttons.iter_mut().enumerate() {
        *slot = button(wire(offsets::BUTTONS + i), BUTTON_FIELDS[i])?;
    }
    for (i, slot) in record.buttons_shifted.iter_mut().enumerate() {
        *slot = button(wire(offsets::BUTTONS_SHIFTED + i), BUTTON_SHIFTED_FIELDS[i])?;
    }

    check_cpi("ball_cpi", record.ball_cpi)?;
    check_cpi("ball_cpi_shifted", record.ball_cpi_shifted)?;

    debug!(?record, "Decoded config report");
    Ok(record)
}

fn ball(code: i8, field: &'static str) -> Result<BallFunction> {
    BallFunction::from_wire(code).ok_or(Error::UnknownEnumValue { field, value: code })
}

fn ring(code: i8, field: &'static str) -> Result<RingFunction> {
    RingFunction::from_wire(code).ok_or(Error::UnknownEnumValue { field, value: code })
}

fn button(code: i8, field: &'static str) -> Result<ButtonFunction> {
    ButtonFunction::from_wire(code).ok_or(Error::UnknownEnumValue { field, value: code })
}

fn check_cpi(field: &'static str, cpi: u8) -> Result<()> {
    if !safety::cpi_in_range(cpi) {
        return Err(Error::Range {
            field,
            value: cpi,
            min: CPI_MIN,
            max: CPI_MAX,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Factory configuration report.
    const DEFAULT_REPORT: [u8; REPORT_LEN] = [
        3, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x03, 0xEA, 0x62, 0xD2,
    ];

    /// Rewrite the trailing checksum after tampering with a field.
    fn reseal(buf: &mut [u8]) {
        let crc = checksum(&buf[offsets::VERSION..offsets::CHECKSUM]);
        buf[offsets::CHECKSUM..].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn checksum_matches_reference_vector() {
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn encode_default_record() {
        let encoded = encode(&ConfigRecord::default()).unwrap();
        assert_eq!(encoded, DEFAULT_REPORT);
    }

    #[test]
    fn decode_default_record() {
        let record = decode(&DEFAULT_REPORT).unwrap();
        assert_eq!(record, ConfigRecord::default());
    }

    #[test]
    fn encode_signed_axis_codes() {
        let record = ConfigRecord {
            ball_axis_x: BallFunction::CursorX,
            ball_axis_y: BallFunction::CursorYInverted,
            ..ConfigRecord::default()
        };
        let encoded = encode(&record).unwrap();
        assert_eq!(encoded[offsets::BALL_X], 1);
        assert_eq!(encoded[offsets::BALL_Y], 0xFE);

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.ball_axis_y, BallFunction::CursorYInverted);
    }

    #[test]
    fn encode_full_record_layout() {
        let record = ConfigRecord {
            ball_axis_x: BallFunction::CursorX,
            ball_axis_y: BallFunction::CursorYInverted,
            ball_cpi: 16,
            ball_cpi_shifted: 32,
            ring: RingFunction::VScroll,
            ring_shifted: RingFunction::VScrollInverted,
            buttons: [
                ButtonFunction::Button1,
                ButtonFunction::Button2,
                ButtonFunction::Button3,
                ButtonFunction::Button4,
            ],
            buttons_shifted: [
                ButtonFunction::ClickDrag,
                ButtonFunction::Shift,
                ButtonFunction::None,
                ButtonFunction::Button5,
            ],
            ..ConfigRecord::default()
        };
        let encoded = encode(&record).unwrap();
        assert_eq!(
            encoded,
            [
                3, 1, 0, 1, 0xFE, 0, 0, 16, 32, 1, 0xFF, 1, 2, 3, 4, 9, 10, 0, 5, 0x0B, 0x24,
                0x54, 0x87,
            ]
        );
        assert_eq!(decode(&encoded).unwrap(), record);
    }

    #[test]
    fn ball_axes_decode_from_own_bytes() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::BALL_X] = BallFunction::HScroll.wire() as u8;
        buf[offsets::BALL_Y] = BallFunction::VScrollInverted.wire() as u8;
        reseal(&mut buf);
        let record = decode(&buf).unwrap();
        assert_eq!(record.ball_axis_x, BallFunction::HScroll);
        assert_eq!(record.ball_axis_y, BallFunction::VScrollInverted);
    }

    #[test]
    fn encode_cpi_boundaries() {
        for cpi in [CPI_MIN, CPI_MAX] {
            let record = ConfigRecord {
                ball_cpi: cpi,
                ball_cpi_shifted: cpi,
                ..ConfigRecord::default()
            };
            assert!(encode(&record).is_ok(), "cpi {cpi} should encode");
        }
        for cpi in [0, 121] {
            let record = ConfigRecord {
                ball_cpi: cpi,
                ..ConfigRecord::default()
            };
            assert_eq!(
                encode(&record),
                Err(Error::Validation {
                    field: "ball_cpi",
                    value: cpi,
                    min: 1,
                    max: 120
                })
            );
        }
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(
            decode(&DEFAULT_REPORT[..22]),
            Err(Error::Frame {
                expected: 23,
                actual: 22
            })
        );
        let mut long = DEFAULT_REPORT.to_vec();
        long.push(0);
        assert!(matches!(decode(&long), Err(Error::Frame { actual: 24, .. })));
        assert!(matches!(decode(&[]), Err(Error::Frame { actual: 0, .. })));
    }

    #[test]
    fn decode_rejects_wrong_report_id() {
        let mut buf = DEFAULT_REPORT;
        buf[0] = 0x01;
        assert_eq!(
            decode(&buf),
            Err(Error::ReportId {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn decode_rejects_version_even_with_valid_checksum() {
        for version in [0u8, 2, 0xFF] {
            let mut buf = DEFAULT_REPORT;
            buf[offsets::VERSION] = version;
            reseal(&mut buf);
            assert_eq!(
                decode(&buf),
                Err(Error::Version {
                    expected: 1,
                    actual: version
                })
            );
        }
    }

    #[test]
    fn decode_rejects_any_single_bit_flip() {
        for byte in offsets::COMMAND..offsets::CHECKSUM {
            for bit in 0..8 {
                let mut buf = DEFAULT_REPORT;
                buf[byte] ^= 1 << bit;
                assert!(
                    matches!(decode(&buf), Err(Error::Checksum { .. })),
                    "flip of byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn decode_checks_checksum_before_fields() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::BUTTONS] = 99;
        assert!(matches!(decode(&buf), Err(Error::Checksum { .. })));
    }

    #[test]
    fn decode_rejects_corrupt_checksum() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::CHECKSUM] ^= 0x80;
        assert_eq!(
            decode(&buf),
            Err(Error::Checksum {
                stored: 0xD262_EA83,
                computed: 0xD262_EA03
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_button_code() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::BUTTONS] = 99;
        reseal(&mut buf);
        assert_eq!(
            decode(&buf),
            Err(Error::UnknownEnumValue {
                field: "button1",
                value: 99
            })
        );
    }

    #[test]
    fn decode_rejects_negative_button_code() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::BUTTONS_SHIFTED + 3] = 0xFF;
        reseal(&mut buf);
        assert_eq!(
            decode(&buf),
            Err(Error::UnknownEnumValue {
                field: "button4_shifted",
                value: -1
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_axis_and_ring_codes() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::BALL_Y_SHIFTED] = (-5i8) as u8;
        reseal(&mut buf);
        assert_eq!(
            decode(&buf),
            Err(Error::UnknownEnumValue {
                field: "ball_axis_y_shifted",
                value: -5
            })
        );

        let mut buf = DEFAULT_REPORT;
        buf[offsets::RING] = 3;
        reseal(&mut buf);
        assert_eq!(
            decode(&buf),
            Err(Error::UnknownEnumValue {
                field: "ring",
                value: 3
            })
        );
    }

    #[test]
    fn decode_rejects_cpi_out_of_range() {
        for cpi in [0u8, 121, 0xFF] {
            let mut buf = DEFAULT_REPORT;
            buf[offsets::CPI_SHIFTED] = cpi;
            reseal(&mut buf);
            assert_eq!(
                decode(&buf),
                Err(Error::Range {
                    field: "ball_cpi_shifted",
                    value: cpi,
                    min: 1,
                    max: 120
                })
            );
        }
    }

    #[test]
    fn decode_reports_enum_error_before_range_error() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::CPI] = 0;
        buf[offsets::BUTTONS + 2] = 11;
        reseal(&mut buf);
        assert!(matches!(
            decode(&buf),
            Err(Error::UnknownEnumValue {
                field: "button3",
                value: 11
            })
        ));
    }

    #[test]
    fn decode_ignores_command_byte() {
        let mut buf = DEFAULT_REPORT;
        buf[offsets::COMMAND] = 7;
        reseal(&mut buf);
        assert_eq!(decode(&buf).unwrap(), ConfigRecord::default());
    }
}
