//! trackball-config CLI: load, inspect, edit, and save trackball configuration.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::CString;
use trackball_config_core::codec;
use trackball_config_core::comm;
use trackball_config_core::config::{
    cpi_to_dpi, BallFunction, ButtonFunction, ConfigRecord, RingFunction,
};
use trackball_config_core::device::{self, DeviceInfo};
use trackball_config_core::error::{self, Error};
use trackball_config_core::safety;
use trackball_config_core::transport::{self, FeatureTransport};

struct CliHidTransport {
    device: hidapi::HidDevice,
}

impl CliHidTransport {
    /// Open the device at `path`, or the first discovered trackball.
    fn open(path: Option<&str>) -> error::Result<Self> {
        let path = match path {
            Some(p) => p.to_string(),
            None => {
                let devices = device::discover_devices()?;
                let first = devices.first().ok_or_else(|| {
                    Error::DeviceNotFound(format!(
                        "no trackball with VID 0x{:04X} PID 0x{:04X}",
                        trackball_config_core::TRACKBALL_VID,
                        trackball_config_core::TRACKBALL_PID
                    ))
                })?;
                first.path.clone()
            }
        };

        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        let c_path = CString::new(path.as_str())
            .map_err(|_| Error::Hid(format!("invalid HID path {path:?}")))?;
        let device = api
            .open_path(&c_path)
            .map_err(|e| open_error(&path, &e.to_string()))?;
        tracing::debug!(path = %path, "Opened trackball");

        Ok(Self { device })
    }
}

/// Map a failed `open_path` to a core error from hidapi's message.
fn open_error(path: &str, msg: &str) -> Error {
    let lower = msg.to_lowercase();
    if lower.contains("permission")
        || lower.contains("access denied")
        || lower.contains("access is denied")
    {
        Error::PermissionDenied(format!("{path}: {msg}"))
    } else if lower.contains("no such") || lower.contains("not found") {
        Error::DeviceNotFound(format!("{path}: {msg}"))
    } else {
        Error::Hid(format!("open {path}: {msg}"))
    }
}

impl FeatureTransport for CliHidTransport {
    fn read_feature_report(&self, report_id: u8, len: usize) -> error::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        buf[0] = report_id;
        let n = self
            .device
            .get_feature_report(&mut buf)
            .map_err(|e| Error::Hid(format!("get_feature_report: {e}")))?;
        buf.truncate(n);
        Ok(buf)
    }

    fn write_feature_report(&self, data: &[u8]) -> error::Result<()> {
        self.device
            .send_feature_report(data)
            .map_err(|e| Error::Hid(format!("send_feature_report: {e}")))
    }
}

#[derive(Parser)]
#[command(
    name = "trackball-config",
    version,
    about = "Configure the 0xCAFE:0xBAFA trackball"
)]
struct Cli {
    /// HID path of the device (see `list-devices`). Defaults to the first trackball found.
    #[arg(long, global = true)]
    path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected trackballs.
    ListDevices,
    /// Check whether the device answers with a valid configuration.
    Status,
    /// Load and print the current configuration.
    Show {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
        /// Re-read up to this many times after a timeout or corrupted transfer.
        #[arg(long, default_value_t = comm::MAX_RETRIES)]
        retries: u32,
    },
    /// Change settings on the device. Unspecified settings keep their value.
    Set(FieldArgs),
    /// Write the factory configuration (everything off, 100 CPI).
    Reset,
    /// List accepted function names.
    Functions,
    /// Apply settings to the default configuration and print the report as hex.
    Encode(FieldArgs),
    /// Decode a report given as hex (23 bytes, report ID first).
    Decode {
        /// Hex bytes; spaces, colons and a 0x prefix are ignored.
        hex: Vec<String>,
    },
}

#[derive(Args, Default)]
struct FieldArgs {
    /// Ball X axis function.
    #[arg(long, value_parser = parse_ball)]
    ball_x: Option<BallFunction>,
    /// Ball Y axis function.
    #[arg(long, value_parser = parse_ball)]
    ball_y: Option<BallFunction>,
    /// Ball X axis function while shifted.
    #[arg(long, value_parser = parse_ball)]
    ball_x_shifted: Option<BallFunction>,
    /// Ball Y axis function while shifted.
    #[arg(long, value_parser = parse_ball)]
    ball_y_shifted: Option<BallFunction>,
    /// Sensor CPI in hundreds (1-120).
    #[arg(long)]
    cpi: Option<u8>,
    /// Sensor CPI in hundreds while shifted (1-120).
    #[arg(long)]
    cpi_shifted: Option<u8>,
    /// Scroll ring function.
    #[arg(long, value_parser = parse_ring)]
    ring: Option<RingFunction>,
    /// Scroll ring function while shifted.
    #[arg(long, value_parser = parse_ring)]
    ring_shifted: Option<RingFunction>,
    #[arg(long, value_parser = parse_button)]
    button1: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button2: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button3: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button4: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button1_shifted: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button2_shifted: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button3_shifted: Option<ButtonFunction>,
    #[arg(long, value_parser = parse_button)]
    button4_shifted: Option<ButtonFunction>,
}

impl FieldArgs {
    fn is_empty(&self) -> bool {
        self.ball_x.is_none()
            && self.ball_y.is_none()
            && self.ball_x_shifted.is_none()
            && self.ball_y_shifted.is_none()
            && self.cpi.is_none()
            && self.cpi_shifted.is_none()
            && self.ring.is_none()
            && self.ring_shifted.is_none()
            && self.buttons().iter().all(Option::is_none)
            && self.buttons_shifted().iter().all(Option::is_none)
    }

    fn buttons(&self) -> [Option<ButtonFunction>; 4] {
        [self.button1, self.button2, self.button3, self.button4]
    }

    fn buttons_shifted(&self) -> [Option<ButtonFunction>; 4] {
        [
            self.button1_shifted,
            self.button2_shifted,
            self.button3_shifted,
            self.button4_shifted,
        ]
    }

    /// Overwrite the fields that were given on the command line.
    fn apply(&self, record: &mut ConfigRecord) {
        if let Some(v) = self.ball_x {
            record.ball_axis_x = v;
        }
        if let Some(v) = self.ball_y {
            record.ball_axis_y = v;
        }
        if let Some(v) = self.ball_x_shifted {
            record.ball_axis_x_shifted = v;
        }
        if let Some(v) = self.ball_y_shifted {
            record.ball_axis_y_shifted = v;
        }
        if let Some(v) = self.cpi {
            record.ball_cpi = v;
        }
        if let Some(v) = self.cpi_shifted {
            record.ball_cpi_shifted = v;
        }
        if let Some(v) = self.ring {
            record.ring = v;
        }
        if let Some(v) = self.ring_shifted {
            record.ring_shifted = v;
        }
        for (slot, v) in record.buttons.iter_mut().zip(self.buttons()) {
            if let Some(v) = v {
                *slot = v;
            }
        }
        for (slot, v) in record.buttons_shifted.iter_mut().zip(self.buttons_shifted()) {
            if let Some(v) = v {
                *slot = v;
            }
        }
    }
}

fn parse_ball(s: &str) -> Result<BallFunction, String> {
    BallFunction::from_name(s).ok_or_else(|| {
        format!(
            "unknown ball function '{s}'. Valid: {}",
            names(BallFunction::ALL.iter().map(BallFunction::name))
        )
    })
}

fn parse_ring(s: &str) -> Result<RingFunction, String> {
    RingFunction::from_name(s).ok_or_else(|| {
        format!(
            "unknown ring function '{s}'. Valid: {}",
            names(RingFunction::ALL.iter().map(RingFunction::name))
        )
    })
}

fn parse_button(s: &str) -> Result<ButtonFunction, String> {
    ButtonFunction::from_name(s).ok_or_else(|| {
        format!(
            "unknown button function '{s}'. Valid: {}",
            names(ButtonFunction::ALL.iter().map(ButtonFunction::name))
        )
    })
}

fn names<'a>(it: impl Iterator<Item = &'a str>) -> String {
    it.collect::<Vec<_>>().join(", ")
}

/// Join hex groups separated by spaces, colons or commas. Each group may
/// carry one `0x` prefix.
fn parse_hex(parts: &[String]) -> Result<Vec<u8>> {
    let digits: String = parts
        .iter()
        .flat_map(|p| p.split(|c: char| c.is_whitespace() || c == ':' || c == ','))
        .map(|group| {
            group
                .strip_prefix("0x")
                .or_else(|| group.strip_prefix("0X"))
                .unwrap_or(group)
        })
        .collect();
    hex::decode(&digits).map_err(|e| anyhow::anyhow!("invalid hex input: {e}"))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_record(record: &ConfigRecord) {
    println!("{:<12} {:<22} {:<22}", "", "Normal", "Shifted");
    println!(
        "{:<12} {:<22} {:<22}",
        "Ball X axis",
        record.ball_axis_x.label(),
        record.ball_axis_x_shifted.label()
    );
    println!(
        "{:<12} {:<22} {:<22}",
        "Ball Y axis",
        record.ball_axis_y.label(),
        record.ball_axis_y_shifted.label()
    );
    println!(
        "{:<12} {:<22} {:<22}",
        "Ball CPI",
        cpi_to_dpi(record.ball_cpi),
        cpi_to_dpi(record.ball_cpi_shifted)
    );
    println!(
        "{:<12} {:<22} {:<22}",
        "Ring",
        record.ring.label(),
        record.ring_shifted.label()
    );
    for (i, (normal, shifted)) in record
        .buttons
        .iter()
        .zip(record.buttons_shifted.iter())
        .enumerate()
    {
        println!(
            "{:<12} {:<22} {:<22}",
            format!("Button {}", i + 1),
            normal.label(),
            shifted.label()
        );
    }
}

fn print_device(dev: &DeviceInfo) {
    println!(
        "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
        dev.label(),
        dev.vid,
        dev.pid,
        dev.path
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = cli.path.as_deref();

    match cli.command {
        Commands::ListDevices => {
            let devices = device::discover_devices()?;
            if devices.is_empty() {
                println!("No trackballs found.");
                println!(
                    "Ensure the device is connected and your user can access its hidraw node."
                );
            } else {
                for dev in &devices {
                    print_device(dev);
                }
            }
        }
        Commands::Status => {
            let status = match CliHidTransport::open(path) {
                Ok(transport) => comm::check_device_status(&transport),
                Err(e) => {
                    tracing::debug!(error = %e, "Could not open trackball");
                    comm::DeviceStatus::from_error(&e)
                }
            };
            println!("Device status: {status}");
        }
        Commands::Show { json, retries } => {
            let transport = CliHidTransport::open(path)?;
            let record = comm::load_with_retry(&transport, retries)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record);
            }
        }
        Commands::Set(fields) => {
            if fields.is_empty() {
                anyhow::bail!("Nothing to set. See `trackball-config set --help`.");
            }
            let transport = CliHidTransport::open(path)?;
            let mut record = comm::load_with_retry(&transport, comm::MAX_RETRIES)?;
            fields.apply(&mut record);
            safety::validate_record(&record)?;
            eprintln!("{}", safety::WRITE_DISCLAIMER);
            transport::save_config(&transport, &record)?;
            println!("Configuration saved.");
            print_record(&record);
        }
        Commands::Reset => {
            let transport = CliHidTransport::open(path)?;
            eprintln!("{}", safety::WRITE_DISCLAIMER);
            transport::save_config(&transport, &ConfigRecord::default())?;
            println!("Factory configuration written.");
        }
        Commands::Functions => {
            println!(
                "Ball axes: {}",
                names(BallFunction::ALL.iter().map(BallFunction::name))
            );
            println!(
                "Ring:      {}",
                names(RingFunction::ALL.iter().map(RingFunction::name))
            );
            println!(
                "Buttons:   {}",
                names(ButtonFunction::ALL.iter().map(ButtonFunction::name))
            );
        }
        Commands::Encode(fields) => {
            let mut record = ConfigRecord::default();
            fields.apply(&mut record);
            let encoded = codec::encode(&record)?;
            println!("{}", to_hex(&encoded));
        }
        Commands::Decode { hex } => {
            let bytes = parse_hex(&hex)?;
            let record = codec::decode(&bytes)?;
            print_record(&record);
        }
    }

    Ok(())
}
