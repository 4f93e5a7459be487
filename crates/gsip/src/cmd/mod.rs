use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use gsip_wire::{ops, Message, MessageClass, Payload, PayloadShape};

use crate::exit::{wire_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod crc;
pub mod decode;
pub mod encode;
pub mod opstable;
pub mod send;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one message into frame bytes.
    Encode(EncodeArgs),
    /// Decode frames from hex input (argument or stdin).
    Decode(DecodeArgs),
    /// Compute the CRC7 checksum of hex bytes.
    Crc(CrcArgs),
    /// Print the operation-code and payload-shape table.
    Ops(OpsArgs),
    /// Send one command frame to a serial device.
    Send(SendArgs),
    /// Poll a serial device and print decoded messages.
    Watch(WatchArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Crc(args) => crc::run(args, format),
        Command::Ops(args) => opstable::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Watch(args) => watch::run(args, format),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ClassArg {
    Command,
    Telemetry,
}

impl From<ClassArg> for MessageClass {
    fn from(value: ClassArg) -> Self {
        match value {
            ClassArg::Command => MessageClass::Command,
            ClassArg::Telemetry => MessageClass::Telemetry,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message class.
    #[arg(long, value_enum, default_value = "command")]
    pub class: ClassArg,
    /// Operation code (decimal or 0x-prefixed hex).
    #[arg(long, short = 'o', value_parser = parse_byte)]
    pub op: u8,
    /// Payload value, typed by the operation's declared shape.
    #[arg(long, short = 'v')]
    pub value: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex byte stream; read from stdin when omitted.
    pub hex: Option<String>,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Hex bytes to checksum.
    pub hex: String,
}

#[derive(Args, Debug, Default)]
pub struct OpsArgs {}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path, e.g. /dev/ttyUSB0.
    pub device: PathBuf,
    /// Operation code (decimal or 0x-prefixed hex).
    #[arg(long, short = 'o', value_parser = parse_byte)]
    pub op: u8,
    /// Payload value, typed by the operation's declared shape.
    #[arg(long, short = 'v')]
    pub value: Option<String>,
    /// Line rate in baud.
    #[arg(long, default_value = "115200")]
    pub baud: u32,
    /// Wait for one reply frame and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for the reply when --wait is set (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial device path, e.g. /dev/ttyUSB0.
    pub device: PathBuf,
    /// Line rate in baud.
    #[arg(long, default_value = "115200")]
    pub baud: u32,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

/// Parse a byte given as decimal or 0x-prefixed hex.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid byte value: {input}"))
}

/// Parse a hex byte stream, ignoring whitespace and 0x prefixes.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input
        .split_whitespace()
        .map(|word| word.strip_prefix("0x").unwrap_or(word))
        .collect();
    if compact.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex input has an odd number of digits"));
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex digits: {}", &compact[i..i + 2])))
        })
        .collect()
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

/// Build a message from CLI arguments, parsing the value by the shape the
/// operation table declares.
pub fn build_message(class: MessageClass, op: u8, value: Option<&str>) -> CliResult<Message> {
    let shape = ops::shape(class, op).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("operation 0x{op:02X} is not in the table for this class (see `gsip ops`)"),
        )
    })?;

    let payload = match (shape, value) {
        (PayloadShape::Empty, None) => Payload::None,
        (PayloadShape::Empty, Some(_)) => {
            return Err(CliError::new(
                USAGE,
                format!("{} takes no payload", ops::name(class, op)),
            ))
        }
        (_, None) => {
            return Err(CliError::new(
                USAGE,
                format!("{} requires --value ({shape:?})", ops::name(class, op)),
            ))
        }
        (PayloadShape::U8, Some(v)) => Payload::U8(fit(parse_uint(v)?, class, op, shape)?),
        (PayloadShape::U16, Some(v)) => Payload::U16(fit(parse_uint(v)?, class, op, shape)?),
        (PayloadShape::U32, Some(v)) => Payload::U32(fit(parse_uint(v)?, class, op, shape)?),
        (PayloadShape::F32, Some(v)) => Payload::F32(
            v.parse()
                .map_err(|_| CliError::new(USAGE, format!("invalid float value: {v}")))?,
        ),
        (PayloadShape::Text, Some(v)) => Payload::Text(v.to_string()),
    };

    Message::new(class, op, payload).map_err(|err| wire_error("building message", err))
}

/// Narrow a parsed value to the operation's declared payload width,
/// rejecting anything that does not fit rather than truncating it.
fn fit<T: TryFrom<u64>>(
    raw: u64,
    class: MessageClass,
    op: u8,
    shape: PayloadShape,
) -> CliResult<T> {
    T::try_from(raw).map_err(|_| {
        CliError::new(
            USAGE,
            format!(
                "{} takes a {shape:?} payload; {raw} does not fit",
                ops::name(class, op)
            ),
        )
    })
}

fn parse_uint(input: &str) -> CliResult<u64> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid integer value: {input}")))
}
