//! GSIP operation codes and their payload shapes.
//!
//! The operation-code space is reused per message class: the same numeric
//! code means one thing under `Command` and another under `Telemetry`.
//! The table below is the protocol's public contract; codes are only ever
//! extended, never reassigned to a different payload shape.

use crate::message::{MessageClass, PayloadShape};

/// Command operation codes (host → device).
pub mod command {
    /// Read the firmware version string.
    pub const READ_VERSION: u8 = 0x00;
    /// Read the measured oscillator frequency.
    pub const READ_FREQUENCY: u8 = 0x01;
    /// Set the target frequency in Hz (u32).
    pub const WRITE_FREQUENCY: u8 = 0x02;
    /// Read the pulse-per-second counter.
    pub const READ_COUNTER: u8 = 0x03;
    /// Program the control DAC (u32).
    pub const WRITE_DAC: u8 = 0x04;
    /// Read the lower frequency bound.
    pub const READ_LOWEST_FREQUENCY: u8 = 0x05;
    /// Set the lower frequency bound in Hz (u32).
    pub const WRITE_LOWEST_FREQUENCY: u8 = 0x06;
    /// Read the upper frequency bound.
    pub const READ_HIGHEST_FREQUENCY: u8 = 0x07;
    /// Set the upper frequency bound in Hz (u32).
    pub const WRITE_HIGHEST_FREQUENCY: u8 = 0x08;
    /// Read the center frequency.
    pub const READ_CENTER_FREQUENCY: u8 = 0x09;
    /// Set the center frequency in Hz (u32).
    pub const WRITE_CENTER_FREQUENCY: u8 = 0x0A;
    /// Read the PID proportional gain.
    pub const READ_PROPORTIONAL_GAIN: u8 = 0x0B;
    /// Set the PID proportional gain (f32).
    pub const WRITE_PROPORTIONAL_GAIN: u8 = 0x0C;
    /// Read the PID integral gain.
    pub const READ_INTEGRAL_GAIN: u8 = 0x0D;
    /// Set the PID integral gain (f32).
    pub const WRITE_INTEGRAL_GAIN: u8 = 0x0E;
    /// Read the PID derivative gain.
    pub const READ_DERIVATIVE_GAIN: u8 = 0x0F;
    /// Set the PID derivative gain (f32).
    pub const WRITE_DERIVATIVE_GAIN: u8 = 0x10;
    /// Read the moving-average filter window length.
    pub const READ_FILTER_WINDOW: u8 = 0x11;
    /// Set the moving-average filter window length (u16).
    pub const WRITE_FILTER_WINDOW: u8 = 0x12;
    /// Read the moving-average filter switch.
    pub const READ_FILTER_ENABLED: u8 = 0x13;
    /// Set the moving-average filter switch (u8, only the LSB is valid).
    pub const WRITE_FILTER_ENABLED: u8 = 0x14;
}

/// Telemetry operation codes (device → host).
pub mod telemetry {
    /// Firmware version string, e.g. `GPSDO-Alpha Ver. [x.y.z]`.
    pub const FIRMWARE_VERSION: u8 = 0x00;
    /// Measured frequency in Hz (u32).
    pub const FREQUENCY: u8 = 0x01;
    /// Pulse-per-second counter (u32).
    pub const COUNTER: u8 = 0x02;
    /// Lower frequency bound in Hz (u32).
    pub const LOWEST_FREQUENCY: u8 = 0x03;
    /// Upper frequency bound in Hz (u32).
    pub const HIGHEST_FREQUENCY: u8 = 0x04;
    /// Center frequency in Hz (u32).
    pub const CENTER_FREQUENCY: u8 = 0x05;
    /// PID proportional gain (f32).
    pub const PROPORTIONAL_GAIN: u8 = 0x06;
    /// PID integral gain (f32).
    pub const INTEGRAL_GAIN: u8 = 0x07;
    /// PID derivative gain (f32).
    pub const DERIVATIVE_GAIN: u8 = 0x08;
    /// Moving-average filter window length (u16).
    pub const FILTER_WINDOW: u8 = 0x09;
    /// Moving-average filter switch (u8, only the LSB is valid).
    pub const FILTER_ENABLED: u8 = 0x0A;
}

/// Payload shape declared for a (class, operation) pair, or `None` if the
/// operation code is outside the table.
pub fn shape(class: MessageClass, operation: u8) -> Option<PayloadShape> {
    use command as cmd;
    use telemetry as tlm;

    match class {
        MessageClass::Command => match operation {
            cmd::WRITE_FREQUENCY
            | cmd::WRITE_DAC
            | cmd::WRITE_LOWEST_FREQUENCY
            | cmd::WRITE_HIGHEST_FREQUENCY
            | cmd::WRITE_CENTER_FREQUENCY => Some(PayloadShape::U32),
            cmd::WRITE_PROPORTIONAL_GAIN | cmd::WRITE_INTEGRAL_GAIN | cmd::WRITE_DERIVATIVE_GAIN => {
                Some(PayloadShape::F32)
            }
            cmd::WRITE_FILTER_WINDOW => Some(PayloadShape::U16),
            cmd::WRITE_FILTER_ENABLED => Some(PayloadShape::U8),
            // Every read command carries no payload.
            op if op <= cmd::WRITE_FILTER_ENABLED => Some(PayloadShape::Empty),
            _ => None,
        },
        MessageClass::Telemetry => match operation {
            tlm::FIRMWARE_VERSION => Some(PayloadShape::Text),
            tlm::FREQUENCY
            | tlm::COUNTER
            | tlm::LOWEST_FREQUENCY
            | tlm::HIGHEST_FREQUENCY
            | tlm::CENTER_FREQUENCY => Some(PayloadShape::U32),
            tlm::PROPORTIONAL_GAIN | tlm::INTEGRAL_GAIN | tlm::DERIVATIVE_GAIN => {
                Some(PayloadShape::F32)
            }
            tlm::FILTER_WINDOW => Some(PayloadShape::U16),
            tlm::FILTER_ENABLED => Some(PayloadShape::U8),
            _ => None,
        },
    }
}

/// Human-readable name for a (class, operation) pair.
pub fn name(class: MessageClass, operation: u8) -> &'static str {
    use command as cmd;
    use telemetry as tlm;

    match class {
        MessageClass::Command => match operation {
            cmd::READ_VERSION => "ReadVersion",
            cmd::READ_FREQUENCY => "ReadFrequency",
            cmd::WRITE_FREQUENCY => "WriteFrequency",
            cmd::READ_COUNTER => "ReadCounter",
            cmd::WRITE_DAC => "WriteDac",
            cmd::READ_LOWEST_FREQUENCY => "ReadLowestFrequency",
            cmd::WRITE_LOWEST_FREQUENCY => "WriteLowestFrequency",
            cmd::READ_HIGHEST_FREQUENCY => "ReadHighestFrequency",
            cmd::WRITE_HIGHEST_FREQUENCY => "WriteHighestFrequency",
            cmd::READ_CENTER_FREQUENCY => "ReadCenterFrequency",
            cmd::WRITE_CENTER_FREQUENCY => "WriteCenterFrequency",
            cmd::READ_PROPORTIONAL_GAIN => "ReadProportionalGain",
            cmd::WRITE_PROPORTIONAL_GAIN => "WriteProportionalGain",
            cmd::READ_INTEGRAL_GAIN => "ReadIntegralGain",
            cmd::WRITE_INTEGRAL_GAIN => "WriteIntegralGain",
            cmd::READ_DERIVATIVE_GAIN => "ReadDerivativeGain",
            cmd::WRITE_DERIVATIVE_GAIN => "WriteDerivativeGain",
            cmd::READ_FILTER_WINDOW => "ReadFilterWindow",
            cmd::WRITE_FILTER_WINDOW => "WriteFilterWindow",
            cmd::READ_FILTER_ENABLED => "ReadFilterEnabled",
            cmd::WRITE_FILTER_ENABLED => "WriteFilterEnabled",
            _ => "Unknown",
        },
        MessageClass::Telemetry => match operation {
            tlm::FIRMWARE_VERSION => "FirmwareVersion",
            tlm::FREQUENCY => "Frequency",
            tlm::COUNTER => "Counter",
            tlm::LOWEST_FREQUENCY => "LowestFrequency",
            tlm::HIGHEST_FREQUENCY => "HighestFrequency",
            tlm::CENTER_FREQUENCY => "CenterFrequency",
            tlm::PROPORTIONAL_GAIN => "ProportionalGain",
            tlm::INTEGRAL_GAIN => "IntegralGain",
            tlm::DERIVATIVE_GAIN => "DerivativeGain",
            tlm::FILTER_WINDOW => "FilterWindow",
            tlm::FILTER_ENABLED => "FilterEnabled",
            _ => "Unknown",
        },
    }
}

/// Returns true if the (class, operation) pair is in the table.
pub fn is_known(class: MessageClass, operation: u8) -> bool {
    shape(class, operation).is_some()
}

/// Highest assigned operation code for a class.
pub fn max_operation(class: MessageClass) -> u8 {
    match class {
        MessageClass::Command => command::WRITE_FILTER_ENABLED,
        MessageClass::Telemetry => telemetry::FILTER_ENABLED,
    }
}
