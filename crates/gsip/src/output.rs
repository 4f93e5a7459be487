use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gsip_wire::{Message, MessageClass, Payload};
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    class: &'a str,
    operation: u8,
    name: &'a str,
    payload: &'a Payload,
    checksum: u8,
}

impl<'a> MessageOutput<'a> {
    fn new(msg: &'a Message) -> Self {
        Self {
            class: class_name(msg.class),
            operation: msg.operation,
            name: msg.operation_name(),
            payload: &msg.payload,
            checksum: msg.checksum,
        }
    }
}

pub fn print_messages(messages: &[Message], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<MessageOutput> = messages.iter().map(MessageOutput::new).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLASS", "OP", "NAME", "PAYLOAD", "CRC7"]);
            for msg in messages {
                table.add_row(vec![
                    class_name(msg.class).to_string(),
                    format!("0x{:02X}", msg.operation),
                    msg.operation_name().to_string(),
                    payload_display(&msg.payload),
                    format!("0x{:02X}", msg.checksum),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for msg in messages {
                println!(
                    "class={} op=0x{:02X} ({}) payload={} crc7=0x{:02X}",
                    class_name(msg.class),
                    msg.operation,
                    msg.operation_name(),
                    payload_display(&msg.payload),
                    msg.checksum
                );
            }
        }
        OutputFormat::Raw => {
            for msg in messages {
                match msg.encode_to_vec() {
                    Ok(bytes) => print_raw(&bytes),
                    // Messages the decoder accepted but the encoder refuses
                    // (unknown operation codes, delimiter collisions) have
                    // no raw rendition; say so instead of dropping them.
                    Err(err) => warn!(
                        operation = msg.operation,
                        %err,
                        "message has no raw encoding, skipped"
                    ),
                }
            }
        }
    }
}

pub fn print_message(msg: &Message, format: OutputFormat) {
    print_messages(std::slice::from_ref(msg), format);
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn class_name(class: MessageClass) -> &'static str {
    match class {
        MessageClass::Command => "Command",
        MessageClass::Telemetry => "Telemetry",
    }
}

pub fn payload_display(payload: &Payload) -> String {
    match payload {
        Payload::None => "none".to_string(),
        Payload::U8(v) => format!("u8:{v}"),
        Payload::U16(v) => format!("u16:{v}"),
        Payload::U32(v) => format!("u32:{v}"),
        Payload::F32(v) => format!("f32:{v}"),
        Payload::Text(s) => format!("{s:?}"),
    }
}

/// Uppercase hex with one space per byte, the way frames are usually
/// written in the protocol docs: `55 55 AA AA 7C ...`.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rendering() {
        assert_eq!(to_hex(&[0x55, 0x55, 0xAA, 0xAA]), "55 55 AA AA");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn payload_rendering() {
        assert_eq!(payload_display(&Payload::None), "none");
        assert_eq!(payload_display(&Payload::U32(10_000_000)), "u32:10000000");
        assert_eq!(
            payload_display(&Payload::Text("GPSDO-Alpha Ver. [1.0.0]".to_string())),
            "\"GPSDO-Alpha Ver. [1.0.0]\""
        );
    }
}
