use gsip_wire::crc7;
use serde::Serialize;

use crate::cmd::{parse_hex, CrcArgs};
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct CrcOutput {
    crc7: u8,
    length: usize,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    if bytes.is_empty() {
        return Err(CliError::new(USAGE, "crc input must not be empty"));
    }

    let checksum = crc7(&bytes);
    match format {
        OutputFormat::Json => {
            let out = CrcOutput {
                crc7: checksum,
                length: bytes.len(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        _ => println!("0x{checksum:02X}"),
    }

    Ok(SUCCESS)
}
