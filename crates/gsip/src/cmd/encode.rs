use serde::Serialize;

use crate::cmd::{build_message, EncodeArgs};
use crate::exit::{wire_error, CliResult, SUCCESS};
use crate::output::{print_raw, to_hex, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    hex: String,
    length: usize,
    checksum: u8,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let msg = build_message(args.class.into(), args.op, args.value.as_deref())?;
    let bytes = msg
        .encode_to_vec()
        .map_err(|err| wire_error("encode failed", err))?;

    match format {
        OutputFormat::Raw => print_raw(&bytes),
        OutputFormat::Json => {
            let out = EncodeOutput {
                hex: to_hex(&bytes),
                length: bytes.len(),
                checksum: msg.checksum,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", to_hex(&bytes)),
    }

    Ok(SUCCESS)
}
