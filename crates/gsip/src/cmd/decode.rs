use std::io::Read;

use gsip_wire::FrameDecoder;
use tracing::{info, warn};

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = match args.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("reading stdin", err))?;
            buf
        }
    };

    let bytes = parse_hex(&input)?;
    let mut decoder = FrameDecoder::new();
    let messages = decoder.feed_slice(&bytes);
    let stats = decoder.stats();

    if messages.is_empty() && !bytes.is_empty() {
        warn!(
            bytes = bytes.len(),
            framing_errors = stats.framing_errors,
            checksum_errors = stats.checksum_errors,
            "no complete frame recovered"
        );
    } else if stats.framing_errors > 0 || stats.checksum_errors > 0 {
        info!(
            framing_errors = stats.framing_errors,
            checksum_errors = stats.checksum_errors,
            "frames dropped during decode"
        );
    }

    print_messages(&messages, format);
    Ok(SUCCESS)
}
