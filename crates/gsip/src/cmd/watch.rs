use std::time::Duration;

use gsip_link::{ByteLink, LinkConfig, TtyLink};
use gsip_wire::FrameDecoder;
use tracing::info;

use crate::cmd::WatchArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(2);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = TtyLink::open_with_config(
        &args.device,
        LinkConfig {
            baud_rate: args.baud,
        },
    )
    .map_err(|err| link_error("open failed", err))?;

    let mut decoder = FrameDecoder::new();
    let mut printed = 0usize;

    loop {
        match link.poll_byte().map_err(|err| link_error("receive failed", err))? {
            Some(byte) => {
                if let Some(msg) = decoder.feed(byte) {
                    print_message(&msg, format);
                    printed += 1;
                    if args.count.is_some_and(|count| printed >= count) {
                        break;
                    }
                }
            }
            None => std::thread::sleep(IDLE_POLL_INTERVAL),
        }
    }

    let stats = decoder.stats();
    info!(
        messages = stats.messages,
        framing_errors = stats.framing_errors,
        checksum_errors = stats.checksum_errors,
        "watch finished"
    );
    Ok(SUCCESS)
}
