use std::time::{Duration, Instant};

use gsip_link::{ByteLink, LinkConfig, TtyLink};
use gsip_wire::{FrameDecoder, MessageClass};

use crate::cmd::{build_message, parse_duration, SendArgs};
use crate::exit::{link_error, wire_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_message, OutputFormat};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(2);

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let msg = build_message(MessageClass::Command, args.op, args.value.as_deref())?;
    let bytes = msg
        .encode_to_vec()
        .map_err(|err| wire_error("encode failed", err))?;

    let mut link = TtyLink::open_with_config(
        &args.device,
        LinkConfig {
            baud_rate: args.baud,
        },
    )
    .map_err(|err| link_error("open failed", err))?;

    link.send(&bytes).map_err(|err| link_error("send failed", err))?;

    if args.wait {
        let reply = wait_for_reply(&mut link, wait_timeout)?;
        print_message(&reply, format);
    }

    Ok(SUCCESS)
}

fn wait_for_reply(link: &mut TtyLink, timeout: Duration) -> CliResult<gsip_wire::Message> {
    let deadline = Instant::now() + timeout;
    let mut decoder = FrameDecoder::new();

    loop {
        match link.poll_byte().map_err(|err| link_error("receive failed", err))? {
            Some(byte) => {
                if let Some(msg) = decoder.feed(byte) {
                    return Ok(msg);
                }
            }
            None => {
                if Instant::now() >= deadline {
                    return Err(CliError::new(
                        TIMEOUT,
                        format!("no reply within {timeout:?}"),
                    ));
                }
                std::thread::sleep(IDLE_POLL_INTERVAL);
            }
        }
    }
}
