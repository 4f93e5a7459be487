mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gsip", version, about = "GSIP frame and serial-device CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "gsip", "encode", "--op", "0x02", "--value", "10000000",
        ])
        .expect("encode args should parse");

        assert!(matches!(cli.command, Command::Encode(_)));
    }

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "gsip",
            "send",
            "/dev/ttyUSB0",
            "--op",
            "0x01",
            "--wait",
            "--wait-timeout",
            "2s",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_watch_with_count() {
        let cli = Cli::try_parse_from([
            "gsip", "watch", "/dev/ttyUSB0", "--baud", "9600", "--count", "3",
        ])
        .expect("watch args should parse");

        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.baud, 9600);
                assert_eq!(args.count, Some(3));
            }
            other => panic!("expected watch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_class() {
        let err = Cli::try_parse_from([
            "gsip", "encode", "--class", "status", "--op", "0",
        ])
        .expect_err("unknown class should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
