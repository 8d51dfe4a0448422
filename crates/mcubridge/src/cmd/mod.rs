use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod board;
pub mod decode;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bridge service loop over a bus link.
    Serve(ServeArgs),
    /// Send one command frame and print the response (host side).
    Send(SendArgs),
    /// Decode 4 wire bytes into a command frame.
    Decode(DecodeArgs),
    /// Validate a board config and print its logical ports.
    Board(BoardArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Board(args) => board::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// SPI slave device to serve on (e.g. /dev/spidev0.0).
    #[arg(long, value_name = "DEV", conflicts_with_all = ["i2c", "socket"])]
    pub spi: Option<PathBuf>,
    /// I2C slave device to serve on (e.g. /dev/i2c-1).
    #[arg(long, value_name = "DEV", conflicts_with_all = ["spi", "socket"])]
    pub i2c: Option<PathBuf>,
    /// Unix socket to bind as a loopback bus.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["spi", "i2c"])]
    pub socket: Option<PathBuf>,
    /// Board config file (JSON). Defaults to the full pin grid.
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,
    /// Exit after the first session ends (socket binding only).
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Unix socket of a running bridge.
    pub path: PathBuf,
    /// Target address (decimal or 0x-prefixed hex).
    #[arg(long, short = 'a', value_parser = parse_u8)]
    pub address: u8,
    /// Command byte.
    #[arg(long, short = 'c', value_parser = parse_u8)]
    pub command: u8,
    /// 16-bit data payload.
    #[arg(long, short = 'd', default_value = "0", value_parser = parse_u16)]
    pub data: u16,
    /// Do not wait for the 4 response bytes.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire bytes as colon- or space-separated hex, e.g. 20:01:12:00.
    pub bytes: String,
    /// Decode as a response (32-bit value, LSB first) instead of a
    /// request frame.
    #[arg(long)]
    pub response: bool,
}

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Board config file (JSON). Defaults to the full pin grid.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a byte from decimal or `0x` hex.
pub fn parse_u8(input: &str) -> Result<u8, String> {
    parse_number(input).and_then(|value| {
        u8::try_from(value).map_err(|_| format!("{input} does not fit in 8 bits"))
    })
}

/// Parse a 16-bit value from decimal or `0x` hex.
pub fn parse_u16(input: &str) -> Result<u16, String> {
    parse_number(input).and_then(|value| {
        u16::try_from(value).map_err(|_| format!("{input} does not fit in 16 bits"))
    })
}

fn parse_number(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_in_both_bases() {
        assert_eq!(parse_u8("0x20"), Ok(0x20));
        assert_eq!(parse_u8("32"), Ok(32));
        assert_eq!(parse_u16("0x0012"), Ok(0x0012));
        assert_eq!(parse_u16("65535"), Ok(0xFFFF));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(parse_u8("0x100").is_err());
        assert!(parse_u16("65536").is_err());
        assert!(parse_u8("nope").is_err());
    }
}
