use mcubridge_frame::{decode_request, FRAME_SIZE};

use crate::cmd::DecodeArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, print_response, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_wire_bytes(&args.bytes)?;

    if args.response {
        print_response(bytes, format);
    } else {
        print_frame(&decode_request(bytes), format);
    }

    Ok(SUCCESS)
}

fn parse_wire_bytes(input: &str) -> CliResult<[u8; FRAME_SIZE]> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != FRAME_SIZE {
        return Err(CliError::new(
            USAGE,
            format!("expected {FRAME_SIZE} wire bytes, got {}", parts.len()),
        ));
    }

    let mut bytes = [0u8; FRAME_SIZE];
    for (slot, part) in bytes.iter_mut().zip(&parts) {
        *slot = u8::from_str_radix(part.trim_start_matches("0x"), 16)
            .map_err(|_| CliError::new(USAGE, format!("invalid hex byte: {part}")))?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_and_space_separators_both_parse() {
        assert_eq!(parse_wire_bytes("20:01:12:00").unwrap(), [0x20, 0x01, 0x12, 0x00]);
        assert_eq!(parse_wire_bytes("20 01 12 00").unwrap(), [0x20, 0x01, 0x12, 0x00]);
        assert_eq!(
            parse_wire_bytes("0x20:0x01:0x12:0x00").unwrap(),
            [0x20, 0x01, 0x12, 0x00]
        );
    }

    #[test]
    fn wrong_byte_count_is_a_usage_error() {
        assert_eq!(parse_wire_bytes("20:01:12").unwrap_err().code, USAGE);
        assert_eq!(parse_wire_bytes("20:01:12:00:55").unwrap_err().code, USAGE);
    }

    #[test]
    fn non_hex_input_is_a_usage_error() {
        assert_eq!(parse_wire_bytes("20:01:zz:00").unwrap_err().code, USAGE);
    }
}
