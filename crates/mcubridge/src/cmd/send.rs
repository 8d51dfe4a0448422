use std::io::Read;
use std::os::unix::net::UnixStream;

use mcubridge_bus::BusLink;
use mcubridge_frame::{CommandFrame, ResponseWriter, FRAME_SIZE};

use crate::cmd::SendArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let stream = UnixStream::connect(&args.path)
        .map_err(|err| io_error("connect failed", err))?;
    let mut link = BusLink::from_unix(stream);

    let frame = CommandFrame::new(args.address, args.command, args.data);
    tracing::debug!(
        address = frame.address,
        command = frame.command,
        data = frame.data,
        "sending frame"
    );

    let mut writer = ResponseWriter::new(
        link.try_clone()
            .map_err(|err| crate::exit::bus_error("link clone failed", err))?,
    );
    writer
        .send_frame(&frame)
        .map_err(|err| frame_error("send failed", err))?;

    if args.no_wait {
        print_frame(&frame, format);
        return Ok(SUCCESS);
    }

    let mut bytes = [0u8; FRAME_SIZE];
    link.read_exact(&mut bytes)
        .map_err(|err| io_error("response read failed", err))?;
    print_response(bytes, format);

    Ok(SUCCESS)
}
