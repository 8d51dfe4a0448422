use mcubridge_dispatch::BoardConfig;

use crate::cmd::BoardArgs;
use crate::exit::{dispatch_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(args: BoardArgs, format: OutputFormat) -> CliResult<i32> {
    let board = match &args.file {
        Some(path) => BoardConfig::from_file(path)
            .map_err(|err| dispatch_error("board config rejected", err))?,
        None => BoardConfig::full_grid(),
    };

    let (_regs, gpio) = board
        .build_gpio()
        .map_err(|err| dispatch_error("board build failed", err))?;

    print_ports(&gpio.snapshot(), format);
    tracing::info!(ports = gpio.len(), "board validated");
    Ok(SUCCESS)
}
