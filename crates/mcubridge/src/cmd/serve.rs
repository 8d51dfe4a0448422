use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mcubridge_bus::BusLink;
use mcubridge_dispatch::{BoardConfig, Bridge};

use crate::cmd::ServeArgs;
use crate::exit::{bus_error, dispatch_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let board = match &args.board {
        Some(path) => BoardConfig::from_file(path)
            .map_err(|err| dispatch_error("board config rejected", err))?,
        None => BoardConfig::full_grid(),
    };

    // Starts clear; ctrl-c raises it and the loop winds down between
    // frames.
    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(stop.clone())?;

    if let Some(path) = &args.spi {
        let link = BusLink::open_spi(path).map_err(|err| bus_error("spi open failed", err))?;
        return serve_link(link, &board, &stop);
    }
    if let Some(path) = &args.i2c {
        let link = BusLink::open_i2c(path).map_err(|err| bus_error("i2c open failed", err))?;
        return serve_link(link, &board, &stop);
    }
    if let Some(path) = &args.socket {
        return serve_socket(path, &board, &stop, args.once);
    }

    Err(CliError::new(
        USAGE,
        "one of --spi, --i2c or --socket is required",
    ))
}

fn serve_link(link: BusLink, board: &BoardConfig, stop: &AtomicBool) -> CliResult<i32> {
    let (_regs, table) = board
        .build_table()
        .map_err(|err| dispatch_error("board build failed", err))?;
    let bridge = Bridge::over_link(link, table)
        .map_err(|err| dispatch_error("bridge setup failed", err))?;
    run_bridge(bridge, stop)
}

fn run_bridge(mut bridge: Bridge<BusLink, BusLink>, stop: &AtomicBool) -> CliResult<i32> {
    let frames = bridge
        .serve_until(stop)
        .map_err(|err| dispatch_error("bridge failed", err))?;
    tracing::info!(frames, "session ended");
    Ok(SUCCESS)
}

fn serve_socket(
    path: &std::path::Path,
    board: &BoardConfig,
    stop: &AtomicBool,
    once: bool,
) -> CliResult<i32> {
    // A stale socket file from a previous run would fail the bind.
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|err| io_error("failed removing stale socket", err))?;
    }
    let listener = std::os::unix::net::UnixListener::bind(path)
        .map_err(|err| io_error("bind failed", err))?;
    tracing::info!(path = %path.display(), "bridge listening");

    while !stop.load(Ordering::SeqCst) {
        let (stream, _) = listener
            .accept()
            .map_err(|err| io_error("accept failed", err))?;

        // A freshly accepted stream has no stale bytes to drain, and a
        // drain here could eat a frame the host already sent.
        let (_regs, table) = board
            .build_table()
            .map_err(|err| dispatch_error("board build failed", err))?;
        let link = BusLink::from_unix(stream);
        let writer = link
            .try_clone()
            .map_err(|err| bus_error("link clone failed", err))?;

        let code = run_bridge(Bridge::new(link, writer, table), stop)?;
        if once {
            return Ok(code);
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
