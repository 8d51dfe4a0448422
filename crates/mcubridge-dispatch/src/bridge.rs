//! The bridge service loop.
//!
//! One blocking cycle per frame: read four bytes, route the decoded
//! frame to its handler, send the (possibly restaged) payload back as
//! four response bytes, least significant first. Frames never overlap;
//! the next read does not start until the previous response has fully
//! left the frame layer.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use mcubridge_frame::{FrameError, FrameReader, ResponseWriter};

use crate::error::{DispatchError, Result};
use crate::handler::DispatchTable;

/// Frame-at-a-time service loop over a command link.
pub struct Bridge<R, W> {
    reader: FrameReader<R>,
    writer: ResponseWriter<W>,
    table: DispatchTable,
    frames_served: u64,
}

impl<R: Read, W: Write> Bridge<R, W> {
    /// Build a bridge from separate input and output streams.
    pub fn new(input: R, output: W, table: DispatchTable) -> Self {
        Self {
            reader: FrameReader::new(input),
            writer: ResponseWriter::new(output),
            table,
            frames_served: 0,
        }
    }

    /// Serve exactly one frame: read, route, respond.
    ///
    /// The response payload is whatever `data` holds after routing,
    /// widened to 32 bits. Handlers that ignore the frame therefore
    /// echo the request payload back unchanged.
    pub fn poll_once(&mut self) -> Result<()> {
        let mut frame = self.reader.read_frame()?;
        tracing::debug!(
            address = frame.address,
            command = frame.command,
            data = frame.data,
            "frame received"
        );

        self.table.route(&mut frame);
        self.writer.send(u32::from(frame.data))?;
        self.frames_served += 1;
        Ok(())
    }

    /// Serve frames until the host closes the link.
    ///
    /// A closed link is the normal end of a session and returns `Ok`
    /// with the number of frames served; any other failure propagates.
    pub fn serve(&mut self) -> Result<u64> {
        loop {
            match self.poll_once() {
                Ok(()) => {}
                Err(DispatchError::Frame(FrameError::LinkClosed)) => {
                    tracing::debug!(frames = self.frames_served, "link closed, session over");
                    return Ok(self.frames_served);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Serve frames until the link closes or `stop` is raised.
    ///
    /// The flag is checked between frames; a read already blocked on
    /// the link keeps blocking until the next frame or the link closes.
    pub fn serve_until(&mut self, stop: &AtomicBool) -> Result<u64> {
        loop {
            if stop.load(Ordering::SeqCst) {
                tracing::debug!(frames = self.frames_served, "stop requested");
                return Ok(self.frames_served);
            }
            match self.poll_once() {
                Ok(()) => {}
                Err(DispatchError::Frame(FrameError::LinkClosed)) => {
                    return Ok(self.frames_served)
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Frames served so far.
    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }

    /// Borrow the dispatch table.
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }
}

#[cfg(unix)]
impl Bridge<mcubridge_bus::BusLink, mcubridge_bus::BusLink> {
    /// Build a bridge over one bus link.
    ///
    /// The link is split into a reader half and a writer half, and any
    /// stale bytes pending on the receive side are drained so the
    /// session starts on a frame boundary.
    pub fn over_link(link: mcubridge_bus::BusLink, table: DispatchTable) -> Result<Self> {
        let writer = link.try_clone()?;
        Ok(Self {
            reader: FrameReader::over_link(link)?,
            writer: ResponseWriter::new(writer),
            table,
            frames_served: 0,
        })
    }
}
