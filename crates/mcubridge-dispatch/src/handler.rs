//! The address-keyed dispatch table.

use std::collections::HashMap;

use mcubridge_frame::{address_name, is_reserved, CommandFrame};

use crate::error::{DispatchError, Result};

/// A peripheral handler reachable through the dispatch table.
///
/// Handlers mutate the frame's `data` in place to stage a response
/// payload; a handler that leaves the frame untouched is a no-op from
/// the host's point of view. `Send` because the service loop that owns
/// the table typically runs on its own thread.
pub trait Peripheral: Send {
    /// Short name for logs and the configuration table.
    fn name(&self) -> &'static str;

    /// Process one frame addressed to this peripheral.
    fn handle(&mut self, frame: &mut CommandFrame);
}

/// Routes decoded frames to handlers by address.
///
/// The table is populated once at configuration time with the
/// peripherals the build actually has; "address present" is a map
/// lookup. Routing is total: reserved addresses and unassigned
/// addresses are documented no-ops, never errors, and nothing about a
/// frame's handling depends on any prior frame.
pub struct DispatchTable {
    handlers: HashMap<u8, Box<dyn Peripheral>>,
    dropped_frames: u64,
}

impl DispatchTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            dropped_frames: 0,
        }
    }

    /// Register a handler for a dispatch address.
    ///
    /// Fails at configuration time for the two reserved addresses and
    /// for an address that already has a handler.
    pub fn register(&mut self, address: u8, handler: Box<dyn Peripheral>) -> Result<()> {
        if is_reserved(address) {
            return Err(DispatchError::ReservedAddress(address));
        }
        if self.handlers.contains_key(&address) {
            return Err(DispatchError::AddressInUse(address));
        }
        tracing::debug!(
            address,
            peripheral = handler.name(),
            "registered dispatch handler"
        );
        self.handlers.insert(address, handler);
        Ok(())
    }

    /// Route one frame to its handler.
    ///
    /// Reserved addresses (presence probe, reset request) are no-ops
    /// at this layer. An address with no handler is silently ignored;
    /// the only trace it leaves is a debug event and the
    /// [`dropped_frames`](Self::dropped_frames) counter.
    pub fn route(&mut self, frame: &mut CommandFrame) {
        if is_reserved(frame.address) {
            tracing::debug!(
                address = frame.address,
                name = address_name(frame.address),
                "reserved address, no-op"
            );
            return;
        }

        match self.handlers.get_mut(&frame.address) {
            Some(handler) => handler.handle(frame),
            None => {
                self.dropped_frames += 1;
                tracing::debug!(
                    address = frame.address,
                    command = frame.command,
                    "no handler for address, frame ignored"
                );
            }
        }
    }

    /// Whether an address has a configured handler.
    pub fn contains(&self, address: u8) -> bool {
        self.handlers.contains_key(&address)
    }

    /// Configured addresses with their handler names, sorted by address.
    pub fn assignments(&self) -> Vec<(u8, &'static str)> {
        let mut out: Vec<_> = self
            .handlers
            .iter()
            .map(|(addr, handler)| (*addr, handler.name()))
            .collect();
        out.sort_by_key(|(addr, _)| *addr);
        out
    }

    /// Number of frames routed to addresses with no handler.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use mcubridge_frame::{CHECK_BUILD, RESET_ADDRESS};

    use super::*;

    struct Echo {
        calls: u32,
    }

    impl Peripheral for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn handle(&mut self, frame: &mut CommandFrame) {
            self.calls += 1;
            frame.data = frame.data.wrapping_add(1);
        }
    }

    #[test]
    fn routes_to_the_registered_handler() {
        let mut table = DispatchTable::new();
        table.register(0x30, Box::new(Echo { calls: 0 })).unwrap();

        let mut frame = CommandFrame::new(0x30, 0x00, 41);
        table.route(&mut frame);
        assert_eq!(frame.data, 42);
    }

    #[test]
    fn unknown_address_is_a_silent_no_op() {
        let mut table = DispatchTable::new();
        table.register(0x30, Box::new(Echo { calls: 0 })).unwrap();

        let mut frame = CommandFrame::new(0x55, 0x07, 0xBEEF);
        table.route(&mut frame);

        assert_eq!(frame.data, 0xBEEF);
        assert_eq!(frame.command, 0x07);
        assert_eq!(table.dropped_frames(), 1);
    }

    #[test]
    fn reserved_addresses_are_no_ops_even_without_handlers() {
        let mut table = DispatchTable::new();

        for address in [CHECK_BUILD, RESET_ADDRESS] {
            let mut frame = CommandFrame::new(address, 0x00, 0x1234);
            table.route(&mut frame);
            assert_eq!(frame.data, 0x1234);
        }
        assert_eq!(table.dropped_frames(), 0);
    }

    #[test]
    fn reserved_addresses_cannot_be_registered() {
        let mut table = DispatchTable::new();
        assert!(matches!(
            table.register(CHECK_BUILD, Box::new(Echo { calls: 0 })),
            Err(DispatchError::ReservedAddress(_))
        ));
    }

    #[test]
    fn double_registration_fails_at_configuration_time() {
        let mut table = DispatchTable::new();
        table.register(0x30, Box::new(Echo { calls: 0 })).unwrap();
        assert!(matches!(
            table.register(0x30, Box::new(Echo { calls: 0 })),
            Err(DispatchError::AddressInUse(0x30))
        ));
    }

    #[test]
    fn routing_is_stateless_across_frames() {
        let mut table = DispatchTable::new();
        table.register(0x30, Box::new(Echo { calls: 0 })).unwrap();

        let mut first = CommandFrame::new(0x99, 0x00, 7);
        table.route(&mut first);

        // The dropped frame above must not influence this one.
        let mut second = CommandFrame::new(0x30, 0x00, 7);
        table.route(&mut second);
        assert_eq!(second.data, 8);
    }

    #[test]
    fn assignments_are_sorted() {
        let mut table = DispatchTable::new();
        table.register(0x31, Box::new(Echo { calls: 0 })).unwrap();
        table.register(0x30, Box::new(Echo { calls: 0 })).unwrap();

        assert_eq!(table.assignments(), vec![(0x30, "echo"), (0x31, "echo")]);
    }
}
