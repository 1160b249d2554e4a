// src/rocksim/serial.rs

//! Serial number allocation for exported parts
//!
//! Every part node in a RockSim file carries a serial number, and the
//! document trailer records the last one handed out. The allocator is
//! owned by a single export run, so concurrent exports cannot bleed
//! serials into each other and a given design always serializes the
//! same way.

/// Hands out part serial numbers for one export run.
///
/// Serials start at 1 and increase in allocation order, which follows
/// the conversion walk: a parent is numbered before its children.
#[derive(Debug)]
pub struct SerialAllocator {
    next: i32,
}

impl SerialAllocator {
    pub fn new() -> Self {
        SerialAllocator { next: 1 }
    }

    /// Allocate the next serial number.
    pub fn next(&mut self) -> i32 {
        let serial = self.next;
        self.next += 1;
        serial
    }

    /// The last serial handed out, or 0 if none were.
    pub fn last_assigned(&self) -> i32 {
        self.next - 1
    }
}

impl Default for SerialAllocator {
    fn default() -> Self {
        Self::new()
    }
}
