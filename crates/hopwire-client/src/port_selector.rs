//! Client-side next-port selection.
//!
//! Unlike the server's monotonic [`hopwire_session::PortManager`], the
//! client picks its declared `next_port` uniformly at random within the
//! configured range on every send - matching the reference implementation's
//! `PortSelector.GetNextPort`, which used `rand.Intn` rather than a counter.

use rand::Rng;

pub struct PortSelector {
    start: u16,
    end: u16,
}

impl PortSelector {
    pub fn new(start: u16, end: u16) -> Self {
        PortSelector { start, end }
    }

    pub fn next_port(&self) -> u16 {
        rand::thread_rng().gen_range(self.start..=self.end)
    }
}
