//! Server-side port manager: a monotonic counter handing out the first
//! port of each new session, wrapping around its configured range.

use std::sync::Mutex;

struct State {
    next: u16,
    start: u16,
    end: u16,
}

/// Process-wide, mutex-guarded cyclic port counter.
///
/// `next_port` is called exactly once per handshake; thereafter the client
/// dictates the next port for each subsequent data message. Exhaustion
/// wraps silently back to `start` - this may collide with an in-flight
/// dispatcher on a long-running server with a narrow range (see
/// `DESIGN.md` Open Question 4).
pub struct PortManager {
    state: Mutex<State>,
}

impl PortManager {
    pub fn new(start: u16, end: u16) -> Self {
        PortManager {
            state: Mutex::new(State { next: start, start, end }),
        }
    }

    /// Hand out the next port and advance the counter.
    pub fn next_port(&self) -> u16 {
        let mut state = self.state.lock().unwrap();
        let port = state.next;
        state.next = if state.next >= state.end {
            state.start
        } else {
            state.next + 1
        };
        port
    }
}
