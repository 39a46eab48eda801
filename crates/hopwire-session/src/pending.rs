//! Client-side record of a sent data packet awaiting acknowledgment.

/// One entry per sent data message, inserted after a successful send and
/// removed either when its `ack_seq` arrives on the ACK listener or
/// immediately if the send itself failed at the socket layer.
#[derive(Debug, Clone)]
pub struct Pending {
    pub packet_bytes: Vec<u8>,
    pub sent_at: tokio::time::Instant,
    pub retries: u32,
}

impl Pending {
    pub fn new(packet_bytes: Vec<u8>) -> Self {
        Pending {
            packet_bytes,
            sent_at: tokio::time::Instant::now(),
            retries: 0,
        }
    }

    /// Age of this entry relative to `now`.
    pub fn age(&self, now: tokio::time::Instant) -> std::time::Duration {
        now.saturating_duration_since(self.sent_at)
    }
}
