//! Retransmission tracker: periodically scans unacknowledged sends and
//! reports those that look lost. Actual retransmission is deliberately not
//! performed - port hopping has already invalidated the destination port
//! recorded for that sequence, so resending to it would not reach the
//! current dispatcher. See `DESIGN.md` Open Question 2.

use std::sync::Arc;
use std::time::Duration;

use hopwire_session::Session;
use tracing::warn;

pub const TICK_INTERVAL: Duration = Duration::from_secs(10);
pub const LOSS_THRESHOLD: Duration = Duration::from_secs(15);

/// Run the retransmission ticker forever.
pub async fn run(session: Arc<Session>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        sweep(&session);
    }
}

fn sweep(session: &Arc<Session>) {
    let now = tokio::time::Instant::now();
    let mut pending = session.pending.lock().unwrap();
    for (seq, entry) in pending.iter_mut() {
        if entry.age(now) > LOSS_THRESHOLD {
            entry.retries += 1;
            warn!(seq, retries = entry.retries, "data packet appears lost; not retransmitting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopwire_session::{Pending, SessionId};

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_reported_once_per_sweep() {
        let session = Arc::new(Session::new(SessionId::generate(), [0u8; 32]));
        session
            .pending
            .lock()
            .unwrap()
            .insert(7, Pending::new(vec![1, 2, 3]));

        tokio::time::advance(LOSS_THRESHOLD + Duration::from_secs(1)).await;
        sweep(&session);

        let pending = session.pending.lock().unwrap();
        let entry = pending.get(&7).unwrap();
        assert_eq!(entry.retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_not_reported() {
        let session = Arc::new(Session::new(SessionId::generate(), [0u8; 32]));
        session
            .pending
            .lock()
            .unwrap()
            .insert(1, Pending::new(vec![9]));

        sweep(&session);

        let pending = session.pending.lock().unwrap();
        assert_eq!(pending.get(&1).unwrap().retries, 0);
    }
}
