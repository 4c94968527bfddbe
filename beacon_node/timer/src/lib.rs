//! Drives the node's single clock (`spec.md` §4.5 / §5): wakes up once
//! per interval boundary and emits a `Tick` so the reactor can order
//! "timer tick → inbound blocks → inbound votes → local duties" for
//! that interval. Nothing here touches consensus state directly; it
//! only tells the rest of the node what time it is.

use std::sync::Arc;

use parking_lot::Mutex;
use slog::{debug, Logger};
use slot_clock::SlotClock;
use tokio::sync::mpsc;

/// A single interval boundary having been crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub slot: u64,
    pub interval: u8,
}

/// Spawns the tick-emitting task on `executor` and returns the receiving
/// end of its channel. The task runs until the node's shutdown signal
/// fires (see `TaskExecutor::spawn`), at which point the channel closes.
pub fn spawn<C: SlotClock + 'static>(
    clock: Arc<C>,
    executor: task_executor::TaskExecutor,
) -> mpsc::Receiver<Tick> {
    let (tx, rx) = mpsc::channel(16);
    let log = executor.log().clone();
    executor.spawn(run(clock, tx, log), "timer");
    rx
}

/// A tick is only worth emitting if the (slot, interval) pair actually
/// advanced since the last one — `duration_to_next_interval` can in
/// principle fire early under a loaded scheduler, and re-announcing the
/// same interval would make the reactor re-run duties it already ran.
async fn run<C: SlotClock>(clock: Arc<C>, tx: mpsc::Sender<Tick>, log: Logger) {
    let last_emitted = Mutex::new(None::<(u64, u8)>);

    loop {
        let Some(sleep_for) = clock.duration_to_next_interval() else {
            // Before genesis: poll rather than sleep forever, since we
            // have no duration to wait on yet.
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            continue;
        };
        tokio::time::sleep(sleep_for).await;

        let (Some(slot), Some(interval)) = (clock.now(), clock.current_interval()) else {
            continue;
        };

        let is_new = {
            let mut guard = last_emitted.lock();
            let is_new = *guard != Some((slot, interval));
            *guard = Some((slot, interval));
            is_new
        };
        if !is_new {
            continue;
        }

        debug!(log, "Tick"; "slot" => slot, "interval" => interval);
        if tx.send(Tick { slot, interval }).await.is_err() {
            // Receiver dropped: the reactor has shut down.
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// A clock that reports the next interval boundary as already
    /// elapsed, so the tick loop never actually sleeps in tests.
    struct InstantClock {
        slot: std::sync::atomic::AtomicU64,
    }

    impl SlotClock for InstantClock {
        fn now(&self) -> Option<u64> {
            Some(self.slot.load(std::sync::atomic::Ordering::SeqCst))
        }
        fn current_interval(&self) -> Option<u8> {
            Some(0)
        }
        fn duration_to_next_interval(&self) -> Option<Duration> {
            self.slot.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Some(Duration::from_millis(0))
        }
        fn genesis_time(&self) -> u64 {
            0
        }
    }

    #[tokio::test]
    async fn emits_a_tick_per_distinct_slot() {
        let (signal, exit) = exit_future::signal();
        let handle = tokio::runtime::Handle::current();
        let executor = task_executor::TaskExecutor::new(handle, exit, logging::test_logger());
        let clock = Arc::new(InstantClock {
            slot: std::sync::atomic::AtomicU64::new(0),
        });

        let mut rx = spawn(clock, executor);
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_ne!(first.slot, second.slot);

        drop(signal);
    }
}
