//! The monotonic clock of `spec.md` §4.5: one slot per `SECONDS_PER_SLOT`
//! seconds since `genesis_time`, each slot split into
//! `INTERVALS_PER_SLOT` (3) equal intervals — 0=propose, 1=attest,
//! 2=aggregate/observe.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use types::config::preset::{INTERVALS_PER_SLOT, SECONDS_PER_SLOT};

const MILLIS_PER_SLOT: u64 = SECONDS_PER_SLOT * 1000;

/// A clock that can answer "what slot/interval is it" and "how long
/// until the next one". `beacon_node/timer` polls this on a fixed tick;
/// `Client` never reads the wall clock directly.
pub trait SlotClock: Send + Sync {
    /// `None` before `genesis_time` has arrived.
    fn now(&self) -> Option<u64>;

    /// The interval (`0..INTERVALS_PER_SLOT`) within the current slot.
    fn current_interval(&self) -> Option<u8>;

    /// How long until the start of the next interval (slot boundary or
    /// intra-slot interval boundary, whichever is sooner).
    fn duration_to_next_interval(&self) -> Option<Duration>;

    fn genesis_time(&self) -> u64;
}

/// Maps `millis_into_slot` to the interval it falls in. `SECONDS_PER_SLOT`
/// need not be evenly divisible by `INTERVALS_PER_SLOT` (mainnet's 4/3
/// is not): this buckets by scaling rather than by a fixed per-interval
/// length, so it stays exact and always lands in `0..INTERVALS_PER_SLOT`.
fn interval_of(millis_into_slot: u64) -> u8 {
    ((millis_into_slot * INTERVALS_PER_SLOT) / MILLIS_PER_SLOT) as u8
}

/// The first millisecond (relative to slot start) at which `interval`
/// begins — the inverse boundary of `interval_of`, rounded up so a
/// sleep computed from it never wakes before the interval has actually
/// started.
fn interval_start_millis(interval: u64) -> u64 {
    (interval * MILLIS_PER_SLOT).div_ceil(INTERVALS_PER_SLOT)
}

/// A `SlotClock` driven by the system's wall-clock time.
pub struct SystemTimeSlotClock {
    genesis_time: u64,
}

impl SystemTimeSlotClock {
    pub fn new(genesis_time: u64) -> Self {
        SystemTimeSlotClock { genesis_time }
    }

    fn millis_since_genesis(&self) -> Option<u64> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let genesis = Duration::from_secs(self.genesis_time);
        now.checked_sub(genesis).map(|d| d.as_millis() as u64)
    }
}

impl SlotClock for SystemTimeSlotClock {
    fn now(&self) -> Option<u64> {
        self.millis_since_genesis().map(|elapsed| elapsed / MILLIS_PER_SLOT)
    }

    fn current_interval(&self) -> Option<u8> {
        let elapsed = self.millis_since_genesis()?;
        Some(interval_of(elapsed % MILLIS_PER_SLOT))
    }

    fn duration_to_next_interval(&self) -> Option<Duration> {
        let elapsed = self.millis_since_genesis()?;
        let millis_into_slot = elapsed % MILLIS_PER_SLOT;
        let interval = interval_of(millis_into_slot) as u64;
        let next_boundary = interval_start_millis(interval + 1);
        Some(Duration::from_millis(next_boundary - millis_into_slot))
    }

    fn genesis_time(&self) -> u64 {
        self.genesis_time
    }
}
