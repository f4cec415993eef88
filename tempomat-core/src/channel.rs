//! Latest-value channel
//!
//! A single-slot cell shared between periodic tasks. Writers overwrite,
//! readers peek; neither side ever waits. The slot models "current state",
//! so a reader that misses intermediate values has simply not looked yet.
//!
//! The slot is guarded by an `embassy-sync` blocking mutex. With
//! `CriticalSectionRawMutex` a whole multi-field value is replaced inside one
//! critical section, so a preempting reader sees either the old value or the
//! new one, never a mix of both.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Single-slot, overwrite-always, non-blocking state cell
pub struct LatestChannel<M: RawMutex, T: Copy> {
    slot: Mutex<M, Cell<Option<T>>>,
    default: T,
}

impl<M: RawMutex, T: Copy> LatestChannel<M, T> {
    /// Create an empty channel
    ///
    /// `default` is what [`peek`](Self::peek) returns until the first
    /// [`overwrite`](Self::overwrite).
    pub const fn new(default: T) -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
            default,
        }
    }

    /// Publish a value, replacing whatever was there
    pub fn overwrite(&self, value: T) {
        self.slot.lock(|slot| slot.set(Some(value)));
    }

    /// Latest published value, or the default if nothing was published yet
    pub fn peek(&self) -> T {
        self.try_peek().unwrap_or(self.default)
    }

    /// Latest published value, or `None` if nothing was published yet
    pub fn try_peek(&self) -> Option<T> {
        self.slot.lock(|slot| slot.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
    use proptest::prelude::*;

    #[test]
    fn test_peek_before_publish_returns_default() {
        let channel: LatestChannel<NoopRawMutex, u16> = LatestChannel::new(7);
        assert_eq!(channel.peek(), 7);
        assert_eq!(channel.try_peek(), None);
    }

    #[test]
    fn test_overwrite_replaces_previous_value() {
        let channel: LatestChannel<NoopRawMutex, bool> = LatestChannel::new(false);
        channel.overwrite(true);
        channel.overwrite(false);
        assert!(!channel.peek());
        assert_eq!(channel.try_peek(), Some(false));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let channel: LatestChannel<NoopRawMutex, u16> = LatestChannel::new(0);
        channel.overwrite(42);
        assert_eq!(channel.peek(), 42);
        assert_eq!(channel.peek(), 42);
    }

    #[derive(Clone, Copy)]
    struct Pair {
        a: u32,
        b: u32,
    }

    static PAIR: LatestChannel<CriticalSectionRawMutex, Pair> =
        LatestChannel::new(Pair { a: 0, b: 0 });

    #[test]
    fn test_concurrent_readers_never_see_torn_value() {
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..20_000u32 {
                    PAIR.overwrite(Pair { a: i, b: !i });
                }
            });
            for _ in 0..2 {
                s.spawn(|| {
                    let mut last = 0u32;
                    for _ in 0..20_000 {
                        if let Some(pair) = PAIR.try_peek() {
                            assert_eq!(pair.b, !pair.a);
                            // single writer, increasing sequence
                            assert!(pair.a >= last);
                            last = pair.a;
                        }
                    }
                });
            }
        });
    }

    proptest! {
        #[test]
        fn prop_peek_returns_last_overwrite(values in proptest::collection::vec(any::<u16>(), 1..64)) {
            let channel: LatestChannel<NoopRawMutex, u16> = LatestChannel::new(0);
            for v in &values {
                channel.overwrite(*v);
            }
            prop_assert_eq!(channel.peek(), *values.last().unwrap());
        }
    }
}
