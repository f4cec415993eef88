//! Monotonic time source

/// Monotonic millisecond clock
///
/// Injected wherever task logic needs wall time (busy-waiting, release
/// bookkeeping) so it can run against a fake clock on the host.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since_ms`
    fn elapsed_since(&self, since_ms: u64) -> u64 {
        self.now_ms().saturating_sub(since_ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
