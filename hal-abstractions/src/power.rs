//! Wake timer and deep sleep control

/// Wake-timer-armed deep sleep
///
/// On real hardware `enter_deep_sleep` arms the wake timer and cuts
/// power to everything but the RTC; the call never returns and the
/// firmware restarts from the top on wake. Host implementations
/// return so the cycle harness (and tests) can observe the
/// transition.
pub trait WakeSleep {
    /// Arm the wake timer for `duration_secs` and enter the
    /// minimum-power state
    fn enter_deep_sleep(&mut self, duration_secs: u32);
}

impl<T: WakeSleep + ?Sized> WakeSleep for &mut T {
    fn enter_deep_sleep(&mut self, duration_secs: u32) {
        T::enter_deep_sleep(self, duration_secs)
    }
}
