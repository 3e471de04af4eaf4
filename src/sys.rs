//! Clocks: the injected ambient time source.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::components::instant::Instant;

/// An injectable source of the current instant.
///
/// The core never reads the ambient wall clock directly; operations
/// that need "now" take a clock, so tests can substitute a fixed one.
pub trait Clock {
    /// The current instant.
    fn instant(&self) -> Instant;
}

/// The default clock, reading the operating system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Instant::of_epoch_second_adjusted(
                elapsed.as_secs() as i64,
                i64::from(elapsed.subsec_nanos()),
            )
            .unwrap_or(Instant::EPOCH),
            // A clock before 1970 reports a negative distance.
            Err(before_epoch) => {
                let behind = before_epoch.duration();
                Instant::of_epoch_second_adjusted(
                    -(behind.as_secs() as i64),
                    -i64::from(behind.subsec_nanos()),
                )
                .unwrap_or(Instant::EPOCH)
            }
        }
    }
}

/// A clock frozen at a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn instant(&self) -> Instant {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = FixedClock(Instant::of_epoch_second(1_214_824_230));
        assert_eq!(Instant::now(&clock), Instant::of_epoch_second(1_214_824_230));
        assert_eq!(clock.instant(), clock.instant());
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let first = clock.instant();
        let second = clock.instant();
        assert!(second >= first);
        // The test suite does not run before 1970.
        assert!(first.epoch_second() > 0);
    }
}
