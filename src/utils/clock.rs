use super::time_utils::current_timestamp;
#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" for every publication and expiry window.
///
/// Handlers never call the system time directly, they ask the
/// clock stored in the app state so tests can move time around.
pub trait Clock: Send + Sync {
  /// Current time as UNIX seconds.
  fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> i64 {
    current_timestamp()
  }
}

// Settable clock for tests. Atomic so it can sit in the
// shared app state while a test moves it forward.
#[cfg(test)]
pub struct FixedClock {
  now: AtomicI64
}

#[cfg(test)]
impl FixedClock {
  pub fn new(now: i64) -> Self {
    Self {
      now: AtomicI64::new(now)
    }
  }

  pub fn set(&self, now: i64) {
    self.now.store(now, Ordering::SeqCst);
  }

  pub fn advance(&self, seconds: i64) {
    self.now.fetch_add(seconds, Ordering::SeqCst);
  }
}

#[cfg(test)]
impl Clock for FixedClock {
  fn now(&self) -> i64 {
    self.now.load(Ordering::SeqCst)
  }
}
