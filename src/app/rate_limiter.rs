/**
 * Just count the amount of times the forms are being
 * submitted per unit of time, supposed to block them 
 * entirely for a specific "block time" when that happens.
 * Timestamps are passed in so the app state clock is the
 * only source of time.
 */
pub struct BasicRateLimiter {
  counter: u32,
  last_update: i64,
  is_limited: bool,
  max_requests: u32,
  max_requests_time: u32,
  block_duration: u32
}

impl BasicRateLimiter {

  pub fn new(
    max_requests: u32, 
    max_requests_time: u32, 
    block_duration: u32,
    now: i64
  ) -> Self {
    Self {
      counter: 0,
      last_update: now,
      is_limited: false,
      max_requests,
      max_requests_time,
      block_duration
    }
  }
 
  pub fn is_locked(&self) -> bool {
    self.is_limited
  }

  pub fn is_expired(&self, now: i64) -> bool {
    // If currently locked, check if past block_duration.
    // Check if past max_request_time otherwise.
    if self.is_locked() {
      now - self.last_update >= self.block_duration.into()
    } else {
      now - self.last_update >= self.max_requests_time.into()
    }
  }

  // Counts a request. Returns true when the request has 
  // to be refused.
  pub fn update(&mut self, now: i64) -> bool {
    if self.is_expired(now) {
      // Reset, this request is the first of a new window:
      self.counter = 1;
      self.last_update = now;
      self.is_limited = false;
    } else if !self.is_limited {
      self.counter += 1;
    }
    // Are we above the rate limit?
    if !self.is_limited && self.counter > self.max_requests {
      self.is_limited = true;
      // Block duration starts now:
      self.last_update = now;
    }
    self.is_limited
  }

}
