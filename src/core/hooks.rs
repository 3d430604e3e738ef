//! Timing and debug hooks around query phases
//!
//! The engine takes a `&dyn QueryHooks` and calls it synchronously around the
//! named phases (`query_releases`, `query_tags`, one per release). Every
//! method defaults to a no-op, so hooks never affect the result.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

pub trait QueryHooks {
  fn start_timer(&self, _key: &str) {}

  fn stop_timer(&self, _key: &str) {}

  fn debug(&self, _message: fmt::Arguments<'_>) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl QueryHooks for NoopHooks {}

/// Run `f` between `start_timer(key)` and `stop_timer(key)`
pub fn timed<T>(hooks: &dyn QueryHooks, key: &str, f: impl FnOnce() -> T) -> T {
  hooks.start_timer(key);
  let result = f();
  hooks.stop_timer(key);
  result
}

/// Hooks routed to `tracing`: debug messages at DEBUG, phase timings at INFO
#[derive(Debug, Default)]
pub struct TracingHooks {
  timings: bool,
  started: RefCell<HashMap<String, Instant>>,
}

impl TracingHooks {
  pub fn new(timings: bool) -> Self {
    Self {
      timings,
      started: RefCell::new(HashMap::new()),
    }
  }
}

impl QueryHooks for TracingHooks {
  fn start_timer(&self, key: &str) {
    if self.timings {
      self.started.borrow_mut().insert(key.to_string(), Instant::now());
    }
  }

  fn stop_timer(&self, key: &str) {
    if !self.timings {
      return;
    }
    if let Some(start) = self.started.borrow_mut().remove(key) {
      let elapsed = start.elapsed();
      tracing::info!(phase = %key, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "timer");
    }
  }

  fn debug(&self, message: fmt::Arguments<'_>) {
    tracing::debug!("{}", message);
  }
}
