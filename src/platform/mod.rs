//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock in milliseconds)
//! - Storage (LocalStorage on web)
//! - Interval timers (power expiry sweep, animation counter)

pub mod storage;
pub mod time;
pub mod timer;

pub use storage::LocalStore;
pub use time::{Clock, ManualClock, SystemClock};
pub use timer::IntervalTimer;
#[cfg(target_arch = "wasm32")]
pub use timer::IntervalHandle;
