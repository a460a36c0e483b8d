//! Interval timers that run beside the frame loop
//!
//! The power-expiry sweep (1s) and the cosmetic animation counter (16ms) are
//! separate from the per-frame tick. Natively they are driven from a clock by
//! [`IntervalTimer`]; on web each one is a `setInterval` owned by an
//! [`IntervalHandle`] that clears it when dropped.

/// Pull-based fixed-period timer
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: f64,
    cancelled: bool,
}

impl IntervalTimer {
    /// Create a timer whose first firing is one period after `start_ms`
    pub fn new(period_ms: f64, start_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_due_ms: start_ms + period_ms.max(1.0),
            cancelled: false,
        }
    }

    /// Number of firings due by `now_ms`; advances the schedule past them
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        let mut fired = 0;
        while now_ms >= self.next_due_ms {
            self.next_due_ms += self.period_ms;
            fired += 1;
        }
        fired
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// A running `setInterval`, cleared on drop
#[cfg(target_arch = "wasm32")]
pub struct IntervalHandle {
    id: i32,
    _closure: wasm_bindgen::closure::Closure<dyn FnMut()>,
}

#[cfg(target_arch = "wasm32")]
impl IntervalHandle {
    /// Schedule `f` every `period_ms`. Returns `None` without a window.
    pub fn start(period_ms: i32, f: impl FnMut() + 'static) -> Option<Self> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut()>::new(f);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms,
            )
            .ok()?;
        Some(Self {
            id,
            _closure: closure,
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}
