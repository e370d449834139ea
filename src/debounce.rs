//! Debounced callbacks for search and filter inputs

use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;

/// Runs only the last of a burst of calls, after `delay_ms` of quiet
#[derive(Clone, Copy)]
pub struct Debouncer {
    generation: StoredValue<u64>,
    delay_ms: u64,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            generation: StoredValue::new(0),
            delay_ms,
        }
    }

    pub fn run(&self, f: impl FnOnce() + 'static) {
        let generation = self.generation;
        let Some(current) = generation.try_update_value(|g| {
            *g += 1;
            *g
        }) else {
            return;
        };
        let delay = Duration::from_millis(self.delay_ms);
        spawn_local(async move {
            gloo_timers::future::sleep(delay).await;
            // Superseded, or the owner is gone
            if generation.try_get_value() == Some(current) {
                f();
            }
        });
    }

    /// Drop a pending call
    pub fn cancel(&self) {
        let _ = self.generation.try_update_value(|g| *g += 1);
    }
}
