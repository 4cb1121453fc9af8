//! # Heading Subscription
//!
//! Bridges a platform heading sensor to a display callback. A
//! [`HeadingSubscriber`] is mounted when its view appears and unmounted when it
//! goes away; in between, every raw sensor sample is normalized to [0, 360)
//! and forwarded to the callback.
//!
//! ## Lifecycle
//!
//! ```text
//!            mount (sensor available)
//! Inactive ───────────────────────────▶ Active
//!    ▲                                    │
//!    └──────────────── unmount ───────────┘
//! ```
//!
//! - Mounting while `Active` is a no-op: one subscriber never holds two sensor
//!   subscriptions
//! - Mounting with no sensor available leaves the subscriber `Inactive`
//!   without reporting an error
//! - Unmounting while `Inactive` is a no-op
//! - Dropping an `Active` subscriber unmounts it

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback receiving heading values in degrees.
pub type HeadingCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// A device service delivering magnetic heading samples.
pub trait HeadingSensor {
    /// Whether the device can report a heading at all.
    fn heading_available(&self) -> bool;

    /// Start pushing raw samples (degrees, possibly negative) to `on_sample`.
    fn start_updating_heading(&self, on_sample: HeadingCallback);

    /// Stop pushing samples.
    fn stop_updating_heading(&self);
}

impl<S: HeadingSensor + ?Sized> HeadingSensor for Box<S> {
    fn heading_available(&self) -> bool {
        (**self).heading_available()
    }

    fn start_updating_heading(&self, on_sample: HeadingCallback) {
        (**self).start_updating_heading(on_sample)
    }

    fn stop_updating_heading(&self) {
        (**self).stop_updating_heading()
    }
}

/// Map a raw reading onto [0, 360).
///
/// Negative readings too small to survive `360 + raw` in f64 land on 0.
///
/// # Example
/// ```
/// use compass_map_lib::heading::normalize_heading;
///
/// assert_eq!(normalize_heading(-10.0), 350.0);
/// assert_eq!(normalize_heading(359.5), 359.5);
/// ```
pub fn normalize_heading(raw: f64) -> f64 {
    if raw >= 0.0 {
        raw
    } else {
        let wrapped = 360.0 + raw;
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionState {
    Inactive,
    Active,
}

/// Forwards normalized heading samples from `S` to a callback while mounted.
pub struct HeadingSubscriber<S: HeadingSensor> {
    sensor: S,
    on_update: HeadingCallback,
    state: SubscriptionState,
    /// Cleared on unmount; samples already in flight check it before forwarding
    live: Arc<AtomicBool>,
}

impl<S: HeadingSensor> HeadingSubscriber<S> {
    pub fn new(sensor: S, on_update: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self {
            sensor,
            on_update: Arc::new(on_update),
            state: SubscriptionState::Inactive,
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SubscriptionState::Active
    }

    pub fn mount(&mut self) {
        if self.is_active() {
            return;
        }
        if !self.sensor.heading_available() {
            log::debug!("Heading sensor unavailable, compass stays inactive");
            return;
        }

        // Fresh flag per mount so a stale sample from an earlier mount stays dropped
        let live = Arc::new(AtomicBool::new(true));
        self.live = Arc::clone(&live);
        let on_update = Arc::clone(&self.on_update);
        self.sensor.start_updating_heading(Arc::new(move |raw: f64| {
            if live.load(Ordering::Acquire) {
                on_update(normalize_heading(raw))
            }
        }));
        self.state = SubscriptionState::Active;
        log::debug!("Heading updates started");
    }

    pub fn unmount(&mut self) {
        if !self.is_active() {
            return;
        }
        self.live.store(false, Ordering::Release);
        self.sensor.stop_updating_heading();
        self.state = SubscriptionState::Inactive;
        log::debug!("Heading updates stopped");
    }
}

impl<S: HeadingSensor> Drop for HeadingSubscriber<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
