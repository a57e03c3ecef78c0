// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Subscription to the recognition engine and hand-off to the frame loop.
//!
//! The engine may call back from any thread. The callback only runs the
//! edge detector and parks the resulting event; the frame loop drains it
//! at the start of the next tick. At most one transition is ever pending:
//! a transition that arrives while its opposite is still queued cancels
//! it, since the listener has not yet left the state it is in.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::{TargetStatus, TrackIndicator, TrackingEvent, TrackingListener, TrackingState};

/// Handle identifying one registration with a [`RecognitionSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Status-change callback registered with the recognition engine
pub type StatusCallback = Box<dyn Fn(TargetStatus) + Send + Sync>;

/// The recognition engine's notification surface
pub trait RecognitionSource: Send + Sync {
    fn subscribe(&self, callback: StatusCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Debug, Default)]
struct BridgeShared {
    indicator: TrackIndicator,
    pending: Option<TrackingEvent>,
    collapsed: u64,
}

impl BridgeShared {
    fn push(&mut self, event: TrackingEvent) {
        match self.pending {
            Some(queued) if queued == event.opposite() => {
                debug!("{:?} cancels undelivered {:?}", event, queued);
                self.pending = None;
                self.collapsed += 1;
            }
            _ => self.pending = Some(event),
        }
    }
}

/// Lifetime-scoped link between a recognition source and a listener
pub struct TrackingBridge {
    source: Arc<dyn RecognitionSource>,
    subscription: SubscriptionId,
    shared: Arc<Mutex<BridgeShared>>,
}

impl TrackingBridge {
    /// Subscribe to `source`; the subscription ends when the bridge drops
    pub fn new(source: Arc<dyn RecognitionSource>) -> Self {
        let shared = Arc::new(Mutex::new(BridgeShared::default()));
        let callback_shared = Arc::clone(&shared);

        let subscription = source.subscribe(Box::new(move |status| {
            if let Ok(mut shared) = callback_shared.lock() {
                if let Some(event) = shared.indicator.observe(status) {
                    shared.push(event);
                }
            }
        }));
        debug!("Subscribed to recognition source ({:?})", subscription);

        Self {
            source,
            subscription,
            shared,
        }
    }

    /// Feed a status directly, as the engine callback would
    pub fn notify(&self, status: TargetStatus) {
        if let Ok(mut shared) = self.shared.lock() {
            if let Some(event) = shared.indicator.observe(status) {
                shared.push(event);
            }
        }
    }

    /// Take the pending transition, if any
    pub fn take_pending(&self) -> Option<TrackingEvent> {
        match self.shared.lock() {
            Ok(mut shared) => shared.pending.take(),
            Err(_) => {
                warn!("Tracking bridge lock poisoned; dropping pending event");
                None
            }
        }
    }

    /// Deliver the pending transition to `listener`.
    ///
    /// Returns the number of events delivered (0 or 1).
    pub fn drain(&self, listener: &mut dyn TrackingListener) -> usize {
        // Lock released before dispatch so the listener can query the bridge
        match self.take_pending() {
            Some(event) => {
                event.dispatch(listener);
                1
            }
            None => 0,
        }
    }

    /// Whether a transition is waiting for the next tick
    pub fn has_pending(&self) -> bool {
        self.shared.lock().map(|s| s.pending.is_some()).unwrap_or(false)
    }

    /// State last reported by the edge detector
    pub fn state(&self) -> TrackingState {
        self.shared
            .lock()
            .map(|s| s.indicator.state())
            .unwrap_or_default()
    }

    pub fn is_tracked(&self) -> bool {
        self.state().is_tracked()
    }

    /// Transitions cancelled before delivery
    pub fn collapsed(&self) -> u64 {
        self.shared.lock().map(|s| s.collapsed).unwrap_or(0)
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }
}

impl Drop for TrackingBridge {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
        debug!("Unsubscribed from recognition source ({:?})", self.subscription);
    }
}
