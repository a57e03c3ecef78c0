// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Simulated recognition engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{RecognitionSource, StatusCallback, SubscriptionId, TargetStatus};

#[derive(Default)]
struct Subscribers {
    callbacks: HashMap<u64, Arc<StatusCallback>>,
}

/// A recognition source driven by hand or by a scripted camera
#[derive(Clone, Default)]
pub struct SimulatedCamera {
    subscribers: Arc<Mutex<Subscribers>>,
    next_id: Arc<AtomicU64>,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a status to every subscriber
    pub fn emit(&self, status: TargetStatus) {
        // Snapshot so callbacks run without holding the lock
        let callbacks: Vec<Arc<StatusCallback>> = match self.subscribers.lock() {
            Ok(subs) => subs.callbacks.values().cloned().collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            (callback.as_ref())(status);
        }
    }

    /// Emit the statuses a real engine produces while the marker is held
    /// in view: mostly `Tracked`, with the odd `ExtendedTracked` frame.
    /// Every status is on the tracked side, so no transition is implied.
    pub fn emit_jitter(&self, frames: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..frames {
            let status = if rng.gen_bool(0.8) {
                TargetStatus::Tracked
            } else {
                TargetStatus::ExtendedTracked
            };
            self.emit(status);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.callbacks.len()).unwrap_or(0)
    }
}

impl RecognitionSource for SimulatedCamera {
    fn subscribe(&self, callback: StatusCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.callbacks.insert(id, Arc::new(callback));
        }
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.callbacks.remove(&id.0);
        }
    }
}
