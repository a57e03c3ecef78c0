// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Edge detector over raw recognition statuses.

use tracing::debug;

use super::{TargetStatus, TrackingEvent, TrackingState};

/// Emits one event per tracked/untracked transition and drops repeats
#[derive(Debug, Clone, Default)]
pub struct TrackIndicator {
    last: TrackingState,
    forwarded: u64,
    discarded: u64,
}

impl TrackIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw status, returning the transition it causes (if any)
    pub fn observe(&mut self, status: TargetStatus) -> Option<TrackingEvent> {
        let next = TrackingState::from_status(status);
        if next == self.last {
            self.discarded += 1;
            return None;
        }

        self.last = next;
        self.forwarded += 1;
        let event = if next.is_tracked() {
            TrackingEvent::Found
        } else {
            TrackingEvent::Lost
        };
        debug!("Target status {:?} -> {:?}", status, event);
        Some(event)
    }

    /// Last reported state
    pub fn state(&self) -> TrackingState {
        self.last
    }

    /// Transitions forwarded so far
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Redundant statuses dropped so far
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}
