// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Marker tracking.
//!
//! This module provides:
//! - The edge detector that turns raw recognition statuses into
//!   `Found`/`Lost` transitions
//! - The bridge that carries those transitions from the recognition
//!   engine's callback context to the frame loop
//! - A simulated camera for demos and tests

pub mod bridge;
pub mod indicator;
pub mod simulated;

pub use bridge::{RecognitionSource, StatusCallback, SubscriptionId, TrackingBridge};
pub use indicator::TrackIndicator;
pub use simulated::SimulatedCamera;

/// Raw status reported by the recognition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// Target not detected
    NoPose,
    /// Detected with too little quality to be used
    Limited,
    /// Detected and tracked
    Tracked,
    /// Out of view but still predicted by the engine
    ExtendedTracked,
}

impl TargetStatus {
    /// Whether this status counts as the marker being visible
    pub fn is_tracked(self) -> bool {
        matches!(self, TargetStatus::Tracked | TargetStatus::ExtendedTracked)
    }
}

/// Binary tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    NotTracked,
    Tracked,
}

impl TrackingState {
    pub fn from_status(status: TargetStatus) -> Self {
        if status.is_tracked() {
            TrackingState::Tracked
        } else {
            TrackingState::NotTracked
        }
    }

    pub fn is_tracked(self) -> bool {
        self == TrackingState::Tracked
    }
}

/// A tracking transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingEvent {
    Found,
    Lost,
}

impl TrackingEvent {
    /// Deliver this event to a listener
    pub fn dispatch(self, listener: &mut dyn TrackingListener) {
        match self {
            TrackingEvent::Found => listener.on_found(),
            TrackingEvent::Lost => listener.on_lost(),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            TrackingEvent::Found => TrackingEvent::Lost,
            TrackingEvent::Lost => TrackingEvent::Found,
        }
    }
}

/// Receiver of tracking transitions
pub trait TrackingListener {
    fn on_found(&mut self);
    fn on_lost(&mut self);
}
