// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! In-process playback backends.
//!
//! These stand in for the host engine's audio/video players in the demo
//! binary, the integration tests and the benchmarks. Playback only moves
//! when the owner calls [`StreamControl::advance`], so tests control time
//! exactly.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::PlayerError;

use super::{AnimationHandle, AssetRef, MediaSyncEngine, PlaybackHandle};

/// Shared state behind a simulated stream
#[derive(Debug, Clone)]
struct StreamState {
    clip: Option<AssetRef>,
    duration: f64,
    position: f64,
    volume: f64,
    playing: bool,
    looping: bool,
    /// Speed relative to wall time, used to provoke drift
    rate: f64,
    play_calls: u32,
    pause_calls: u32,
    seeks: u32,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            clip: None,
            duration: 0.0,
            position: 0.0,
            volume: 1.0,
            playing: false,
            looping: false,
            rate: 1.0,
            play_calls: 0,
            pause_calls: 0,
            seeks: 0,
        }
    }
}

/// Simulated audio or video player
pub struct SimulatedStream {
    state: Arc<Mutex<StreamState>>,
    library: Arc<HashMap<AssetRef, f64>>,
}

impl SimulatedStream {
    /// Create a stream that knows the durations of the given assets
    pub fn new(library: Arc<HashMap<AssetRef, f64>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StreamState::default())),
            library,
        }
    }

    /// Loop back to zero at the end of the clip (video players do this)
    pub fn looping(self, looping: bool) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.looping = looping;
        }
        self
    }

    /// Get a handle for driving and inspecting this stream
    pub fn control(&self) -> StreamControl {
        StreamControl {
            state: Arc::clone(&self.state),
        }
    }
}

impl PlaybackHandle for SimulatedStream {
    fn load(&mut self, asset: Option<&AssetRef>) -> Result<bool, PlayerError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PlayerError::Backend("stream lock poisoned".to_string()))?;

        state.playing = false;
        state.position = 0.0;

        match asset {
            None => {
                state.clip = None;
                state.duration = 0.0;
                Ok(false)
            }
            Some(asset) => {
                let duration = *self
                    .library
                    .get(asset)
                    .ok_or_else(|| PlayerError::Backend(format!("unknown asset: {}", asset)))?;
                state.clip = Some(asset.clone());
                state.duration = duration;
                Ok(true)
            }
        }
    }

    fn play(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.play_calls += 1;
            if state.clip.is_some() {
                state.playing = true;
            }
        }
    }

    fn pause(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.pause_calls += 1;
            state.playing = false;
        }
    }

    fn stop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.playing = false;
            state.position = 0.0;
        }
    }

    fn position(&self) -> f64 {
        self.state.lock().map(|s| s.position).unwrap_or(0.0)
    }

    fn set_position(&mut self, seconds: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.seeks += 1;
            state.position = seconds.clamp(0.0, state.duration);
        }
    }

    fn duration(&self) -> f64 {
        self.state.lock().map(|s| s.duration).unwrap_or(0.0)
    }

    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    fn set_volume(&mut self, volume: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.volume = volume.clamp(0.0, 1.0);
        }
    }
}

/// Driving/inspection handle for a [`SimulatedStream`]
#[derive(Clone)]
pub struct StreamControl {
    state: Arc<Mutex<StreamState>>,
}

impl StreamControl {
    /// Advance the playhead by `dt` seconds of wall time
    pub fn advance(&self, dt: f64) {
        if let Ok(mut state) = self.state.lock() {
            if !state.playing || state.clip.is_none() {
                return;
            }
            let next = state.position + dt * state.rate;
            if next >= state.duration {
                if state.looping && state.duration > 0.0 {
                    state.position = next % state.duration;
                } else {
                    state.position = state.duration;
                    state.playing = false;
                }
            } else {
                state.position = next;
            }
        }
    }

    /// Set the playback rate, e.g. 1.05 for a stream that runs fast
    pub fn set_rate(&self, rate: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.rate = rate;
        }
    }

    /// Move the playhead without counting it as a seek
    pub fn nudge_to(&self, seconds: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.position = seconds.clamp(0.0, state.duration);
        }
    }

    pub fn position(&self) -> f64 {
        self.state.lock().map(|s| s.position).unwrap_or(0.0)
    }

    pub fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().map(|s| s.playing).unwrap_or(false)
    }

    pub fn clip(&self) -> Option<AssetRef> {
        self.state.lock().ok().and_then(|s| s.clip.clone())
    }

    pub fn play_calls(&self) -> u32 {
        self.state.lock().map(|s| s.play_calls).unwrap_or(0)
    }

    pub fn pause_calls(&self) -> u32 {
        self.state.lock().map(|s| s.pause_calls).unwrap_or(0)
    }

    pub fn seeks(&self) -> u32 {
        self.state.lock().map(|s| s.seeks).unwrap_or(0)
    }
}

/// Three simulated streams sharing one asset library, plus their controls
pub struct SimulatedMedia {
    pub vocal: StreamControl,
    pub accompaniment: StreamControl,
    pub video: StreamControl,
}

impl SimulatedMedia {
    /// Build a sync engine over simulated streams
    pub fn engine(library: Arc<HashMap<AssetRef, f64>>) -> (MediaSyncEngine, Self) {
        let vocal = SimulatedStream::new(Arc::clone(&library));
        let accompaniment = SimulatedStream::new(Arc::clone(&library));
        let video = SimulatedStream::new(library);
        let media = Self {
            vocal: vocal.control(),
            accompaniment: accompaniment.control(),
            video: video.control(),
        };
        let engine =
            MediaSyncEngine::new(Box::new(vocal), Box::new(accompaniment), Box::new(video));
        (engine, media)
    }

    /// Advance every stream by `dt` seconds
    pub fn advance(&self, dt: f64) {
        for control in self.controls() {
            control.advance(dt);
        }
    }

    pub fn controls(&self) -> [&StreamControl; 3] {
        [&self.vocal, &self.accompaniment, &self.video]
    }
}

/// Recorded animator state
#[derive(Debug, Clone, Default)]
struct AnimatorState {
    speed: f64,
    current_clip: Option<String>,
    bools: HashSet<String>,
}

/// Simulated character animator
#[derive(Clone, Default)]
pub struct SimulatedAnimation {
    state: Arc<Mutex<AnimatorState>>,
}

impl SimulatedAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(&self) -> f64 {
        self.state.lock().map(|s| s.speed).unwrap_or(0.0)
    }

    pub fn current_clip(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.current_clip.clone())
    }

    pub fn get_bool(&self, parameter: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.bools.contains(parameter))
            .unwrap_or(false)
    }
}

impl AnimationHandle for SimulatedAnimation {
    fn play(&mut self, clip: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.current_clip = Some(clip.to_string());
        }
    }

    fn set_speed(&mut self, speed: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.speed = speed;
        }
    }

    fn set_bool(&mut self, parameter: &str, value: bool) {
        if let Ok(mut state) = self.state.lock() {
            if value {
                state.bools.insert(parameter.to_string());
            } else {
                state.bools.remove(parameter);
            }
        }
    }
}
