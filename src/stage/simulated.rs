// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Simulated scene that records what the player asks of it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::media::{AssetRef, SimulatedAnimation};

use super::{CharacterId, SpawnedCharacter, Stage};

#[derive(Default)]
struct StageState {
    next_id: u64,
    live: HashMap<CharacterId, (AssetRef, SimulatedAnimation)>,
    max_live: usize,
    spawns: usize,
    visible: bool,
    background: Option<AssetRef>,
    last_spawned: Option<CharacterId>,
}

/// Recording stage; clones share state
#[derive(Clone, Default)]
pub struct SimulatedStage {
    state: Arc<Mutex<StageState>>,
}

impl SimulatedStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_characters(&self) -> usize {
        self.state.lock().map(|s| s.live.len()).unwrap_or(0)
    }

    /// Highest number of simultaneously live characters ever observed
    pub fn max_live_characters(&self) -> usize {
        self.state.lock().map(|s| s.max_live).unwrap_or(0)
    }

    pub fn spawn_count(&self) -> usize {
        self.state.lock().map(|s| s.spawns).unwrap_or(0)
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().map(|s| s.visible).unwrap_or(false)
    }

    pub fn background(&self) -> Option<AssetRef> {
        self.state.lock().ok().and_then(|s| s.background.clone())
    }

    /// Model of the live character, if any
    pub fn live_model(&self) -> Option<AssetRef> {
        let state = self.state.lock().ok()?;
        state.live.values().next().map(|(model, _)| model.clone())
    }

    /// Animator of the most recently spawned character, if still live
    pub fn current_animator(&self) -> Option<SimulatedAnimation> {
        let state = self.state.lock().ok()?;
        let id = state.last_spawned?;
        state.live.get(&id).map(|(_, anim)| anim.clone())
    }
}

impl Stage for SimulatedStage {
    fn spawn_character(&mut self, model: &AssetRef) -> Option<SpawnedCharacter> {
        let mut state = self.state.lock().ok()?;
        let id = CharacterId(state.next_id);
        state.next_id += 1;

        let animator = SimulatedAnimation::new();
        state.live.insert(id, (model.clone(), animator.clone()));
        state.spawns += 1;
        state.max_live = state.max_live.max(state.live.len());
        state.last_spawned = Some(id);

        Some(SpawnedCharacter {
            id,
            animator: Some(Box::new(animator)),
        })
    }

    fn despawn_character(&mut self, id: CharacterId) {
        if let Ok(mut state) = self.state.lock() {
            state.live.remove(&id);
        }
    }

    fn set_content_visible(&mut self, visible: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.visible = visible;
        }
    }

    fn set_background(&mut self, material: &AssetRef) {
        if let Ok(mut state) = self.state.lock() {
            state.background = Some(material.clone());
        }
    }
}
