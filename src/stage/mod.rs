// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Visual content anchored to the marker.
//!
//! The host scene owns the actual objects; this module only decides when
//! to spawn, despawn, show and hide them. At most one character instance
//! is alive at any time.

pub mod simulated;

pub use simulated::SimulatedStage;

use tracing::{debug, warn};

use crate::media::{AnimationHandle, AssetRef};

/// Host-side identifier of a spawned character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterId(pub u64);

/// Result of spawning a character model
pub struct SpawnedCharacter {
    pub id: CharacterId,
    /// Animator on the spawned model, if it has one
    pub animator: Option<Box<dyn AnimationHandle>>,
}

/// The host scene
pub trait Stage: Send {
    /// Instantiate a character model at the spawn point
    fn spawn_character(&mut self, model: &AssetRef) -> Option<SpawnedCharacter>;

    fn despawn_character(&mut self, id: CharacterId);

    /// Show or hide everything anchored to the marker
    fn set_content_visible(&mut self, visible: bool);

    /// Apply a material to the video surface
    fn set_background(&mut self, material: &AssetRef);
}

/// The character currently on stage
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCharacterInstance {
    pub id: CharacterId,
    pub model: AssetRef,
}

/// Holder that guarantees a single live character
#[derive(Debug, Default)]
pub struct CharacterSlot {
    active: Option<ActiveCharacterInstance>,
}

impl CharacterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Despawn the current character (if any), then spawn `model`.
    ///
    /// Returns the new character's animator.
    pub fn replace(
        &mut self,
        stage: &mut dyn Stage,
        model: Option<&AssetRef>,
    ) -> Option<Box<dyn AnimationHandle>> {
        self.clear(stage);

        let model = model?;
        match stage.spawn_character(model) {
            Some(spawned) => {
                debug!("Spawned character {} as {:?}", model, spawned.id);
                self.active = Some(ActiveCharacterInstance {
                    id: spawned.id,
                    model: model.clone(),
                });
                if spawned.animator.is_none() {
                    warn!("Character {} has no animator", model);
                }
                spawned.animator
            }
            None => {
                warn!("Failed to spawn character {}", model);
                None
            }
        }
    }

    /// Despawn the current character
    pub fn clear(&mut self, stage: &mut dyn Stage) {
        if let Some(instance) = self.active.take() {
            stage.despawn_character(instance.id);
            debug!("Despawned character {:?}", instance.id);
        }
    }

    pub fn active(&self) -> Option<&ActiveCharacterInstance> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_single_instance() {
        let mut stage = SimulatedStage::new();
        let control = stage.clone();
        let mut slot = CharacterSlot::new();

        let model_a = AssetRef::new("dancer_a");
        let model_b = AssetRef::new("dancer_b");

        assert!(slot.replace(&mut stage, Some(&model_a)).is_some());
        assert_eq!(control.live_characters(), 1);

        assert!(slot.replace(&mut stage, Some(&model_b)).is_some());
        assert_eq!(control.live_characters(), 1);
        assert_eq!(control.max_live_characters(), 1);
        assert_eq!(slot.active().map(|c| c.model.clone()), Some(model_b));
        assert_eq!(control.spawn_count(), 2);
    }

    #[test]
    fn test_replace_with_none_clears() {
        let mut stage = SimulatedStage::new();
        let control = stage.clone();
        let mut slot = CharacterSlot::new();

        slot.replace(&mut stage, Some(&AssetRef::new("dancer")));
        assert!(slot.replace(&mut stage, None).is_none());
        assert!(slot.active().is_none());
        assert_eq!(control.live_characters(), 0);
    }

    #[test]
    fn test_clear_without_character() {
        let mut stage = SimulatedStage::new();
        let mut slot = CharacterSlot::new();
        slot.clear(&mut stage);
        assert!(slot.active().is_none());
    }
}
