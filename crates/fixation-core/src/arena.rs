//! Explicit ownership of every character's gaze state.
//!
//! The arena maps [`CharacterId`] to [`CharacterGaze`]. Characters are
//! created and destroyed explicitly when the host loads or unloads them; the
//! arena owns the shared [`SmallRng`] seeded from `world.seed`, so a run is
//! reproducible given the same sequence of calls.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use fixation_eye::EyeError;
use fixation_poi::{BasePose, PoiError, PointOfInterest, SceneQuery, TransformHandle};

use crate::character::{CharacterGaze, GazeFrame};
use crate::config::{ConfigError, FixationConfig};
use crate::ids::CharacterId;
use crate::scene_targets::{SCENE_PREFIX, is_own_target};

/// Errors from building or addressing characters.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// No character with this ID exists.
    #[error("unknown character {id}")]
    UnknownCharacter {
        /// The missing ID.
        id: CharacterId,
    },

    /// The eye simulator rejected its configuration.
    #[error("eye movement: {source}")]
    Eye {
        /// The underlying eye error.
        #[from]
        source: EyeError,
    },

    /// The registry rejected its configuration or a candidate.
    #[error("point of interest: {source}")]
    Poi {
        /// The underlying selection error.
        #[from]
        source: PoiError,
    },
}

/// All characters in a scene.
#[derive(Debug)]
pub struct GazeArena {
    config: FixationConfig,
    rng: SmallRng,
    characters: BTreeMap<CharacterId, CharacterGaze>,
    scene_targets: Vec<(String, PointOfInterest)>,
}

impl GazeArena {
    /// Create an empty arena from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(config: FixationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SmallRng::seed_from_u64(config.world.seed);
        Ok(Self {
            config,
            rng,
            characters: BTreeMap::new(),
            scene_targets: Vec::new(),
        })
    }

    /// The arena's configuration.
    pub const fn config(&self) -> &FixationConfig {
        &self.config
    }

    /// Create a character. It starts with the current scene targets, minus
    /// its own body parts.
    pub fn create(&mut self, name: &str, base: BasePose) -> Result<CharacterId, ArenaError> {
        let mut gaze = CharacterGaze::new(name, base, &self.config, &mut self.rng)?;
        for (key, poi) in self
            .scene_targets
            .iter()
            .filter(|(key, _)| !is_own_target(key, name))
        {
            gaze.poi_mut().add_or_replace(key.clone(), *poi)?;
        }
        let id = CharacterId::new();
        self.characters.insert(id, gaze);
        info!(character_id = %id, name, "Character created");
        Ok(id)
    }

    /// Remove a character and return its state.
    pub fn destroy(&mut self, id: CharacterId) -> Result<CharacterGaze, ArenaError> {
        let gaze = self
            .characters
            .remove(&id)
            .ok_or(ArenaError::UnknownCharacter { id })?;
        info!(character_id = %id, name = gaze.name(), "Character destroyed");
        Ok(gaze)
    }

    /// Look up a character.
    pub fn get(&self, id: CharacterId) -> Option<&CharacterGaze> {
        self.characters.get(&id)
    }

    /// Look up a character mutably.
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut CharacterGaze> {
        self.characters.get_mut(&id)
    }

    /// Every character, in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &CharacterGaze)> {
        self.characters.iter().map(|(&id, gaze)| (id, gaze))
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the arena has no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Move a character's head.
    pub fn set_base(&mut self, id: CharacterId, base: BasePose) -> Result<(), ArenaError> {
        self.character_mut(id)?.set_base(base);
        Ok(())
    }

    /// Point a character's main target at a transform.
    pub fn look_at_transform(
        &mut self,
        id: CharacterId,
        handle: TransformHandle,
    ) -> Result<(), ArenaError> {
        self.character_mut(id)?.look_at_transform(handle)
    }

    /// Point a character's main target at the camera.
    pub fn look_at_camera(&mut self, id: CharacterId) -> Result<(), ArenaError> {
        self.character_mut(id)?.look_at_camera()
    }

    /// Drop a character's main target.
    pub fn clear_main_target<S>(&mut self, id: CharacterId, scene: &S) -> Result<(), ArenaError>
    where
        S: SceneQuery + ?Sized,
    {
        let gaze = self
            .characters
            .get_mut(&id)
            .ok_or(ArenaError::UnknownCharacter { id })?;
        gaze.clear_main_target(scene, &mut self.rng);
        Ok(())
    }

    /// Replace the scene-generated candidates of every character.
    ///
    /// Each registry first drops everything under [`SCENE_PREFIX`] (which
    /// reselects immediately if the current target was one of them), then
    /// receives the new set minus its own body parts. Characters created
    /// later start with it too.
    ///
    /// Every weight is checked first; an invalid set changes nothing.
    pub fn replace_scene_targets<S>(
        &mut self,
        targets: Vec<(String, PointOfInterest)>,
        scene: &S,
    ) -> Result<(), ArenaError>
    where
        S: SceneQuery + ?Sized,
    {
        for (key, poi) in &targets {
            poi.check(key)?;
        }
        for gaze in self.characters.values_mut() {
            let base = *gaze.base();
            gaze.poi_mut()
                .remove_by_prefix(SCENE_PREFIX, &base, scene, &mut self.rng);
            for (key, poi) in &targets {
                if !is_own_target(key, gaze.name()) {
                    gaze.poi_mut().add_or_replace(key.clone(), *poi)?;
                }
            }
        }
        debug!(
            targets = targets.len(),
            characters = self.characters.len(),
            "Scene targets replaced"
        );
        self.scene_targets = targets;
        Ok(())
    }

    /// Tick every character once.
    pub fn tick_all<S>(&mut self, delta_time: f32, scene: &S) -> Vec<(CharacterId, GazeFrame)>
    where
        S: SceneQuery + ?Sized,
    {
        self.characters
            .iter_mut()
            .map(|(&id, gaze)| (id, gaze.tick(delta_time, false, scene, &mut self.rng)))
            .collect()
    }

    fn character_mut(&mut self, id: CharacterId) -> Result<&mut CharacterGaze, ArenaError> {
        self.characters
            .get_mut(&id)
            .ok_or(ArenaError::UnknownCharacter { id })
    }
}
