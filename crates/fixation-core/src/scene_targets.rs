//! Candidates derived from the characters present in a scene.
//!
//! Whenever the cast of a scene changes, the host rebuilds the full set with
//! [`scene_targets`] and swaps it into every registry. All generated keys
//! share the [`SCENE_PREFIX`] so the previous set can be dropped in one call.

use serde::{Deserialize, Serialize};
use validator::Validate;

use fixation_poi::{PoiTarget, PointOfInterest, TransformHandle};

/// Key prefix shared by every generated candidate.
pub const SCENE_PREFIX: &str = "scene:";

/// Body parts a scene character may expose as gaze targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// The face.
    Face,
    /// The left hand.
    LeftHand,
    /// The right hand.
    RightHand,
    /// Left side of the chest.
    LeftChest,
    /// Right side of the chest.
    RightChest,
    /// The pelvis.
    Pelvis,
}

impl BodyPart {
    /// Stable name used in candidate keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::LeftHand => "left_hand",
            Self::RightHand => "right_hand",
            Self::LeftChest => "left_chest",
            Self::RightChest => "right_chest",
            Self::Pelvis => "pelvis",
        }
    }
}

/// One character as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCharacter {
    /// Name used in candidate keys.
    pub name: String,
    /// Whether the character is shown at all.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the chest is uncovered.
    #[serde(default)]
    pub chest_visible: bool,
    /// Whether the pelvis is uncovered.
    #[serde(default)]
    pub pelvis_visible: bool,
    /// Transforms of the body parts that exist on this character.
    #[serde(default)]
    pub parts: Vec<(BodyPart, TransformHandle)>,
}

/// Weights and inclusion switches for generated candidates.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct SceneTargetConfig {
    /// Weight of faces.
    #[serde(default = "default_face_weight")]
    #[validate(range(min = 0.0))]
    pub face_weight: f32,

    /// Weight of each hand.
    #[serde(default = "default_hand_weight")]
    #[validate(range(min = 0.0))]
    pub hand_weight: f32,

    /// Weight of each side of the chest.
    #[serde(default = "default_chest_weight")]
    #[validate(range(min = 0.0))]
    pub chest_weight: f32,

    /// Weight of the pelvis.
    #[serde(default = "default_pelvis_weight")]
    #[validate(range(min = 0.0))]
    pub pelvis_weight: f32,

    /// Generate chest candidates when the chest is uncovered.
    #[serde(default)]
    pub include_chest: bool,

    /// Generate pelvis candidates when the pelvis is uncovered.
    #[serde(default)]
    pub include_pelvis: bool,
}

impl Default for SceneTargetConfig {
    fn default() -> Self {
        Self {
            face_weight: default_face_weight(),
            hand_weight: default_hand_weight(),
            chest_weight: default_chest_weight(),
            pelvis_weight: default_pelvis_weight(),
            include_chest: false,
            include_pelvis: false,
        }
    }
}

impl SceneTargetConfig {
    /// Weight for `part`, or `None` if the part is excluded for `character`.
    fn weight_for(&self, part: BodyPart, character: &SceneCharacter) -> Option<f32> {
        match part {
            BodyPart::Face => Some(self.face_weight),
            BodyPart::LeftHand | BodyPart::RightHand => Some(self.hand_weight),
            BodyPart::LeftChest | BodyPart::RightChest => {
                (self.include_chest && character.chest_visible).then_some(self.chest_weight)
            }
            BodyPart::Pelvis => {
                (self.include_pelvis && character.pelvis_visible).then_some(self.pelvis_weight)
            }
        }
    }
}

/// Build the candidate set for every visible character.
///
/// Keys have the form `scene:<character>:<part>`. Candidates are not
/// `always_present`; they compete through the view cone like anything else.
pub fn scene_targets(
    characters: &[SceneCharacter],
    config: &SceneTargetConfig,
) -> Vec<(String, PointOfInterest)> {
    characters
        .iter()
        .filter(|character| character.visible)
        .flat_map(|character| {
            character.parts.iter().filter_map(move |&(part, handle)| {
                let weight = config.weight_for(part, character)?;
                let key = format!("{SCENE_PREFIX}{}:{}", character.name, part.as_str());
                Some((key, PointOfInterest::new(PoiTarget::transform(handle), weight)))
            })
        })
        .collect()
}

/// Whether `key` is one of `character`'s own generated candidates.
///
/// A character never looks at its own body parts, so these keys are skipped
/// when scene targets are handed to it.
pub fn is_own_target(key: &str, character: &str) -> bool {
    key.strip_prefix(SCENE_PREFIX)
        .and_then(|rest| rest.strip_prefix(character))
        .is_some_and(|rest| rest.starts_with(':'))
}

const fn default_true() -> bool {
    true
}

const fn default_face_weight() -> f32 {
    2.0
}

const fn default_hand_weight() -> f32 {
    1.0
}

const fn default_chest_weight() -> f32 {
    1.0
}

const fn default_pelvis_weight() -> f32 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(name: &str) -> SceneCharacter {
        SceneCharacter {
            name: name.to_owned(),
            visible: true,
            chest_visible: true,
            pelvis_visible: false,
            parts: vec![
                (BodyPart::Face, TransformHandle(1)),
                (BodyPart::LeftHand, TransformHandle(2)),
                (BodyPart::RightHand, TransformHandle(3)),
                (BodyPart::LeftChest, TransformHandle(4)),
                (BodyPart::RightChest, TransformHandle(5)),
                (BodyPart::Pelvis, TransformHandle(6)),
            ],
        }
    }

    fn keys(targets: &[(String, PointOfInterest)]) -> Vec<&str> {
        targets.iter().map(|(key, _)| key.as_str()).collect()
    }

    #[test]
    fn defaults_cover_face_and_hands() {
        let targets = scene_targets(&[character("aoi")], &SceneTargetConfig::default());
        assert_eq!(
            keys(&targets),
            ["scene:aoi:face", "scene:aoi:left_hand", "scene:aoi:right_hand"]
        );
        let face = targets.first().map(|(_, poi)| *poi);
        assert!(face.is_some_and(|poi| (poi.weight - 2.0).abs() < f32::EPSILON));
        assert!(targets.iter().all(|(_, poi)| !poi.always_present));
    }

    #[test]
    fn inclusion_requires_flag_and_visibility() {
        let config = SceneTargetConfig {
            include_chest: true,
            include_pelvis: true,
            ..SceneTargetConfig::default()
        };
        let targets = scene_targets(&[character("aoi")], &config);
        let keys = keys(&targets);
        assert!(keys.contains(&"scene:aoi:left_chest"));
        assert!(keys.contains(&"scene:aoi:right_chest"));
        // The pelvis is covered.
        assert!(!keys.contains(&"scene:aoi:pelvis"));
    }

    #[test]
    fn hidden_characters_are_skipped() {
        let mut hidden = character("ren");
        hidden.visible = false;
        let targets = scene_targets(&[character("aoi"), hidden], &SceneTargetConfig::default());
        assert!(keys(&targets).iter().all(|key| key.starts_with("scene:aoi:")));
    }

    #[test]
    fn own_targets_match_whole_names_only() {
        assert!(is_own_target("scene:aoi:face", "aoi"));
        assert!(!is_own_target("scene:aoi:face", "ao"));
        assert!(!is_own_target("scene:aoiko:face", "aoi"));
        assert!(!is_own_target("target", "aoi"));
    }

    #[test]
    fn negative_weight_fails_validation() {
        let config = SceneTargetConfig {
            hand_weight: -1.0,
            ..SceneTargetConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
