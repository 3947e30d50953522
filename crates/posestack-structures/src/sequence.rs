// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named, ordered collections of frames and their crop configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StagingError, StagingResult};
use crate::frame::Frame;

/// Physical side lengths of the crop volume, in depth units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 3]", into = "[f32; 3]")]
pub struct Cube([f32; 3]);

impl Cube {
    /// # Errors
    /// Returns [`StagingError::InvalidCube`] unless every side is finite and positive.
    pub fn new(sides: [f32; 3]) -> StagingResult<Cube> {
        if sides.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(StagingError::InvalidCube {
                cube: sides,
                reason: "every side must be finite and greater than zero".into(),
            });
        }
        Ok(Cube(sides))
    }

    pub fn sides(&self) -> [f32; 3] {
        self.0
    }

    /// Side length along the depth axis.
    pub fn depth(&self) -> f32 {
        self.0[2]
    }

    /// Half the depth side, the scale used for labels and symmetric depth.
    pub fn half_depth(&self) -> f32 {
        self.0[2] / 2.0
    }
}

impl TryFrom<[f32; 3]> for Cube {
    type Error = StagingError;

    fn try_from(sides: [f32; 3]) -> Result<Self, Self::Error> {
        Cube::new(sides)
    }
}

impl From<Cube> for [f32; 3] {
    fn from(cube: Cube) -> Self {
        cube.0
    }
}

/// Per-sequence configuration mapping.
///
/// Only `cube` is interpreted by the stack builder. Any other keys the
/// producer attaches are kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub cube: Cube,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SequenceConfig {
    pub fn new(cube: Cube) -> SequenceConfig {
        SequenceConfig {
            cube,
            extra: Map::new(),
        }
    }
}

/// A named sequence of frames.
///
/// Frame 0 is authoritative for the shape of every stack derived from the
/// sequence. An empty frame list is allowed here and rejected at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    name: String,
    frames: Vec<Frame>,
    config: SequenceConfig,
}

impl Sequence {
    pub fn new(name: impl Into<String>, frames: Vec<Frame>, config: SequenceConfig) -> Sequence {
        Sequence {
            name: name.into(),
            frames,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn cube(&self) -> Cube {
        self.config.cube
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cube_rejects_non_positive_sides() {
        assert!(Cube::new([200.0, 200.0, 0.0]).is_err());
        assert!(Cube::new([-1.0, 200.0, 200.0]).is_err());
        assert!(Cube::new([200.0, f32::INFINITY, 200.0]).is_err());
    }

    #[test]
    fn test_cube_half_depth() {
        let cube = Cube::new([250.0, 250.0, 300.0]).unwrap();
        assert_eq!(cube.depth(), 300.0);
        assert_eq!(cube.half_depth(), 150.0);
    }

    #[test]
    fn test_config_keeps_extra_keys() {
        let config: SequenceConfig =
            serde_json::from_value(json!({"cube": [200.0, 200.0, 200.0], "subject": "s01"})).unwrap();
        assert_eq!(config.cube.sides(), [200.0, 200.0, 200.0]);
        assert_eq!(config.extra.get("subject"), Some(&json!("s01")));
    }

    #[test]
    fn test_config_rejects_invalid_cube() {
        let result: Result<SequenceConfig, _> =
            serde_json::from_value(json!({"cube": [200.0, 200.0, -5.0]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sequence() {
        let seq = Sequence::new("empty", Vec::new(), SequenceConfig::new(Cube::new([1.0; 3]).unwrap()));
        assert!(seq.is_empty());
        assert_eq!(seq.name(), "empty");
    }
}
