//! The core crate for posestack. Defines the frame, sequence and stack types
//! shared by the staging engine and its configuration.

mod error;
pub mod frame;
pub mod sequence;
pub mod stack;

pub use error::{StagingError, StagingResult};
pub use frame::Frame;
pub use sequence::{Cube, Sequence, SequenceConfig};
pub use stack::{CachePolicy, NormalizationMode, StackModality, StackPair};
