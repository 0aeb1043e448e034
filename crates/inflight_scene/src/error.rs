//! # Scene Error Types

use thiserror::Error;

/// Errors that can occur while building or serializing a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The visual template has no vertices.
    #[error("visual template must contain at least one vertex")]
    EmptyTemplate,

    /// A template vertex has a non-finite offset or color.
    #[error("template vertex {0} is not finite")]
    NonFiniteTemplate(usize),

    /// The layout can never produce an entity.
    #[error("layout must allow at least one entity")]
    ZeroEntityCapacity,

    /// Horizontal spacing must be positive and keep the whole line finite.
    #[error("invalid horizontal spacing: {0}")]
    InvalidSpacing(f32),

    /// One frame's vertex stream would not fit in addressable memory.
    #[error("slot too large: {entities} entities of {vertices_per_entity} vertices")]
    SlotTooLarge {
        /// Layout capacity.
        entities: usize,
        /// Template vertex count.
        vertices_per_entity: usize,
    },

    /// The palette has no colors.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// The target region cannot hold the serialized scene.
    #[error("region too small: need {needed} bytes, have {available}")]
    RegionTooSmall {
        /// Bytes required for the current scene.
        needed: usize,
        /// Bytes in the region.
        available: usize,
    },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
