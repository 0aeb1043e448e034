//! Scene entities and the per-frame scene state.

/// A drawable object: a 2D position and an RGBA color.
///
/// `origin` is where the layout placed the entity; `position` is where it
/// is displayed this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEntity {
    /// Layout position, fixed until the next regeneration.
    pub origin: [f32; 2],
    /// Displayed position for the current frame.
    pub position: [f32; 2],
    /// RGBA color.
    pub color: [f32; 4],
}

impl SceneEntity {
    /// Creates an entity displayed at its origin.
    #[must_use]
    pub const fn new(origin: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            origin,
            position: origin,
            color,
        }
    }
}

/// All entities plus the simulation clock that drives them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneState {
    entities: Vec<SceneEntity>,
    time: f32,
}

impl SceneState {
    /// Creates a state at time zero.
    #[must_use]
    pub fn new(entities: Vec<SceneEntity>) -> Self {
        Self { entities, time: 0.0 }
    }

    /// Returns the entities.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    /// Returns the entities mutably.
    #[inline]
    pub fn entities_mut(&mut self) -> &mut [SceneEntity] {
        &mut self.entities
    }

    /// Returns the number of entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if there is nothing to draw.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the simulation clock.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Rewinds or advances the clock without touching entities.
    ///
    /// Displayed positions are recomputed from the clock on the next update.
    #[inline]
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Replaces the entity set, keeping the clock.
    pub(crate) fn replace_entities(&mut self, entities: Vec<SceneEntity>) {
        self.entities = entities;
    }
}
