//! # Frame Updater
//!
//! Advances the scene one step and writes it into a slot region.
//!
//! ```text
//!   update(state, dt)          serialize(state, region)
//!   ─────────────────          ────────────────────────
//!   time += dt                 for entity in entities:
//!   for entity:                    for v in template:
//!     position =                       region ← v.offset + position,
//!       animator(origin, time)                 v.color * color
//!                              zero the unused tail
//! ```

use crate::animate::Animator;
use crate::entity::SceneState;
use crate::error::{SceneError, SceneResult};
use crate::layout::Layout;
use crate::template::VisualTemplate;
use crate::vertex::Vertex;

/// Produces one frame's worth of vertices.
pub struct FrameUpdater {
    template: VisualTemplate,
    layout: Layout,
    animator: Box<dyn Animator>,
    /// Bytes of the largest possible frame, checked at construction.
    region_size: usize,
}

impl FrameUpdater {
    /// Creates an updater.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot produce entities, or
    /// [`SceneError::SlotTooLarge`] if its largest frame exceeds `isize::MAX`
    /// bytes.
    pub fn new(
        template: VisualTemplate,
        layout: Layout,
        animator: Box<dyn Animator>,
    ) -> SceneResult<Self> {
        layout.validate()?;

        let entities = layout.capacity();
        let vertices_per_entity = template.vertex_count();
        let region_size = entities
            .checked_mul(vertices_per_entity)
            .and_then(|vertices| vertices.checked_mul(Vertex::SIZE))
            .filter(|&bytes| isize::try_from(bytes).is_ok())
            .ok_or(SceneError::SlotTooLarge {
                entities,
                vertices_per_entity,
            })?;

        Ok(Self {
            template,
            layout,
            animator,
            region_size,
        })
    }

    /// Returns the visual template.
    #[must_use]
    pub fn template(&self) -> &VisualTemplate {
        &self.template
    }

    /// Returns the layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Largest vertex count any frame can produce.
    #[must_use]
    pub fn max_vertex_count(&self) -> usize {
        self.region_size / Vertex::SIZE
    }

    /// Region size every slot must provide, in bytes.
    #[must_use]
    pub fn region_size(&self) -> usize {
        self.region_size
    }

    /// Vertex count for the given state.
    #[must_use]
    pub fn vertex_count(&self, state: &SceneState) -> usize {
        state.len() * self.template.vertex_count()
    }

    /// Builds a scene for a surface of the given size, at time zero.
    #[must_use]
    pub fn generate(&self, width: u32, height: u32) -> SceneState {
        SceneState::new(self.layout.generate(width, height))
    }

    /// Replaces every entity with a fresh layout for the new surface size.
    ///
    /// The simulation clock is kept, so the motion continues where it was.
    pub fn regenerate(&self, state: &mut SceneState, width: u32, height: u32) {
        state.replace_entities(self.layout.generate(width, height));
        tracing::debug!(width, height, entities = state.len(), "scene regenerated");
    }

    /// Advances the clock by `dt` and recomputes displayed positions.
    pub fn update(&self, state: &mut SceneState, dt: f32) {
        let time = state.time() + dt;
        state.set_time(time);
        for entity in state.entities_mut() {
            entity.position = self.animator.displace(entity.origin, time);
        }
    }

    /// Writes the scene into `region` as a flat vertex stream.
    ///
    /// Returns the number of vertices written. Bytes after the last vertex
    /// are zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::RegionTooSmall`] if the stream does not fit.
    pub fn serialize(&self, state: &SceneState, region: &mut [u8]) -> SceneResult<usize> {
        let count = self.vertex_count(state);
        let needed = count * Vertex::SIZE;
        if needed > region.len() {
            return Err(SceneError::RegionTooSmall {
                needed,
                available: region.len(),
            });
        }

        let (stream, tail) = region.split_at_mut(needed);
        let vertices = state
            .entities()
            .iter()
            .flat_map(|entity| self.template.expand(entity.position, entity.color));

        for (chunk, vertex) in stream.chunks_exact_mut(Vertex::SIZE).zip(vertices) {
            chunk.copy_from_slice(bytemuck::bytes_of(&vertex));
        }
        tail.fill(0);

        Ok(count)
    }
}

impl std::fmt::Debug for FrameUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameUpdater")
            .field("template_vertices", &self.template.vertex_count())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
