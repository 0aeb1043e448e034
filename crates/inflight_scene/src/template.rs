//! Per-entity visual template.
//!
//! Every entity expands into the same small set of vertices: the template's
//! local offsets translated by the entity position, with the template color
//! modulated by the entity color.

use crate::error::{SceneError, SceneResult};
use crate::vertex::Vertex;

/// One vertex of the template, relative to the entity origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateVertex {
    /// Offset from the entity position, in pixels.
    pub offset: [f32; 2],
    /// RGBA multiplier applied to the entity color.
    pub color: [f32; 4],
}

impl TemplateVertex {
    /// Creates a template vertex.
    #[must_use]
    pub const fn new(offset: [f32; 2], color: [f32; 4]) -> Self {
        Self { offset, color }
    }

    fn is_finite(&self) -> bool {
        self.offset.iter().chain(self.color.iter()).all(|c| c.is_finite())
    }
}

/// Fixed set of local vertices drawn for every entity.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTemplate {
    vertices: Vec<TemplateVertex>,
}

impl VisualTemplate {
    /// White, so the entity color passes through unchanged.
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Creates a template from explicit vertices.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EmptyTemplate`] for an empty list and
    /// [`SceneError::NonFiniteTemplate`] if any component is NaN or infinite.
    pub fn new(vertices: Vec<TemplateVertex>) -> SceneResult<Self> {
        if vertices.is_empty() {
            return Err(SceneError::EmptyTemplate);
        }
        if let Some(bad) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteTemplate(bad));
        }
        Ok(Self { vertices })
    }

    /// Upward-pointing triangle of `size` pixels, white.
    #[must_use]
    pub fn triangle(size: f32) -> Self {
        let half = 0.5 * size;
        Self {
            vertices: vec![
                TemplateVertex::new([-half, -half], Self::WHITE),
                TemplateVertex::new([0.0, half], Self::WHITE),
                TemplateVertex::new([half, -half], Self::WHITE),
            ],
        }
    }

    /// Returns the number of vertices per entity.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the template vertices.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[TemplateVertex] {
        &self.vertices
    }

    /// Expands the template at `position` with `color`, in template order.
    #[inline]
    pub fn expand(
        &self,
        position: [f32; 2],
        color: [f32; 4],
    ) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices.iter().map(move |v| {
            Vertex::new(
                [position[0] + v.offset[0], position[1] + v.offset[1]],
                [
                    color[0] * v.color[0],
                    color[1] * v.color[1],
                    color[2] * v.color[2],
                    color[3] * v.color[3],
                ],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_template() {
        let template = VisualTemplate::triangle(64.0);
        assert_eq!(template.vertex_count(), 3);
        assert_eq!(template.vertices()[0].offset, [-32.0, -32.0]);
        assert_eq!(template.vertices()[1].offset, [0.0, 32.0]);
        assert_eq!(template.vertices()[2].offset, [32.0, -32.0]);
    }

    #[test]
    fn test_empty_template_rejected() {
        assert_eq!(VisualTemplate::new(vec![]), Err(SceneError::EmptyTemplate));
    }

    #[test]
    fn test_non_finite_template_rejected() {
        let result = VisualTemplate::new(vec![
            TemplateVertex::new([0.0, 0.0], VisualTemplate::WHITE),
            TemplateVertex::new([f32::NAN, 0.0], VisualTemplate::WHITE),
        ]);
        assert_eq!(result, Err(SceneError::NonFiniteTemplate(1)));
    }

    #[test]
    fn test_expand_translates_and_modulates() {
        let template = VisualTemplate::new(vec![TemplateVertex::new(
            [1.0, 2.0],
            [0.5, 1.0, 1.0, 1.0],
        )])
        .unwrap();

        let out: Vec<Vertex> = template.expand([10.0, 20.0], [1.0, 0.5, 0.0, 1.0]).collect();
        assert_eq!(out, vec![Vertex::new([11.0, 22.0], [0.5, 0.5, 0.0, 1.0])]);
    }
}
