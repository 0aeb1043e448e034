//! Entity layout generation.
//!
//! Entities sit on a horizontal line centred on the origin:
//!
//! ```text
//!   x_i = (-count / 2 + i) * spacing,   y_i = 0
//! ```
//!
//! Colors cycle through a palette. Layout is a pure function of the surface
//! dimensions.

use crate::entity::SceneEntity;
use crate::error::{SceneError, SceneResult};

/// Colors cycled across entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<[f32; 4]>,
}

impl Palette {
    /// Creates a palette.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: Vec<[f32; 4]>) -> SceneResult<Self> {
        if colors.is_empty() {
            return Err(SceneError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Returns the color for entity `index`.
    #[inline]
    #[must_use]
    pub fn color(&self, index: usize) -> [f32; 4] {
        self.colors[index % self.colors.len()]
    }

    /// Returns the palette colors.
    #[must_use]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }
}

impl Default for Palette {
    /// Red, green, blue, magenta, cyan, yellow.
    fn default() -> Self {
        Self {
            colors: vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 0.0, 1.0, 1.0],
                [0.0, 1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0, 1.0],
            ],
        }
    }
}

/// How many entities to create for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityCount {
    /// Always the same number of entities.
    Fixed(usize),
    /// One entity per `spacing` pixels of width, capped at `max`.
    Density {
        /// Upper bound, fixes the slot size.
        max: usize,
    },
}

/// Horizontal line layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    count: EntityCount,
    spacing: f32,
    palette: Palette,
}

impl Layout {
    /// Horizontal spacing between entities, in pixels.
    pub const DEFAULT_SPACING: f32 = 16.0;

    /// `count` entities regardless of surface size.
    #[must_use]
    pub fn fixed(count: usize) -> Self {
        Self {
            count: EntityCount::Fixed(count),
            spacing: Self::DEFAULT_SPACING,
            palette: Palette::default(),
        }
    }

    /// As many entities as fit the surface width, at most `max`.
    #[must_use]
    pub fn density(max: usize) -> Self {
        Self {
            count: EntityCount::Density { max },
            spacing: Self::DEFAULT_SPACING,
            palette: Palette::default(),
        }
    }

    /// Sets the horizontal spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Checks that the layout can produce a scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ZeroEntityCapacity`] or
    /// [`SceneError::InvalidSpacing`]. Spacing must be a positive normal
    /// float and the full line, `capacity * spacing`, must stay finite.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> SceneResult<()> {
        if self.capacity() == 0 {
            return Err(SceneError::ZeroEntityCapacity);
        }
        let extent = self.capacity() as f32 * self.spacing;
        if !(self.spacing.is_normal() && self.spacing > 0.0 && extent.is_finite()) {
            return Err(SceneError::InvalidSpacing(self.spacing));
        }
        Ok(())
    }

    /// Maximum number of entities this layout can ever produce.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        match self.count {
            EntityCount::Fixed(count) => count,
            EntityCount::Density { max } => max,
        }
    }

    /// Returns the spacing in pixels.
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Number of entities for a surface of the given size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count_for(&self, width: u32, _height: u32) -> usize {
        match self.count {
            EntityCount::Fixed(count) => count,
            EntityCount::Density { max } => {
                // Float to int casts saturate; tiny spacings yield usize::MAX.
                let fitting = (f64::from(width) / f64::from(self.spacing)).floor() as usize;
                fitting.saturating_add(1).min(max)
            }
        }
    }

    /// Generates a fresh layout for a surface of the given size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn generate(&self, width: u32, height: u32) -> Vec<SceneEntity> {
        let count = self.count_for(width, height);
        let half = count as f32 / 2.0;

        (0..count)
            .map(|i| {
                let x = (-half + i as f32) * self.spacing;
                SceneEntity::new([x, 0.0], self.palette.color(i))
            })
            .collect()
    }
}
