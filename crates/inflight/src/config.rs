//! # Configuration
//!
//! Everything is supplied at construction; nothing is reconfigured while
//! frames are in flight. Loaded from TOML:
//!
//! ```toml
//! frames_in_flight = 3
//! pixel_format = "bgra8_unorm"
//! clear_color = [0.35, 0.35, 0.35, 1.0]
//! simulation_step = 0.05
//! surface = [800, 600]
//!
//! [layout]
//! mode = "density"
//! max_entities = 4096
//! spacing = 16.0
//!
//! [template]
//! kind = "triangle"
//! size = 64.0
//!
//! [wave]
//! magnitude = 128.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use inflight_scene::{
    FrameUpdater, Layout, Palette, TemplateVertex, VisualTemplate, WaveAnimator,
};

use crate::error::{ConfigError, InflightResult};

/// Output pixel format of the presented surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit BGRA, normalized. The only supported format.
    Bgra8Unorm,
    /// 8-bit RGBA, normalized.
    Rgba8Unorm,
    /// 16-bit float RGBA.
    Rgba16Float,
}

/// Entity layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// Same number of entities for every surface size.
    Fixed {
        /// Entity count.
        count: usize,
        /// Horizontal spacing in pixels.
        #[serde(default = "default_spacing")]
        spacing: f32,
    },
    /// Entity count follows the surface width.
    Density {
        /// Upper bound on entities; fixes the slot size.
        max_entities: usize,
        /// Horizontal spacing in pixels.
        #[serde(default = "default_spacing")]
        spacing: f32,
    },
}

fn default_spacing() -> f32 {
    Layout::DEFAULT_SPACING
}

/// One vertex of a custom template.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateVertexConfig {
    /// Offset from the entity position.
    pub offset: [f32; 2],
    /// Color multiplier.
    #[serde(default = "white")]
    pub color: [f32; 4],
}

fn white() -> [f32; 4] {
    VisualTemplate::WHITE
}

/// Per-entity visual template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateConfig {
    /// White triangle of `size` pixels.
    Triangle {
        /// Edge size in pixels.
        size: f32,
    },
    /// Explicit vertices.
    Custom {
        /// Local vertices in draw order.
        #[serde(default)]
        vertices: Vec<TemplateVertexConfig>,
    },
}

/// Wave motion parameters. The phase advances by `simulation_step` per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Peak vertical displacement in pixels.
    pub magnitude: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            magnitude: WaveAnimator::DEFAULT_MAGNITUDE,
        }
    }
}

/// Complete configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflightConfig {
    /// Maximum frames owned by the consumer at once (pool depth N).
    pub frames_in_flight: usize,
    /// Output format.
    pub pixel_format: PixelFormat,
    /// Color the consumer clears to before drawing.
    pub clear_color: [f32; 4],
    /// Simulation time advanced per frame.
    pub simulation_step: f32,
    /// Initial surface size in pixels.
    pub surface: [u32; 2],
    /// Entity layout.
    pub layout: LayoutConfig,
    /// Per-entity template.
    pub template: TemplateConfig,
    /// Colors cycled across entities; empty means the default palette.
    pub palette: Vec<[f32; 4]>,
    /// Wave motion.
    pub wave: WaveConfig,
}

impl Default for InflightConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 3,
            pixel_format: PixelFormat::Bgra8Unorm,
            clear_color: [0.35, 0.35, 0.35, 1.0],
            simulation_step: 0.05,
            surface: [800, 600],
            layout: LayoutConfig::Density {
                max_entities: 4096,
                spacing: Layout::DEFAULT_SPACING,
            },
            template: TemplateConfig::Triangle { size: 64.0 },
            palette: Vec::new(),
            wave: WaveConfig::default(),
        }
    }
}

impl InflightConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] on malformed input.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks values that parsing alone cannot reject.
    ///
    /// Pool depth and layout capacity are checked by the components that
    /// own them.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_format != PixelFormat::Bgra8Unorm {
            return Err(ConfigError::UnsupportedPixelFormat(self.pixel_format));
        }
        if !self.simulation_step.is_finite() {
            return Err(ConfigError::InvalidStep(self.simulation_step));
        }
        let magnitude = self.wave.magnitude;
        if !(magnitude.is_finite() && magnitude > 0.0) {
            return Err(ConfigError::InvalidMagnitude(magnitude));
        }
        match &self.template {
            TemplateConfig::Triangle { size } if !(size.is_finite() && *size > 0.0) => {
                Err(ConfigError::InvalidTemplateSize(*size))
            }
            TemplateConfig::Custom { vertices } if vertices.is_empty() => {
                Err(ConfigError::MissingTemplate)
            }
            _ => Ok(()),
        }
    }

    /// Builds the frame updater described by this config.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the scene parameters are
    /// rejected.
    pub fn build_updater(&self) -> InflightResult<FrameUpdater> {
        self.validate()?;

        let template = match &self.template {
            TemplateConfig::Triangle { size } => VisualTemplate::triangle(*size),
            TemplateConfig::Custom { vertices } => VisualTemplate::new(
                vertices
                    .iter()
                    .map(|v| TemplateVertex::new(v.offset, v.color))
                    .collect(),
            )?,
        };

        let layout = match self.layout {
            LayoutConfig::Fixed { count, spacing } => Layout::fixed(count).with_spacing(spacing),
            LayoutConfig::Density {
                max_entities,
                spacing,
            } => Layout::density(max_entities).with_spacing(spacing),
        };
        let layout = if self.palette.is_empty() {
            layout
        } else {
            layout.with_palette(Palette::new(self.palette.clone())?)
        };

        let animator = WaveAnimator::new(self.wave.magnitude);
        Ok(FrameUpdater::new(template, layout, Box::new(animator))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InflightError;
    use inflight_scene::SceneError;

    #[test]
    fn test_defaults_valid() {
        let config = InflightConfig::default();
        assert!(config.validate().is_ok());

        let updater = config.build_updater().unwrap();
        assert_eq!(updater.template().vertex_count(), 3);
        assert_eq!(updater.max_vertex_count(), 4096 * 3);
    }

    #[test]
    fn test_parse_full_document() {
        let config = InflightConfig::from_toml_str(
            r#"
            frames_in_flight = 2
            simulation_step = 0.1
            surface = [1280, 720]
            palette = [[1.0, 1.0, 1.0, 1.0]]

            [layout]
            mode = "fixed"
            count = 5

            [template]
            kind = "custom"
            vertices = [
                { offset = [0.0, 0.0] },
                { offset = [4.0, 0.0], color = [1.0, 0.0, 0.0, 1.0] },
            ]

            [wave]
            magnitude = 32.0
            "#,
        )
        .unwrap();

        assert_eq!(config.frames_in_flight, 2);
        assert_eq!(config.surface, [1280, 720]);
        assert_eq!(config.layout, LayoutConfig::Fixed { count: 5, spacing: 16.0 });
        assert_eq!(config.pixel_format, PixelFormat::Bgra8Unorm);

        let updater = config.build_updater().unwrap();
        assert_eq!(updater.max_vertex_count(), 10);
    }

    #[test]
    fn test_unsupported_pixel_format() {
        let config = InflightConfig::from_toml_str(r#"pixel_format = "rgba16_float""#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedPixelFormat(PixelFormat::Rgba16Float))
        );
    }

    #[test]
    fn test_missing_template() {
        let config = InflightConfig::from_toml_str(
            r#"
            [template]
            kind = "custom"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.build_updater().unwrap_err(),
            InflightError::Config(ConfigError::MissingTemplate)
        );
    }

    #[test]
    fn test_degenerate_layouts_rejected() {
        let tiny_spacing = InflightConfig::from_toml_str(
            r#"
            [layout]
            mode = "density"
            max_entities = 8
            spacing = 1e-40
            "#,
        )
        .unwrap();
        assert!(matches!(
            tiny_spacing.build_updater(),
            Err(InflightError::Scene(SceneError::InvalidSpacing(_)))
        ));

        let huge_count = InflightConfig::from_toml_str(
            r#"
            [layout]
            mode = "fixed"
            count = 2305843009213693951
            "#,
        )
        .unwrap();
        assert!(matches!(
            huge_count.build_updater(),
            Err(InflightError::Scene(SceneError::SlotTooLarge { .. }))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            InflightConfig::from_toml_str("frames_in_flight = \"three\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = InflightConfig::from_toml_file("/nonexistent/inflight.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
