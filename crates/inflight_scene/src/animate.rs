//! Per-entity displacement over simulation time.

/// Deterministic per-entity motion.
///
/// The displayed position must depend only on the entity origin and the
/// simulation clock. Rewinding the clock therefore rewinds the scene.
pub trait Animator: Send + Sync {
    /// Returns the displayed position of an entity laid out at `origin`.
    fn displace(&self, origin: [f32; 2], time: f32) -> [f32; 2];
}

/// Vertical sine wave travelling along the x axis.
///
/// ```text
///   y = sin(x / magnitude + time) * magnitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveAnimator {
    magnitude: f32,
}

impl WaveAnimator {
    /// Peak vertical displacement, in pixels.
    pub const DEFAULT_MAGNITUDE: f32 = 128.0;

    /// Creates a wave with the given magnitude.
    #[must_use]
    pub const fn new(magnitude: f32) -> Self {
        Self { magnitude }
    }

    /// Returns the magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }
}

impl Default for WaveAnimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAGNITUDE)
    }
}

impl Animator for WaveAnimator {
    #[inline]
    fn displace(&self, origin: [f32; 2], time: f32) -> [f32; 2] {
        let y = (origin[0] / self.magnitude + time).sin() * self.magnitude;
        [origin[0], y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_at_origin() {
        let wave = WaveAnimator::default();
        assert_eq!(wave.displace([0.0, 0.0], 0.0), [0.0, 0.0]);
    }

    #[test]
    fn test_wave_peak() {
        let wave = WaveAnimator::new(10.0);
        let [x, y] = wave.displace([0.0, 0.0], std::f32::consts::FRAC_PI_2);
        assert_eq!(x, 0.0);
        assert!((y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_wave_keeps_x() {
        let wave = WaveAnimator::default();
        assert_eq!(wave.displace([-48.0, 3.0], 1.5)[0], -48.0);
    }
}
