//! Vertex data structures for the consumer's flat stream.

use bytemuck::{Pod, Zeroable};

/// One vertex of the serialized stream.
///
/// Memory layout matches what a vertex shader reads: two `f32` for a pixel
/// position relative to the viewport centre, four `f32` for RGBA.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in pixels.
    pub position: [f32; 2],
    /// RGBA color.
    pub color: [f32; 4],
}

impl Vertex {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates a vertex.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Decodes a vertex stream written by [`crate::FrameUpdater::serialize`].
    ///
    /// Trailing bytes that do not form a whole vertex are ignored. The input
    /// needs no particular alignment.
    #[must_use]
    pub fn read_stream(bytes: &[u8], count: usize) -> Vec<Self> {
        bytes
            .chunks_exact(Self::SIZE)
            .take(count)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}
