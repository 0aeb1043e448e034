//! # INFLIGHT Scene
//!
//! The producer half of a frame: advance the scene by one step and write
//! it into a slot as a flat vertex stream.
//!
//! ## Stream Layout
//!
//! ```text
//! ┌──────────── entity 0 ────────────┬──────────── entity 1 ────────────┬─ ─ ─
//! │ vertex 0 │ vertex 1 │ vertex 2   │ vertex 0 │ vertex 1 │ vertex 2   │
//! └──────────────────────────────────┴──────────────────────────────────┴─ ─ ─
//!   each vertex: [x, y] f32 + [r, g, b, a] f32 = 24 bytes, no padding
//! ```
//!
//! The consumer sees no structure beyond this ordering, so it is fixed:
//! entity-major, then template order.
//!
//! ## Example
//!
//! ```rust
//! use inflight_scene::{FrameUpdater, Layout, Vertex, VisualTemplate, WaveAnimator};
//!
//! let updater = FrameUpdater::new(
//!     VisualTemplate::triangle(64.0),
//!     Layout::fixed(2),
//!     Box::new(WaveAnimator::new(128.0)),
//! )
//! .unwrap();
//!
//! let mut state = updater.generate(800, 600);
//! updater.update(&mut state, 0.05);
//!
//! let mut region = vec![0u8; updater.max_vertex_count() * Vertex::SIZE];
//! let written = updater.serialize(&state, &mut region).unwrap();
//! assert_eq!(written, 6);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animate;
pub mod entity;
pub mod error;
pub mod layout;
pub mod template;
pub mod updater;
pub mod vertex;

pub use animate::{Animator, WaveAnimator};
pub use entity::{SceneEntity, SceneState};
pub use error::{SceneError, SceneResult};
pub use layout::{EntityCount, Layout, Palette};
pub use template::{TemplateVertex, VisualTemplate};
pub use updater::FrameUpdater;
pub use vertex::Vertex;
