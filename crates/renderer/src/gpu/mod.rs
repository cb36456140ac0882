//! `wgpu` backend for the background and its overlay.
//!
//! - `context` owns the instance, device and the window surface, and
//!   reconfigures the swapchain on resize.
//! - `pipeline` builds the liquid and overlay render pipelines.
//! - `overlay` uploads the logo, the glyph atlas and per-frame quads.
//! - `state` glues them into [`GpuState`], the `GraphicsBackend` the window
//!   runtime mounts.

mod context;
mod overlay;
mod pipeline;
mod state;

pub use state::{FrameError, GpuState};
