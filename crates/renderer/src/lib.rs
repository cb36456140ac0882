//! Renderer crate for the coming-soon screen.
//!
//! A full-window liquid shader animates behind a logo and a wave-animated
//! caption. The overall flow is:
//!
//! ```text
//!   comingsoon CLI
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window::run ──▶ winit event loop
//!                          │
//!                          ├─▶ Background::mount / teardown  (listeners, frame, surface, context)
//!                          └─▶ Background::on_frame ──▶ GpuState::draw ──▶ liquid pass + overlay quads
//! ```
//!
//! [`Background`] holds the lifecycle and uniform logic and talks to the
//! platform only through the [`Host`] and [`GraphicsBackend`] seams, so it is
//! testable without a window or a GPU. [`GpuState`] is the `wgpu`
//! implementation; the window runtime implements [`Host`] on top of `winit`.

pub mod background;
pub mod clock;
mod compile;
mod gpu;
pub mod host;
pub mod overlay;
pub mod pointer;
pub mod timeline;
pub mod types;
pub mod uniforms;
mod window;

use anyhow::Result;

pub use background::Background;
pub use clock::{FixedTimeSource, FrameStamp, SystemTimeSource, TimeSource};
pub use gpu::{FrameError, GpuState};
pub use host::{ContextLoss, FrameHandle, GraphicsBackend, Host, ListenerKind};
pub use types::{
    Antialiasing, BackgroundConfig, Bounds, ConfigError, OverlayConfig, RendererConfig,
    WaveConfig,
};
pub use uniforms::LiquidUniforms;

/// Entry point owning the configuration for one window.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Fails when the configuration is rejected or no window or GPU adapter
    /// can be created.
    pub fn run(self) -> Result<()> {
        self.config.background.validate()?;
        window::run(self.config)
    }
}
