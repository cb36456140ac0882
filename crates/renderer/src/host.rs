//! Seams between the background lifecycle and the platform it runs on.
//!
//! `Host` is the container: it reports bounds and pixel density, owns event
//! listener registration and schedules animation frames. `GraphicsBackend`
//! owns the surface and the graphics context. The window runtime implements
//! both against `winit` and `wgpu`; tests implement them in memory.

use winit::dpi::PhysicalSize;

use crate::clock::FrameStamp;
use crate::types::Bounds;
use crate::uniforms::LiquidUniforms;

/// Event listeners the background registers with its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    TouchMove,
}

impl ListenerKind {
    pub const INPUT: [ListenerKind; 2] = [ListenerKind::PointerMove, ListenerKind::TouchMove];
}

/// Opaque id of a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Host {
    /// Container rectangle in logical pixels.
    fn container_bounds(&self) -> Bounds;
    fn device_pixel_ratio(&self) -> f64;
    fn add_listener(&mut self, kind: ListenerKind);
    /// Removing a listener that is not attached is a no-op.
    fn remove_listener(&mut self, kind: ListenerKind);
    /// Schedules one frame callback for the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancelling a frame that already fired or was cancelled is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

pub trait GraphicsBackend {
    type Error;

    fn resize(&mut self, size: PhysicalSize<u32>);
    fn draw(&mut self, uniforms: &LiquidUniforms, stamp: FrameStamp) -> Result<(), Self::Error>;
    /// Releases the rendering surface. Must tolerate repeated calls.
    fn detach_surface(&mut self);
    fn surface_attached(&self) -> bool;
    /// Optional capability to force-release the graphics context.
    fn context_loss(&mut self) -> Option<&mut dyn ContextLoss>;
}

/// Forcibly releases a graphics context ahead of drop.
pub trait ContextLoss {
    fn lose_context(&mut self);
}
