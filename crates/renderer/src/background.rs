//! Lifecycle of the liquid background: mount, animate, react, tear down.
//!
//! Every resource the background acquires (the pending frame request, the
//! listeners it registered, the backend surface and context) is a field of
//! [`Background`] and is released in [`Background::teardown`].

use tracing::{debug, trace};
use winit::dpi::PhysicalSize;

use crate::clock::FrameStamp;
use crate::host::{FrameHandle, GraphicsBackend, Host, ListenerKind};
use crate::pointer;
use crate::types::{BackgroundConfig, ConfigError};
use crate::uniforms::LiquidUniforms;

pub struct Background<B: GraphicsBackend> {
    config: BackgroundConfig,
    backend: B,
    uniforms: LiquidUniforms,
    frame: Option<FrameHandle>,
    listeners: Vec<ListenerKind>,
}

impl<B: GraphicsBackend> Background<B> {
    /// Attaches to `host`, sizes the surface and schedules the first frame.
    pub fn mount(
        config: BackgroundConfig,
        backend: B,
        host: &mut impl Host,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut background = Self {
            config,
            backend,
            uniforms: LiquidUniforms::new(&config),
            frame: None,
            listeners: Vec::with_capacity(3),
        };

        background.attach(host, ListenerKind::Resize);
        background.on_resize(&*host);
        if config.interactive {
            for kind in ListenerKind::INPUT {
                background.attach(host, kind);
            }
        }
        background.frame = Some(host.request_frame());

        debug!(
            interactive = config.interactive,
            speed = config.speed,
            amplitude = config.amplitude,
            "background mounted"
        );
        Ok(background)
    }

    /// Runs one animation frame.
    ///
    /// Returns `Ok(false)` when `handle` is not the pending request, which is
    /// the case for stale redraws after teardown.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        stamp: FrameStamp,
        host: &mut impl Host,
    ) -> Result<bool, B::Error> {
        if self.frame != Some(handle) {
            trace!(handle = handle.id(), "ignoring stale frame");
            return Ok(false);
        }

        self.frame = Some(host.request_frame());
        self.uniforms.set_time(stamp.scaled(self.config.speed));
        self.backend.draw(&self.uniforms, stamp)?;
        Ok(true)
    }

    /// Recomputes the surface size from the container and pixel ratio.
    ///
    /// Returns `false` and leaves the uniforms untouched for a zero-area
    /// container.
    pub fn on_resize(&mut self, host: &impl Host) -> bool {
        let bounds = host.container_bounds();
        if bounds.is_empty() {
            debug!(?bounds, "skipping resize of empty container");
            return false;
        }

        // Fractional pixels are dropped, as a canvas size assignment would.
        let ratio = host.device_pixel_ratio();
        let physical = PhysicalSize::new(
            (bounds.width * ratio).trunc() as u32,
            (bounds.height * ratio).trunc() as u32,
        );
        if physical.width == 0 || physical.height == 0 {
            return false;
        }

        self.uniforms.set_resolution(physical);
        self.uniforms.set_aspect((bounds.width / bounds.height) as f32);
        self.backend.resize(physical);
        true
    }

    pub fn on_pointer_move(&mut self, client: (f64, f64), host: &impl Host) {
        if !self.is_attached(ListenerKind::PointerMove) {
            return;
        }
        self.track(client, host);
    }

    /// Only the first active touch point moves the pointer.
    pub fn on_touch_move(&mut self, touches: &[(f64, f64)], host: &impl Host) {
        if !self.is_attached(ListenerKind::TouchMove) {
            return;
        }
        if let Some(&first) = touches.first() {
            self.track(first, host);
        }
    }

    /// Releases everything `mount` acquired. Safe to call any number of times.
    pub fn teardown(&mut self, host: &mut impl Host) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }

        if self.detach(ListenerKind::Resize) {
            host.remove_listener(ListenerKind::Resize);
        }

        for kind in ListenerKind::INPUT {
            if self.detach(kind) {
                host.remove_listener(kind);
            }
        }

        self.backend.detach_surface();

        if let Some(context) = self.backend.context_loss() {
            context.lose_context();
        }
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[cfg(test)]
    pub(crate) fn uniforms(&self) -> &LiquidUniforms {
        &self.uniforms
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    fn track(&mut self, client: (f64, f64), host: &impl Host) {
        if let Some(position) = pointer::normalize(client, host.container_bounds()) {
            self.uniforms.set_mouse(position);
        }
    }

    fn attach(&mut self, host: &mut impl Host, kind: ListenerKind) {
        if !self.is_attached(kind) {
            host.add_listener(kind);
            self.listeners.push(kind);
        }
    }

    fn detach(&mut self, kind: ListenerKind) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|attached| *attached != kind);
        self.listeners.len() != before
    }
}
