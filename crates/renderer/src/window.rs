//! `winit` runtime: one window hosting the background and its overlay.
//!
//! [`WindowHost`] adapts the window to the [`Host`] seam. Frame requests map
//! onto `request_redraw`; a redraw is only forwarded to the background while
//! its handle is still pending, so nothing draws after teardown.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::background::Background;
use crate::clock::{self, BoxedTimeSource};
use crate::gpu::{FrameError, GpuState};
use crate::host::{FrameHandle, Host, ListenerKind};
use crate::pointer::TouchTracker;
use crate::types::{Bounds, RendererConfig};

pub(crate) struct WindowHost {
    window: Arc<Window>,
    listeners: HashSet<ListenerKind>,
    pending: Option<FrameHandle>,
    next_frame: u64,
}

impl WindowHost {
    pub(crate) fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            listeners: HashSet::new(),
            pending: None,
            next_frame: 0,
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn listens(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    /// Claims the pending frame, if any, for the redraw being delivered.
    pub(crate) fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl Host for WindowHost {
    fn container_bounds(&self) -> Bounds {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        Bounds::new(0.0, 0.0, logical.width, logical.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        self.listeners.insert(kind);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.listeners.remove(&kind);
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle::new(self.next_frame);
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Opens the window and runs the event loop until it is closed.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let mut builder = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .with_transparent(config.backdrop.map_or(true, |color| color[3] < 1.0));
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = builder
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let gpu = GpuState::new(
        window.as_ref(),
        window.inner_size(),
        window.scale_factor(),
        &config,
    )?;
    let mut host = WindowHost::new(window);
    let mut background = Background::mount(config.background, gpu, &mut host)?;
    let mut clock: BoxedTimeSource = clock::time_source_for(config.frozen_time);
    let mut touches = TouchTracker::default();

    tracing::info!(
        title = %config.title,
        size = ?background.backend().size(),
        frozen = config.frozen_time.is_some(),
        "window ready"
    );

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == host.window().id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                background.teardown(&mut host);
                elwt.exit();
            }
            WindowEvent::Resized(_) => {
                if host.listens(ListenerKind::Resize) {
                    background.on_resize(&host);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                background.backend_mut().set_scale_factor(scale_factor);
                if host.listens(ListenerKind::Resize) {
                    background.on_resize(&host);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if host.listens(ListenerKind::PointerMove) {
                    let logical = position.to_logical::<f64>(host.window().scale_factor());
                    background.on_pointer_move((logical.x, logical.y), &host);
                }
            }
            WindowEvent::Touch(touch) => {
                let moved = touches.handle(touch.id, touch.phase, touch.location);
                if moved && host.listens(ListenerKind::TouchMove) {
                    let positions = touches.positions(host.window().scale_factor());
                    background.on_touch_move(&positions, &host);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(handle) = host.take_frame() else {
                    return;
                };
                match background.on_frame(handle, clock.sample(), &mut host) {
                    Ok(_) => {}
                    Err(FrameError::Surface(surface_err)) => match surface_err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            background.backend_mut().reconfigure();
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            tracing::error!("surface out of memory; exiting");
                            background.teardown(&mut host);
                            elwt.exit();
                        }
                        wgpu::SurfaceError::Timeout => {
                            tracing::warn!("surface timeout; retrying next frame");
                        }
                        other => {
                            tracing::warn!("surface error: {other:?}; retrying next frame");
                        }
                    },
                    Err(err) => {
                        tracing::debug!(error = %err, "frame skipped");
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            elwt.set_control_flow(ControlFlow::Wait);
        }
        Event::LoopExiting => {
            background.teardown(&mut host);
            tracing::debug!("event loop exiting");
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
