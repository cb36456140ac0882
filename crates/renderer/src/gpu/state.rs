use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use crate::clock::FrameStamp;
use crate::host::{ContextLoss, GraphicsBackend};
use crate::types::RendererConfig;
use crate::uniforms::LiquidUniforms;

use super::context::GpuContext;
use super::overlay::OverlayRenderer;
use super::pipeline::{BackgroundPipeline, OverlayPipeline};

/// Why a frame could not be drawn.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("rendering surface is detached")]
    Detached,
    #[error("graphics context has been released")]
    ContextLost,
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    fn for_context(context: &GpuContext) -> Option<Self> {
        (context.sample_count > 1).then(|| {
            Self::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        })
    }
}

/// `wgpu` implementation of the background's graphics backend.
pub struct GpuState {
    context: GpuContext,
    background: BackgroundPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    overlay: OverlayRenderer,
    multisample_target: Option<MultisampleTarget>,
    clear_color: wgpu::Color,
    scale_factor: f32,
    lost: bool,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        scale_factor: f64,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let transparent = config.backdrop.map_or(true, |color| color[3] < 1.0);
        let context = GpuContext::new(target, initial_size, config.antialiasing, transparent)?;

        let background =
            BackgroundPipeline::new(&context.device, context.surface_format, context.sample_count);
        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("liquid uniforms"),
            size: std::mem::size_of::<LiquidUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("liquid uniform bind group"),
                layout: &background.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let overlay_pipeline =
            OverlayPipeline::new(&context.device, context.surface_format, context.sample_count);
        let scale_factor = scale_factor as f32;
        let mut overlay = OverlayRenderer::new(
            &context.device,
            &context.queue,
            overlay_pipeline,
            config.overlay.clone(),
            scale_factor,
        );
        overlay.resize(&context.device, &context.queue, context.size, scale_factor);

        let [r, g, b, a] = config.backdrop.unwrap_or([0.0; 4]);
        let clear_color = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };

        let multisample_target = MultisampleTarget::for_context(&context);

        Ok(Self {
            context,
            background,
            uniform_buffer,
            uniform_bind_group,
            overlay,
            multisample_target,
            clear_color,
            scale_factor,
            lost: false,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Takes effect on the next resize.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor as f32;
    }

    /// Reconfigures the surface after it was reported lost or outdated.
    pub fn reconfigure(&mut self) {
        if !self.lost {
            self.context.reconfigure();
        }
    }

    fn record_frame(&mut self) {
        self.frames_since_last_update += 1;
        let elapsed = self.last_fps_update.elapsed();
        if elapsed >= Duration::from_secs(5) {
            let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            debug!(fps = fps.round(), "render stats");
            self.frames_since_last_update = 0;
            self.last_fps_update = Instant::now();
        }
    }
}

impl GraphicsBackend for GpuState {
    type Error = FrameError;

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if self.lost || size.width == 0 || size.height == 0 {
            return;
        }
        self.context.resize(size);
        self.multisample_target = MultisampleTarget::for_context(&self.context);
        self.overlay.resize(
            &self.context.device,
            &self.context.queue,
            size,
            self.scale_factor,
        );
    }

    fn draw(&mut self, uniforms: &LiquidUniforms, stamp: FrameStamp) -> Result<(), FrameError> {
        if self.lost {
            return Err(FrameError::ContextLost);
        }
        let surface = self.context.surface.as_ref().ok_or(FrameError::Detached)?;
        let frame = surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.context.device;
        let queue = &self.context.queue;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        self.overlay.prepare(device, queue, stamp.elapsed);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        });
        {
            let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
                Some(msaa) => (&msaa.view, Some(&view)),
                None => (&view, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.background.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.draw(0..3, 0..1);
            self.overlay.draw(&mut pass);
        }
        queue.submit(Some(encoder.finish()));
        frame.present();

        self.record_frame();
        Ok(())
    }

    fn detach_surface(&mut self) {
        if self.context.surface.take().is_some() {
            debug!("rendering surface detached");
        }
    }

    fn surface_attached(&self) -> bool {
        self.context.surface.is_some()
    }

    fn context_loss(&mut self) -> Option<&mut dyn ContextLoss> {
        if self.lost {
            None
        } else {
            Some(self)
        }
    }
}

impl ContextLoss for GpuState {
    fn lose_context(&mut self) {
        if self.lost {
            return;
        }
        self.lost = true;
        self.multisample_target = None;
        if self.context.surface.is_some() {
            warn!("releasing graphics context while a surface is still attached");
        }
        self.context.device.destroy();
        debug!("graphics context released");
    }
}
