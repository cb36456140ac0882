use anyhow::{anyhow, Context as AnyhowContext, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::TextureFormatFeatureFlags;
use winit::dpi::PhysicalSize;

use crate::types::Antialiasing;

/// wgpu instance, device and the window surface.
///
/// The surface is optional so it can be detached ahead of the device; every
/// surface operation becomes a no-op once it is gone.
pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: Option<wgpu::Surface<'static>>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub sample_count: u32,
    pub surface_format: wgpu::TextureFormat,
}

impl GpuContext {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        antialiasing: Antialiasing,
        transparent: bool,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;

        // SAFETY: the window outlives the context; `Background::teardown`
        // detaches the surface before the window is dropped.
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        let limits = adapter.limits();
        let is_software = adapter_info.device_type == wgpu::DeviceType::Cpu;
        tracing::debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            is_software,
            "selected GPU adapter"
        );

        let max_dimension = limits.max_texture_dimension_2d;
        let requested_width = initial_size.width.max(1);
        let requested_height = initial_size.height.max(1);
        if requested_width > max_dimension || requested_height > max_dimension {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {requested_width}x{requested_height}"
            );
        }

        let surface_caps = surface.get_capabilities(&adapter);
        let fallback_format = *surface_caps
            .formats
            .first()
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;
        // The palette is authored in display space, so skip sRGB encoding.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .unwrap_or_else(|| {
                tracing::warn!(
                    ?fallback_format,
                    "no non-sRGB surface format available; colours will look washed out"
                );
                fallback_format
            });

        let sample_count = select_sample_count(
            antialiasing,
            adapter.get_texture_format_features(surface_format).flags,
            is_software,
        );

        let mut required_features = wgpu::Features::empty();
        if sample_count > 4 {
            required_features |= wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES;
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("comingsoon device"),
            required_features,
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let present_mode = surface_caps
            .present_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::PresentMode::Fifo)
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let alpha_mode = select_alpha_mode(&surface_caps.alpha_modes, transparent);
        tracing::debug!(?present_mode, ?alpha_mode, sample_count, "configuring surface");

        let size = PhysicalSize::new(requested_width, requested_height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface: Some(surface),
            device,
            queue,
            config,
            size,
            sample_count,
            surface_format,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        if let Some(surface) = self.surface.as_ref() {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Re-applies the current configuration after a lost or outdated frame.
    pub(crate) fn reconfigure(&mut self) {
        self.resize(self.size);
    }
}

fn select_sample_count(
    antialiasing: Antialiasing,
    flags: TextureFormatFeatureFlags,
    is_software: bool,
) -> u32 {
    let mut supported = flags.supported_sample_counts();
    if !supported.contains(&1) {
        supported.push(1);
    }
    supported.sort_unstable();
    supported.dedup();

    let mut sample_count = match antialiasing {
        Antialiasing::Auto => supported.last().copied().unwrap_or(1).min(4),
        Antialiasing::Off => 1,
        Antialiasing::Samples(requested) => {
            if supported.contains(&requested) {
                requested
            } else {
                let fallback = supported
                    .iter()
                    .copied()
                    .filter(|&count| count <= requested)
                    .max()
                    .unwrap_or(1);
                tracing::warn!(
                    requested,
                    fallback,
                    ?supported,
                    "requested MSAA sample count not supported; falling back"
                );
                fallback
            }
        }
    };

    if sample_count > 1 && !flags.contains(TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE) {
        tracing::warn!("surface format does not support MSAA resolve; disabling MSAA");
        sample_count = 1;
    }

    if is_software && sample_count > 1 {
        tracing::warn!(
            sample_count,
            "software rasterizer detected; disabling MSAA for performance"
        );
        sample_count = 1;
    }

    sample_count
}

fn select_alpha_mode(
    available: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    let preferred: &[wgpu::CompositeAlphaMode] = if transparent {
        &[
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ]
    } else {
        &[wgpu::CompositeAlphaMode::Opaque]
    };
    preferred
        .iter()
        .copied()
        .find(|mode| available.contains(mode))
        .or_else(|| available.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msaa_flags() -> TextureFormatFeatureFlags {
        TextureFormatFeatureFlags::MULTISAMPLE_X2
            | TextureFormatFeatureFlags::MULTISAMPLE_X4
            | TextureFormatFeatureFlags::MULTISAMPLE_X8
            | TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE
    }

    #[test]
    fn auto_caps_at_four_samples() {
        assert_eq!(select_sample_count(Antialiasing::Auto, msaa_flags(), false), 4);
        assert_eq!(select_sample_count(Antialiasing::Off, msaa_flags(), false), 1);
    }

    #[test]
    fn unsupported_request_falls_back_downwards() {
        let flags = TextureFormatFeatureFlags::MULTISAMPLE_X4
            | TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE;
        assert_eq!(select_sample_count(Antialiasing::Samples(8), flags, false), 4);
        assert_eq!(select_sample_count(Antialiasing::Samples(2), flags, false), 1);
    }

    #[test]
    fn msaa_needs_resolve_and_hardware() {
        let no_resolve = TextureFormatFeatureFlags::MULTISAMPLE_X4;
        assert_eq!(select_sample_count(Antialiasing::Auto, no_resolve, false), 1);
        assert_eq!(select_sample_count(Antialiasing::Auto, msaa_flags(), true), 1);
    }

    #[test]
    fn alpha_mode_prefers_opacity_unless_transparent() {
        use wgpu::CompositeAlphaMode as Mode;
        let available = [Mode::Opaque, Mode::PreMultiplied];
        assert_eq!(select_alpha_mode(&available, false), Mode::Opaque);
        assert_eq!(select_alpha_mode(&available, true), Mode::PreMultiplied);
        assert_eq!(select_alpha_mode(&[Mode::Inherit], true), Mode::Inherit);
        assert_eq!(select_alpha_mode(&[], false), Mode::Auto);
    }
}
