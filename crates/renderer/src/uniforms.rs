use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

use crate::types::BackgroundConfig;

/// CPU mirror of the `LiquidParams` uniform block.
///
/// Field order and padding follow std140 so the struct can be uploaded with
/// `bytemuck::bytes_of`; see `compile::FRAGMENT_SHADER_GLSL` for the GLSL side.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LiquidUniforms {
    /// `(width, height, width / height, 0)` in physical pixels.
    pub resolution: [f32; 4],
    /// Base colour in `rgb`, alpha unused.
    pub base_color: [f32; 4],
    /// Pointer position in normalized container space, y up.
    pub mouse: [f32; 2],
    pub time: f32,
    pub amplitude: f32,
    pub frequency_x: f32,
    pub frequency_y: f32,
    pub _padding: [f32; 2],
}

impl LiquidUniforms {
    pub fn new(config: &BackgroundConfig) -> Self {
        let [r, g, b] = config.base_color;
        Self {
            resolution: [0.0; 4],
            base_color: [r, g, b, 1.0],
            mouse: [0.0, 0.0],
            time: 0.0,
            amplitude: config.amplitude,
            frequency_x: config.frequency_x,
            frequency_y: config.frequency_y,
            _padding: [0.0; 2],
        }
    }

    pub fn set_resolution(&mut self, size: PhysicalSize<u32>) {
        let width = size.width as f32;
        let height = size.height as f32;
        self.resolution = [width, height, width / height, 0.0];
    }

    /// Overrides the aspect ratio with the container's logical ratio, which
    /// rounding to whole physical pixels may otherwise skew.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.resolution[2] = aspect;
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    pub fn set_mouse(&mut self, position: [f32; 2]) {
        self.mouse = position;
    }

    pub fn width(&self) -> f32 {
        self.resolution[0]
    }

    pub fn height(&self) -> f32 {
        self.resolution[1]
    }

    pub fn aspect(&self) -> f32 {
        self.resolution[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_std140_block_size() {
        assert_eq!(std::mem::size_of::<LiquidUniforms>(), 64);
        assert_eq!(std::mem::offset_of!(LiquidUniforms, mouse), 32);
        assert_eq!(std::mem::offset_of!(LiquidUniforms, time), 40);
        assert_eq!(std::mem::offset_of!(LiquidUniforms, frequency_y), 52);
    }

    #[test]
    fn seeds_constants_from_config() {
        let config = BackgroundConfig {
            base_color: [0.2, 0.2, 0.3],
            amplitude: 0.7,
            ..BackgroundConfig::default()
        };
        let uniforms = LiquidUniforms::new(&config);
        assert_eq!(uniforms.base_color, [0.2, 0.2, 0.3, 1.0]);
        assert_eq!(uniforms.amplitude, 0.7);
        assert_eq!(uniforms.frequency_x, 2.5);
        assert_eq!(uniforms.mouse, [0.0, 0.0]);
        assert_eq!(uniforms.time, 0.0);
    }

    #[test]
    fn resolution_carries_aspect_ratio() {
        let mut uniforms = LiquidUniforms::new(&BackgroundConfig::default());
        uniforms.set_resolution(PhysicalSize::new(1920, 1080));
        assert_eq!(uniforms.width(), 1920.0);
        assert_eq!(uniforms.height(), 1080.0);
        assert_eq!(uniforms.aspect(), 1920.0 / 1080.0);
    }
}
