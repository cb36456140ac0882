use std::borrow::Cow;

use wgpu::naga::ShaderStage;

fn compile_glsl(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    })
}

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    compile_glsl(
        device,
        "fullscreen triangle vertex",
        VERTEX_SHADER_GLSL,
        ShaderStage::Vertex,
    )
}

/// Compiles the liquid background fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    compile_glsl(
        device,
        "liquid fragment",
        FRAGMENT_SHADER_GLSL,
        ShaderStage::Fragment,
    )
}

/// Compiles the textured-quad pair used for the logo and glyphs.
pub(crate) fn compile_overlay_shaders(
    device: &wgpu::Device,
) -> (wgpu::ShaderModule, wgpu::ShaderModule) {
    (
        compile_glsl(
            device,
            "overlay vertex",
            OVERLAY_VERTEX_GLSL,
            ShaderStage::Vertex,
        ),
        compile_glsl(
            device,
            "overlay fragment",
            OVERLAY_FRAGMENT_GLSL,
            ShaderStage::Fragment,
        ),
    )
}

/// Minimal full-screen triangle vertex shader.
///
/// `v_uv` has a bottom-left origin, so `uMouse` and `v_uv` share one space.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Liquid background: domain warp, pointer ripple, coffee palette, 3×3
/// supersampling.
///
/// The uniform block layout must match `LiquidUniforms` in `uniforms.rs`.
pub const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform LiquidParams {
    vec4 uResolution;
    vec4 uBaseColor;
    vec2 uMouse;
    float uTime;
    float uAmplitude;
    float uFrequencyX;
    float uFrequencyY;
    vec2 _padding;
} params;

const float PI = 3.14159;

vec3 coffeePalette(float t) {
    vec3 lightBrown = vec3(0.76, 0.58, 0.42);
    vec3 mediumBrown = vec3(0.55, 0.38, 0.22);
    vec3 darkBrown = vec3(0.35, 0.25, 0.15);
    vec3 cream = vec3(0.94, 0.88, 0.76);

    if (t < 0.33) {
        return mix(darkBrown, mediumBrown, t * 3.0);
    } else if (t < 0.66) {
        return mix(mediumBrown, lightBrown, (t - 0.33) * 3.0);
    }
    return mix(lightBrown, cream, (t - 0.66) * 3.0);
}

vec4 renderImage(vec2 uvCoord) {
    vec2 res = params.uResolution.xy;
    vec2 fragCoord = uvCoord * res;
    vec2 uv = (2.0 * fragCoord - res) / min(res.x, res.y);
    float t = params.uTime;

    for (int i = 1; i < 8; i++) {
        float fi = float(i);
        uv.x += params.uAmplitude / fi * cos(fi * params.uFrequencyX * uv.y + t + params.uMouse.x * PI);
        uv.y += params.uAmplitude / fi * cos(fi * params.uFrequencyY * uv.x + t + params.uMouse.y * PI);
    }

    vec2 diff = uvCoord - params.uMouse;
    float dist = length(diff);
    float falloff = exp(-dist * 15.0);
    float ripple = sin(8.0 * dist - t * 3.0) * 0.02;
    uv += (diff / (dist + 0.0001)) * ripple * falloff;

    float pattern = sin(uv.x * 5.0 + t) * sin(uv.y * 3.0 + t) * 0.5 + 0.5;
    vec3 color = coffeePalette(pattern * 0.5 + t * 0.05) * 0.8 + params.uBaseColor.rgb * 0.2;
    return vec4(color, 0.9);
}

void main() {
    vec2 res = params.uResolution.xy;
    float texel = 1.5 / min(res.x, res.y);
    vec4 col = vec4(0.0);
    for (int i = -1; i <= 1; i++) {
        for (int j = -1; j <= 1; j++) {
            col += renderImage(v_uv + vec2(float(i), float(j)) * texel);
        }
    }
    outColor = col / 9.0;
}
";

/// Textured quad vertex shader; positions arrive in clip space.
pub const OVERLAY_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_uv;
layout(location = 2) in vec4 a_color;

layout(location = 0) out vec2 v_uv;
layout(location = 1) out vec4 v_color;

void main() {
    v_uv = a_uv;
    v_color = a_color;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

/// Samples the bound texture and tints it by the vertex colour.
pub const OVERLAY_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 1) in vec4 v_color;
layout(location = 0) out vec4 outColor;

layout(set = 0, binding = 0) uniform texture2D overlay_texture;
layout(set = 0, binding = 1) uniform sampler overlay_sampler;

void main() {
    outColor = texture(sampler2D(overlay_texture, overlay_sampler), v_uv) * v_color;
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga;

    fn validate(source: &str, stage: ShaderStage) -> naga::Module {
        let mut frontend = naga::front::glsl::Frontend::default();
        let module = frontend
            .parse(&naga::front::glsl::Options::from(stage), source)
            .unwrap_or_else(|err| panic!("{stage:?} shader failed to parse: {err:?}"));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|err| panic!("{stage:?} shader failed validation: {err:?}"));
        module
    }

    #[test]
    fn background_shaders_validate() {
        validate(VERTEX_SHADER_GLSL, ShaderStage::Vertex);
        let module = validate(FRAGMENT_SHADER_GLSL, ShaderStage::Fragment);
        assert!(module.entry_points.iter().any(|ep| ep.name == "main"));
    }

    #[test]
    fn overlay_shaders_validate() {
        validate(OVERLAY_VERTEX_GLSL, ShaderStage::Vertex);
        validate(OVERLAY_FRAGMENT_GLSL, ShaderStage::Fragment);
    }

    #[test]
    fn uniform_block_fits_mirrored_struct() {
        let module = validate(FRAGMENT_SHADER_GLSL, ShaderStage::Fragment);
        let block = module
            .global_variables
            .iter()
            .find(|(_, var)| var.space == naga::AddressSpace::Uniform)
            .map(|(_, var)| var.ty)
            .expect("uniform block");
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).expect("layout");
        assert_eq!(
            layouter[block].size as usize,
            std::mem::size_of::<crate::uniforms::LiquidUniforms>()
        );
    }
}
