use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::lighting::{Attenuation, Light, Material};
use crate::obj::VERTEX_STRIDE;
use crate::technique::ShadingTechnique;

use super::shaders;

/// All render pipelines plus the bind group layouts they share.
///
/// One pipeline per shading technique, one for the skybox and one for the
/// shared environment program; static state (depth writes, cull face) is
/// baked into each pipeline instead of toggled at draw time.
pub struct PipelineSet {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub cubemap_layout: wgpu::BindGroupLayout,
    pub skybox: wgpu::RenderPipeline,
    pub general: wgpu::RenderPipeline,
    pub gouraud: wgpu::RenderPipeline,
    pub phong: wgpu::RenderPipeline,
    pub refraction: wgpu::RenderPipeline,
    pub reflection: wgpu::RenderPipeline,
    pub toon: wgpu::RenderPipeline,
}

impl PipelineSet {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = texture_bind_layout(
            device,
            "texture-bind-layout",
            wgpu::TextureViewDimension::D2,
        );
        let cubemap_layout = texture_bind_layout(
            device,
            "cubemap-bind-layout",
            wgpu::TextureViewDimension::Cube,
        );

        let builder = PipelineBuilder {
            device,
            surface_format,
            depth_format,
        };

        let skybox = builder.build(
            "skybox",
            shaders::SKYBOX,
            &[&uniform_layout, &cubemap_layout],
            // The shell is viewed from inside with depth writes off so the
            // scene always draws over it.
            false,
            wgpu::Face::Front,
        );
        let general = builder.build(
            "general",
            shaders::GENERAL,
            &[&uniform_layout, &texture_layout],
            true,
            wgpu::Face::Back,
        );
        let gouraud = builder.build(
            "gouraud",
            shaders::GOURAUD,
            &[&uniform_layout],
            true,
            wgpu::Face::Back,
        );
        let phong = builder.build(
            "phong",
            shaders::PHONG,
            &[&uniform_layout],
            true,
            wgpu::Face::Back,
        );
        let refraction = builder.build(
            "refraction",
            shaders::REFRACTION,
            &[&uniform_layout, &texture_layout, &cubemap_layout],
            true,
            wgpu::Face::Back,
        );
        let reflection = builder.build(
            "reflection",
            shaders::REFLECTION,
            &[&uniform_layout, &texture_layout, &cubemap_layout],
            true,
            wgpu::Face::Back,
        );
        let toon = builder.build(
            "toon",
            shaders::TOON,
            &[&uniform_layout],
            true,
            wgpu::Face::Back,
        );

        Self {
            uniform_layout,
            texture_layout,
            cubemap_layout,
            skybox,
            general,
            gouraud,
            phong,
            refraction,
            reflection,
            toon,
        }
    }

    /// Technique dispatch: one pipeline per variant, checked exhaustively.
    pub fn for_technique(&self, technique: ShadingTechnique) -> &wgpu::RenderPipeline {
        match technique {
            ShadingTechnique::Gouraud => &self.gouraud,
            ShadingTechnique::Phong => &self.phong,
            ShadingTechnique::Refraction => &self.refraction,
            ShadingTechnique::Reflection => &self.reflection,
            ShadingTechnique::Toon => &self.toon,
        }
    }
}

fn texture_bind_layout(
    device: &wgpu::Device,
    label: &str,
    dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: dimension,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
}

impl PipelineBuilder<'_> {
    fn build(
        &self,
        label: &str,
        source: &str,
        layouts: &[&wgpu::BindGroupLayout],
        depth_write: bool,
        cull: wgpu::Face,
    ) -> wgpu::RenderPipeline {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label}-shader")),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label}-pipeline-layout")),
                bind_group_layouts: layouts,
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{label}-pipeline")),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: (VERTEX_STRIDE * std::mem::size_of::<f32>()) as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: 0,
                                shader_location: 0,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x3,
                                offset: (3 * std::mem::size_of::<f32>()) as u64,
                                shader_location: 1,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: (6 * std::mem::size_of::<f32>()) as u64,
                                shader_location: 2,
                            },
                        ],
                    }],
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(cull),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: self.depth_format,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            })
    }
}

/// Uniform block for the Gouraud and Phong programs.
///
/// Deliberately carries no attenuation coefficients; see DESIGN.md.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LitUniforms {
    pub projection: [[f32; 4]; 4],
    pub modelview: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub light_position: [f32; 4],
    pub material_ambient: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub shininess: [f32; 4],
}

impl LitUniforms {
    pub fn new(
        projection: Mat4,
        modelview: Mat4,
        light: &Light,
        light_view_position: Vec4,
        material: &Material,
    ) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            modelview: modelview.to_cols_array_2d(),
            normal: normal_matrix(modelview),
            light_ambient: light.ambient.into(),
            light_diffuse: light.diffuse.into(),
            light_specular: light.specular.into(),
            light_position: light_view_position.into(),
            material_ambient: material.ambient.into(),
            material_diffuse: material.diffuse.into(),
            material_specular: material.specular.into(),
            shininess: [material.shininess, 0.0, 0.0, 0.0],
        }
    }
}

/// Uniform block for the general (textured) and toon programs, which model
/// distance falloff on top of the lit set.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct AttenuatedUniforms {
    pub lit: LitUniforms,
    pub attenuation: [f32; 4],
}

impl AttenuatedUniforms {
    pub fn new(
        projection: Mat4,
        modelview: Mat4,
        light: &Light,
        light_view_position: Vec4,
        material: &Material,
        attenuation: &Attenuation,
    ) -> Self {
        Self {
            lit: LitUniforms::new(projection, modelview, light, light_view_position, material),
            attenuation: attenuation_vec(attenuation),
        }
    }
}

/// Uniform block for the reflection and refraction programs, which add the
/// explicit world placement matrix and camera position.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct EnvUniforms {
    pub projection: [[f32; 4]; 4],
    pub modelview: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub camera_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub light_position: [f32; 4],
    pub material_ambient: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub shininess: [f32; 4],
    pub attenuation: [f32; 4],
}

impl EnvUniforms {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        projection: Mat4,
        modelview: Mat4,
        model: Mat4,
        camera_eye: Vec3,
        light: &Light,
        light_view_position: Vec4,
        material: &Material,
        attenuation: &Attenuation,
    ) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            modelview: modelview.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            // World-space normals, so derived from the model matrix.
            normal: normal_matrix(model),
            camera_position: camera_eye.extend(1.0).into(),
            light_ambient: light.ambient.into(),
            light_diffuse: light.diffuse.into(),
            light_specular: light.specular.into(),
            light_position: light_view_position.into(),
            material_ambient: material.ambient.into(),
            material_diffuse: material.diffuse.into(),
            material_specular: material.specular.into(),
            shininess: [material.shininess, 0.0, 0.0, 0.0],
            attenuation: attenuation_vec(attenuation),
        }
    }
}

/// Uniform block for the skybox program.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub projection: [[f32; 4]; 4],
    pub modelview: [[f32; 4]; 4],
}

impl SkyboxUniforms {
    pub fn new(projection: Mat4, modelview: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            modelview: modelview.to_cols_array_2d(),
        }
    }
}

/// Inverse-transpose of the upper 3x3, padded to vec4 columns for WGSL.
fn normal_matrix(matrix: Mat4) -> [[f32; 4]; 3] {
    let normal = Mat3::from_mat4(matrix).inverse().transpose();
    let cols = normal.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

fn attenuation_vec(attenuation: &Attenuation) -> [f32; 4] {
    [
        attenuation.constant,
        attenuation.linear,
        attenuation.quadratic,
        0.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_matrix_of_uniform_scale_is_inverse_scale() {
        let matrix = Mat4::from_scale(Vec3::splat(20.0));
        let normal = normal_matrix(matrix);
        assert!((normal[0][0] - 1.0 / 20.0).abs() < 1e-6);
        assert_eq!(normal[0][3], 0.0);
    }

    #[test]
    fn lit_block_has_no_attenuation_slot() {
        // The attenuated block is exactly the lit block plus one vec4.
        assert_eq!(
            std::mem::size_of::<AttenuatedUniforms>(),
            std::mem::size_of::<LitUniforms>() + 16
        );
    }

    #[test]
    fn uniform_blocks_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<LitUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<EnvUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SkyboxUniforms>() % 16, 0);
    }
}
