mod pipelines;
mod shaders;
mod texture;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::bytes_of;
use glam::{Vec2, Vec3};
use log::{error, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::assets::{load_mesh_file, AssetPaths};
use crate::frame::{FramePlan, MeshKind};
use crate::obj::ObjMesh;
use crate::scene::SceneState;
use crate::technique::ShadingTechnique;

use pipelines::{AttenuatedUniforms, EnvUniforms, LitUniforms, PipelineSet, SkyboxUniforms};
pub use texture::{GpuTexture, TextureError};

/// GPU renderer backed by wgpu that draws the fixed demo scene.
///
/// All resources are created once here and stay immutable for the life of
/// the process; per-frame work is limited to uniform uploads and draws.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipelines: PipelineSet,
    geometry: GeometryStore,
    ground_bind: wgpu::BindGroup,
    surface_bind: wgpu::BindGroup,
    sky_bind: wgpu::BindGroup,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window and asset set.
    pub async fn new(window: Arc<Window>, assets: &AssetPaths) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        // The surface must not outlive the window; the renderer owns an Arc
        // to the window, which upholds that.
        let surface = unsafe { instance.create_surface(window.as_ref()) }?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("renderer-device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);
        let pipelines = PipelineSet::new(&device, surface_format, DepthBuffer::FORMAT);
        let geometry = GeometryStore::load(&device, assets);

        let ground_bind = GpuTexture::load_2d(&device, &queue, &assets.ground_texture())
            .bind_group(&device, &pipelines.texture_layout, "ground-texture");
        let surface_bind = GpuTexture::load_2d(&device, &queue, &assets.surface_texture())
            .bind_group(&device, &pipelines.texture_layout, "surface-texture");
        let sky_bind = GpuTexture::load_cubemap(&device, &queue, &assets.skybox_faces())
            .bind_group(&device, &pipelines.cubemap_layout, "skybox-texture");

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipelines,
            geometry,
            ground_bind,
            surface_bind,
            sky_bind,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    fn aspect(&self) -> f32 {
        if self.config.height == 0 {
            1.0
        } else {
            self.config.width as f32 / self.config.height as f32
        }
    }

    /// Draws one frame of the scene: skybox, environment, then the
    /// selected technique's single model draw.
    pub fn render(&mut self, scene: &SceneState) -> Result<(), wgpu::SurfaceError> {
        let plan = FramePlan::build(scene, self.aspect());

        let skybox_bind = self.uniform_bind_group(
            "skybox-uniforms",
            bytes_of(&SkyboxUniforms::new(plan.projection, plan.skybox.modelview)),
        );

        let environment_binds: Vec<wgpu::BindGroup> = plan
            .environment
            .iter()
            .map(|draw| {
                self.uniform_bind_group(
                    "environment-uniforms",
                    bytes_of(&AttenuatedUniforms::new(
                        plan.projection,
                        draw.modelview,
                        &scene.light,
                        plan.light_view_position,
                        &draw.material,
                        &scene.attenuation,
                    )),
                )
            })
            .collect();

        let technique_bind = match plan.technique.technique {
            ShadingTechnique::Gouraud | ShadingTechnique::Phong => self.uniform_bind_group(
                "technique-uniforms",
                bytes_of(&LitUniforms::new(
                    plan.projection,
                    plan.technique.modelview,
                    &scene.light,
                    plan.light_view_position,
                    &plan.technique.material,
                )),
            ),
            ShadingTechnique::Toon => self.uniform_bind_group(
                "technique-uniforms",
                bytes_of(&AttenuatedUniforms::new(
                    plan.projection,
                    plan.technique.modelview,
                    &scene.light,
                    plan.light_view_position,
                    &plan.technique.material,
                    &scene.attenuation,
                )),
            ),
            ShadingTechnique::Refraction | ShadingTechnique::Reflection => {
                let model = plan
                    .technique
                    .model
                    .expect("environment techniques carry a model matrix");
                self.uniform_bind_group(
                    "technique-uniforms",
                    bytes_of(&EnvUniforms::new(
                        plan.projection,
                        plan.technique.modelview,
                        model,
                        scene.camera.eye,
                        &scene.light,
                        plan.light_view_position,
                        &plan.technique.material,
                        &scene.attenuation,
                    )),
                )
            }
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.5,
                            g: 0.5,
                            b: 0.5,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            // Skybox first: its pipeline writes no depth and shows the
            // cube's interior.
            pass.set_pipeline(&self.pipelines.skybox);
            pass.set_bind_group(0, &skybox_bind, &[]);
            pass.set_bind_group(1, &self.sky_bind, &[]);
            self.draw_mesh(&mut pass, MeshKind::Cube);

            // Environment pass: ground plane and light marker share the
            // general program and the ground texture.
            pass.set_pipeline(&self.pipelines.general);
            for (draw, bind) in plan.environment.iter().zip(&environment_binds) {
                pass.set_bind_group(0, bind, &[]);
                pass.set_bind_group(1, &self.ground_bind, &[]);
                self.draw_mesh(&mut pass, draw.mesh);
            }

            // Technique pass: exactly one draw of the model.
            pass.set_pipeline(self.pipelines.for_technique(plan.technique.technique));
            pass.set_bind_group(0, &technique_bind, &[]);
            if plan.technique.technique.binds_surface_texture() {
                pass.set_bind_group(1, &self.surface_bind, &[]);
                pass.set_bind_group(2, &self.sky_bind, &[]);
            }
            self.draw_mesh(&mut pass, plan.technique.mesh);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn draw_mesh<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, kind: MeshKind) {
        let mesh = match kind {
            MeshKind::Cube => &self.geometry.cube,
            MeshKind::Model => &self.geometry.model,
        };
        pass.set_vertex_buffer(0, mesh.vertex.slice(..));
        pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn uniform_bind_group(&self, label: &str, contents: &[u8]) -> wgpu::BindGroup {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::UNIFORM,
            });
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.pipelines.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}

/// Uploaded mesh handles for the fixed demo set.
pub struct GeometryStore {
    pub cube: MeshBuffers,
    pub model: MeshBuffers,
}

impl GeometryStore {
    /// Uploads the demo meshes, degrading to the built-in cube when a file
    /// is missing or unparsable.
    pub fn load(device: &wgpu::Device, assets: &AssetPaths) -> Self {
        let cube_mesh = match load_mesh_file(&assets.cube_mesh()) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!("using built-in cube: {err:?}");
                builtin_cube()
            }
        };
        let model_mesh = match load_mesh_file(&assets.model_mesh()) {
            Ok(mesh) => mesh,
            Err(err) => {
                error!("model mesh unavailable, substituting cube: {err:?}");
                cube_mesh.clone()
            }
        };
        Self {
            cube: MeshBuffers::from_mesh(device, &cube_mesh, "cube"),
            model: MeshBuffers::from_mesh(device, &model_mesh, "model"),
        }
    }
}

/// GPU-resident vertex/index buffers for one mesh.
pub struct MeshBuffers {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffers {
    pub fn from_mesh(device: &wgpu::Device, mesh: &ObjMesh, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Unit cube with per-face normals and texture coordinates, used as the
/// fallback when no cube OBJ is available on disk.
pub fn builtin_cube() -> ObjMesh {
    // (normal, u axis, v axis) per face, wound counter-clockwise from
    // outside: u cross v equals the normal.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    const CORNERS: [(f32, f32, Vec2); 4] = [
        (-0.5, -0.5, Vec2::ZERO),
        (0.5, -0.5, Vec2::new(1.0, 0.0)),
        (0.5, 0.5, Vec2::ONE),
        (-0.5, 0.5, Vec2::new(0.0, 1.0)),
    ];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for (face, (normal, u_axis, v_axis)) in FACES.iter().enumerate() {
        for (du, dv, uv) in CORNERS {
            let position = *normal * 0.5 + *u_axis * du + *v_axis * dv;
            vertices.extend_from_slice(&[position.x, position.y, position.z]);
            vertices.extend_from_slice(&[normal.x, normal.y, normal.z]);
            vertices.extend_from_slice(&[uv.x, uv.y]);
        }
        let base = (face * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    ObjMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::VERTEX_STRIDE;

    #[test]
    fn builtin_cube_has_six_faces() {
        let cube = builtin_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.vertices.len(), 24 * VERTEX_STRIDE);
    }

    #[test]
    fn builtin_cube_normals_are_unit_axes() {
        let cube = builtin_cube();
        for chunk in cube.vertices.chunks_exact(VERTEX_STRIDE) {
            let normal = Vec3::new(chunk[3], chunk[4], chunk[5]);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            // Normal points the same way as the face's center offset.
            let position = Vec3::new(chunk[0], chunk[1], chunk[2]);
            assert!(position.dot(normal) > 0.0);
        }
    }

    #[test]
    fn builtin_cube_winding_is_counter_clockwise_from_outside() {
        let cube = builtin_cube();
        for triangle in cube.indices.chunks_exact(3) {
            let vertex = |i: u32| {
                let offset = i as usize * VERTEX_STRIDE;
                Vec3::new(
                    cube.vertices[offset],
                    cube.vertices[offset + 1],
                    cube.vertices[offset + 2],
                )
            };
            let (p0, p1, p2) = (vertex(triangle[0]), vertex(triangle[1]), vertex(triangle[2]));
            let face_normal = (p1 - p0).cross(p2 - p0);
            let outward = (p0 + p1 + p2) / 3.0;
            assert!(face_normal.dot(outward) > 0.0);
        }
    }
}
