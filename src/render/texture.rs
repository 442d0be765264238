use std::path::Path;

use log::warn;
use thiserror::Error;

/// Why an image file could not be turned into a texture.
///
/// Texture failures never abort the viewer; the renderer logs them and
/// substitutes a placeholder so a missing bitmap degrades visuals only.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// A texture resident on the GPU together with its view and sampler.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Loads a 2D texture, falling back to a 1x1 white pixel on failure.
    pub fn load_2d(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        match decode_rgba(path) {
            Ok(image) => upload(device, queue, &path.display().to_string(), &[image], false),
            Err(err) => {
                warn!("texture degraded to placeholder: {err}");
                upload(device, queue, "placeholder-2d", &[RgbaImage::white()], false)
            }
        }
    }

    /// Loads a cubemap from six faces ordered +Z, -Z, +X, -X, +Y, -Y.
    ///
    /// All faces must decode and share one size; otherwise the whole map
    /// falls back to a neutral grey so the array texture stays well formed.
    pub fn load_cubemap(device: &wgpu::Device, queue: &wgpu::Queue, paths: &[std::path::PathBuf; 6]) -> Self {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            match decode_rgba(path) {
                Ok(image) => faces.push(image),
                Err(err) => {
                    warn!("cubemap degraded to placeholder: {err}");
                    return placeholder_cubemap(device, queue);
                }
            }
        }
        let (width, height) = (faces[0].width, faces[0].height);
        if faces.iter().any(|face| face.width != width || face.height != height) {
            warn!("cubemap degraded to placeholder: face sizes differ");
            return placeholder_cubemap(device, queue);
        }
        upload(device, queue, "skybox-cubemap", &faces, true)
    }

    /// Pairs the texture with a sampler in a bind group for the pipelines.
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

#[derive(Debug)]
struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaImage {
    fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![255, 255, 255, 255],
        }
    }

    fn grey() -> Self {
        Self {
            width: 1,
            height: 1,
            data: vec![128, 128, 128, 255],
        }
    }
}

fn decode_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaImage {
        width,
        height,
        data: rgba.into_raw(),
    })
}

fn placeholder_cubemap(device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
    let faces: Vec<RgbaImage> = (0..6).map(|_| RgbaImage::grey()).collect();
    upload(device, queue, "placeholder-cubemap", &faces, true)
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    layers: &[RgbaImage],
    cubemap: bool,
) -> GpuTexture {
    let (width, height) = (layers[0].width, layers[0].height);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: layers.len() as u32,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, image) in layers.iter().enumerate() {
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(if cubemap {
            wgpu::TextureViewDimension::Cube
        } else {
            wgpu::TextureViewDimension::D2
        }),
        ..Default::default()
    });
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    GpuTexture {
        texture,
        view,
        sampler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_carry_the_path() {
        let err = decode_rgba(Path::new("missing/ground.bmp")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
        assert!(err.to_string().contains("missing/ground.bmp"));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not an image").unwrap();
        let err = decode_rgba(file.path()).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn placeholders_are_single_pixels() {
        assert_eq!(RgbaImage::white().data.len(), 4);
        assert_eq!(RgbaImage::grey().width, 1);
    }
}
