use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::obj::{load_obj_from_str, ObjMesh};

/// Well-known file layout inside the assets directory.
///
/// The viewer draws a fixed demo set, so the table is static: two meshes,
/// two surface bitmaps, and six skybox faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Unit cube used for the ground plane, light marker and skybox shell.
    pub fn cube_mesh(&self) -> PathBuf {
        self.root.join("cube.obj")
    }

    /// High-poly model rendered by the technique pass.
    pub fn model_mesh(&self) -> PathBuf {
        self.root.join("model.obj")
    }

    /// Bitmap applied to the ground plane and light marker.
    pub fn ground_texture(&self) -> PathBuf {
        self.root.join("ground.bmp")
    }

    /// Bitmap bound by the reflection and refraction techniques.
    pub fn surface_texture(&self) -> PathBuf {
        self.root.join("surface.bmp")
    }

    /// Skybox faces ordered +Z, -Z, +X, -X, +Y, -Y.
    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        let sky = self.root.join("skybox");
        [
            sky.join("back.bmp"),
            sky.join("front.bmp"),
            sky.join("right.bmp"),
            sky.join("left.bmp"),
            sky.join("top.bmp"),
            sky.join("bottom.bmp"),
        ]
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new("assets")
    }
}

/// Reads and parses an OBJ mesh from disk.
pub fn load_mesh_file(path: &Path) -> Result<ObjMesh> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    load_obj_from_str(&contents)
        .with_context(|| format!("failed to parse OBJ mesh {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn paths_resolve_under_the_root() {
        let assets = AssetPaths::new("demo-assets");
        assert_eq!(assets.cube_mesh(), Path::new("demo-assets/cube.obj"));
        assert_eq!(
            assets.skybox_faces()[0],
            Path::new("demo-assets/skybox/back.bmp")
        );
        assert_eq!(assets.skybox_faces().len(), 6);
    }

    #[test]
    fn loads_a_mesh_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mesh = load_mesh_file(file.path()).unwrap();
        assert_eq!(mesh.indices.len(), 3);
    }

    #[test]
    fn missing_mesh_reports_the_path() {
        let err = load_mesh_file(Path::new("definitely/not/here.obj")).unwrap_err();
        assert!(err.to_string().contains("not/here.obj"));
    }
}
